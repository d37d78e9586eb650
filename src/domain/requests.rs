//! Approval request records
//!
//! Package purchases and withdrawals are created as `Pending` documents by
//! the storefront and settled by the approval workflow. Anything other than
//! `Pending`/`Approved` is an opaque terminal status (e.g. a rejection
//! label chosen by the admin UI).

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::db::collections;

/// Lifecycle states the workflow cares about
pub mod status {
    pub const PENDING: &str = "Pending";
    pub const APPROVED: &str = "Approved";
}

/// The two request kinds the approval workflow settles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    PackagePurchase,
    Withdrawal,
}

impl RequestKind {
    /// Collection holding this kind of request
    pub fn collection(self) -> &'static str {
        match self {
            RequestKind::PackagePurchase => collections::PACKAGE_PURCHASES,
            RequestKind::Withdrawal => collections::WITHDRAWALS,
        }
    }

    /// Name of the status field on the stored record
    pub fn status_field(self) -> &'static str {
        match self {
            RequestKind::PackagePurchase => "packageStatus",
            RequestKind::Withdrawal => "status",
        }
    }

    /// Human-readable label used in error messages
    pub fn label(self) -> &'static str {
        match self {
            RequestKind::PackagePurchase => "package purchase",
            RequestKind::Withdrawal => "withdrawal",
        }
    }
}

/// A subscription package purchase awaiting a decision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackagePurchase {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub plan_name: String,
    #[serde(default)]
    pub package_status: String,
}

impl PackagePurchase {
    pub fn is_pending(&self) -> bool {
        self.package_status == status::PENDING
    }
}

/// A balance withdrawal awaiting a decision
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub status: String,
}

impl WithdrawalRequest {
    pub fn is_pending(&self) -> bool {
        self.status == status::PENDING
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_request_kind_collections() {
        assert_eq!(RequestKind::PackagePurchase.collection(), "buyPackage");
        assert_eq!(RequestKind::Withdrawal.collection(), "withdraw");
        assert_eq!(RequestKind::PackagePurchase.status_field(), "packageStatus");
        assert_eq!(RequestKind::Withdrawal.status_field(), "status");
    }

    #[test]
    fn test_package_purchase_deserializes_camel_case() {
        let document = doc! {
            "email": "buyer@example.com",
            "planName": "Gold",
            "packageStatus": "Pending",
        };
        let record: PackagePurchase = mongodb::bson::from_document(document).unwrap();
        assert_eq!(record.plan_name, "Gold");
        assert!(record.is_pending());
    }

    #[test]
    fn test_withdrawal_settled_is_not_pending() {
        let document = doc! {
            "email": "seller@example.com",
            "amount": 60.0,
            "status": "Approved",
        };
        let record: WithdrawalRequest = mongodb::bson::from_document(document).unwrap();
        assert!(!record.is_pending());
        assert_eq!(record.amount, 60.0);
    }

    #[test]
    fn test_withdrawal_tolerates_missing_amount() {
        // Requests are client-created documents; a missing amount must not
        // break deserialization, the handler rejects it as invalid instead.
        let document = doc! { "email": "seller@example.com", "status": "Pending" };
        let record: WithdrawalRequest = mongodb::bson::from_document(document).unwrap();
        assert_eq!(record.amount, 0.0);
    }
}
