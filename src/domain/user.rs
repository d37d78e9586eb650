//! User account model
//!
//! User documents are created by the registration endpoint with whatever
//! shape the storefront sends, so every field beyond the email is optional
//! here. The workflow handlers only ever touch `balance`, `isMember` and
//! `subscription.plan`.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub is_member: bool,
    #[serde(default)]
    pub subscription: Option<Subscription>,
    /// Referral code supplied at signup, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Users who signed up citing this account's referral code
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub my_referral_user: Vec<ReferralEntry>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub plan: Option<String>,
}

/// Entry pushed onto the referrer's `myReferralUser` list at signup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferralEntry {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_user_deserializes_from_sparse_document() {
        // Registration inserts raw request bodies, so most fields may be absent.
        let document = doc! { "email": "buyer@example.com" };
        let user: UserAccount = mongodb::bson::from_document(document).unwrap();
        assert_eq!(user.email, "buyer@example.com");
        assert_eq!(user.balance, 0.0);
        assert!(!user.is_member);
        assert!(user.subscription.is_none());
    }

    #[test]
    fn test_user_deserializes_membership_fields() {
        let document = doc! {
            "email": "member@example.com",
            "balance": 250.5,
            "isMember": true,
            "subscription": { "plan": "Gold" },
        };
        let user: UserAccount = mongodb::bson::from_document(document).unwrap();
        assert!(user.is_member);
        assert_eq!(user.balance, 250.5);
        assert_eq!(user.subscription.unwrap().plan.as_deref(), Some("Gold"));
    }
}
