//! Decision commands
//!
//! Commands represent an admin's decision on a pending request. The stored
//! request record is the authoritative source for the owner email, plan
//! name and amount; the caller-supplied copies are only cross-checked.

use serde::{Deserialize, Serialize};

use crate::db::MutationSummary;
use crate::error::AppError;

/// Decision on a pending package purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageDecisionCommand {
    /// Identifier of the package purchase record
    pub request_id: String,
    /// New status; "Approved" triggers the membership grant
    pub status: String,
    /// Owner email as supplied by the caller
    pub email: String,
    /// Plan name as supplied by the caller
    pub plan_name: Option<String>,
}

impl PackageDecisionCommand {
    pub fn new(request_id: String, status: String, email: String) -> Self {
        Self {
            request_id,
            status,
            email,
            plan_name: None,
        }
    }

    pub fn with_plan_name(mut self, plan_name: String) -> Self {
        self.plan_name = Some(plan_name);
        self
    }
}

/// Decision on a pending withdrawal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalDecisionCommand {
    /// Identifier of the withdrawal record
    pub request_id: String,
    /// New status; "Approved" triggers the balance debit
    pub status: String,
    /// Owner email as supplied by the caller
    pub email: String,
    /// Amount as supplied by the caller
    pub amount: Option<f64>,
}

impl WithdrawalDecisionCommand {
    pub fn new(request_id: String, status: String, email: String) -> Self {
        Self {
            request_id,
            status,
            email,
            amount: None,
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// Result of a settled decision
#[derive(Debug, Clone, Serialize)]
pub struct DecisionResult {
    pub message: String,
    pub result: MutationSummary,
}

// =========================================================================
// Authoritative-field resolution
// =========================================================================

/// Resolve a string field from the stored record, cross-checking any
/// caller-supplied copy.
pub(crate) fn resolve_field(
    field: &str,
    stored: &str,
    supplied: Option<&str>,
) -> Result<String, AppError> {
    if let Some(supplied) = supplied.filter(|s| !s.is_empty()) {
        if supplied != stored {
            return Err(AppError::InvalidRequest(format!(
                "{field} does not match the stored request"
            )));
        }
    }
    if stored.is_empty() {
        return Err(AppError::InvalidRequest(format!(
            "Stored request has no {field}"
        )));
    }
    Ok(stored.to_string())
}

/// Resolve the withdrawal amount from the stored record, cross-checking
/// any caller-supplied copy. Must be strictly positive.
pub(crate) fn resolve_amount(stored: f64, supplied: Option<f64>) -> Result<f64, AppError> {
    if let Some(supplied) = supplied {
        if supplied != stored {
            return Err(AppError::InvalidRequest(
                "amount does not match the stored request".to_string(),
            ));
        }
    }
    if !(stored > 0.0) {
        return Err(AppError::InvalidRequest(
            "Withdrawal amount must be positive".to_string(),
        ));
    }
    Ok(stored)
}
