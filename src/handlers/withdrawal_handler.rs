//! Withdrawal approval workflow
//!
//! Approving a pending withdrawal debits the owner's balance and then
//! transitions the record's `status`. The balance check and the debit are a
//! single conditional update (`balance >= amount` in the filter), so
//! concurrent approvals can never drive a balance negative; the status
//! transition is guarded on the record still being `Pending`, so a retried
//! decision cannot debit twice.

use mongodb::bson::{doc, Document};
use mongodb::Database;

use crate::db::collections;
use crate::domain::{status, RequestKind, UserAccount, WithdrawalRequest};
use crate::error::AppError;

use super::commands::{resolve_amount, resolve_field, DecisionResult, WithdrawalDecisionCommand};

/// Handler for withdrawal decisions
pub struct WithdrawalApprovalHandler {
    db: Database,
}

impl WithdrawalApprovalHandler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Execute the decision command
    pub async fn execute(
        &self,
        command: WithdrawalDecisionCommand,
    ) -> Result<DecisionResult, AppError> {
        if command.status.trim().is_empty() || command.email.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Missing required fields".to_string(),
            ));
        }

        let kind = RequestKind::Withdrawal;
        let request_oid = crate::db::parse_object_id(&command.request_id)?;
        let requests = self.db.collection::<WithdrawalRequest>(kind.collection());

        let record = requests
            .find_one(doc! { "_id": request_oid }, None)
            .await?
            .ok_or_else(|| AppError::RequestNotFound {
                kind: kind.label(),
                id: command.request_id.clone(),
            })?;

        if !record.is_pending() {
            return Err(AppError::RequestAlreadySettled(record.status));
        }

        let email = resolve_field("email", &record.email, Some(&command.email))?;
        let mut debited = 0.0;

        if command.status == status::APPROVED {
            let amount = resolve_amount(record.amount, command.amount)?;

            // A missing user and an underfunded user both fail the debit
            // filter; look the account up first to tell them apart.
            let account = self
                .db
                .collection::<UserAccount>(collections::USERS)
                .find_one(doc! { "email": &email }, None)
                .await?
                .ok_or_else(|| AppError::UserNotFound(email.clone()))?;

            // Check and debit as one conditional update. Two approvals that
            // jointly exceed the balance cannot both match.
            let users = self.db.collection::<Document>(collections::USERS);
            let debit = users
                .update_one(
                    doc! { "email": &email, "balance": { "$gte": amount } },
                    doc! { "$inc": { "balance": -amount } },
                    None,
                )
                .await?;

            if debit.matched_count == 0 {
                tracing::debug!(
                    email = %email,
                    balance = account.balance,
                    amount,
                    "withdrawal rejected: balance below requested amount"
                );
                return Err(AppError::InsufficientBalance);
            }

            debited = amount;
            tracing::info!(email = %email, amount, "balance debited for withdrawal");
        }

        // Guarded transition: only a still-pending record can be settled.
        let transition = requests
            .update_one(
                doc! { "_id": request_oid, (kind.status_field()): status::PENDING },
                doc! { "$set": { (kind.status_field()): &command.status } },
                None,
            )
            .await?;

        if transition.matched_count == 0 {
            // A concurrent decision settled the record after our debit
            // applied. Credit the amount back so the debit and the
            // transition remain visible together or not at all.
            if debited > 0.0 {
                let users = self.db.collection::<Document>(collections::USERS);
                users
                    .update_one(
                        doc! { "email": &email },
                        doc! { "$inc": { "balance": debited } },
                        None,
                    )
                    .await?;
                tracing::warn!(
                    request_id = %command.request_id,
                    email = %email,
                    amount = debited,
                    "withdrawal settled concurrently; debit credited back"
                );
            }
            let current = requests
                .find_one(doc! { "_id": request_oid }, None)
                .await?
                .map(|r| r.status)
                .unwrap_or_else(|| "unknown".to_string());
            return Err(AppError::RequestAlreadySettled(current));
        }

        Ok(DecisionResult {
            message: "Withdraw status updated successfully".to_string(),
            result: transition.into(),
        })
    }
}
