//! Package purchase approval workflow
//!
//! Approving a pending package purchase grants the owner membership
//! (`subscription.plan`, `isMember`) and then transitions the record's
//! `packageStatus`. The membership grant runs first and the transition is
//! guarded on the record still being `Pending`, so a retried or duplicate
//! decision cannot re-apply the side effect.

use mongodb::bson::{doc, Document};
use mongodb::Database;

use crate::db::collections;
use crate::domain::{status, PackagePurchase, RequestKind};
use crate::error::AppError;

use super::commands::{resolve_field, DecisionResult, PackageDecisionCommand};

/// Handler for package purchase decisions
pub struct PackageApprovalHandler {
    db: Database,
}

impl PackageApprovalHandler {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Execute the decision command
    pub async fn execute(&self, command: PackageDecisionCommand) -> Result<DecisionResult, AppError> {
        if command.status.trim().is_empty() || command.email.trim().is_empty() {
            return Err(AppError::InvalidRequest(
                "Missing required fields".to_string(),
            ));
        }

        let kind = RequestKind::PackagePurchase;
        let request_oid = crate::db::parse_object_id(&command.request_id)?;
        let requests = self.db.collection::<PackagePurchase>(kind.collection());

        let record = requests
            .find_one(doc! { "_id": request_oid }, None)
            .await?
            .ok_or_else(|| AppError::RequestNotFound {
                kind: kind.label(),
                id: command.request_id.clone(),
            })?;

        if !record.is_pending() {
            return Err(AppError::RequestAlreadySettled(record.package_status));
        }

        let email = resolve_field("email", &record.email, Some(&command.email))?;

        if command.status == status::APPROVED {
            let plan_name =
                resolve_field("planName", &record.plan_name, command.plan_name.as_deref())?;

            // Existence check and membership grant in a single update; a
            // missing user matches nothing and mutates nothing.
            let users = self.db.collection::<Document>(collections::USERS);
            let grant = users
                .update_one(
                    doc! { "email": &email },
                    doc! { "$set": { "subscription.plan": &plan_name, "isMember": true } },
                    None,
                )
                .await?;

            if grant.matched_count == 0 {
                return Err(AppError::UserNotFound(email));
            }

            tracing::info!(email = %email, plan = %plan_name, "membership granted");
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
            // A concurrent decision settled the record between our read and
            // the transition. The membership grant is idempotent for an
            // identical re-approval; anything else needs operator attention.
            tracing::error!(
                request_id = %command.request_id,
                "package request settled concurrently after membership grant"
            );
            let current = requests
                .find_one(doc! { "_id": request_oid }, None)
                .await?
                .map(|r| r.package_status)
                .unwrap_or_else(|| "unknown".to_string());
            return Err(AppError::RequestAlreadySettled(current));
        }

        Ok(DecisionResult {
            message: "Package status updated successfully".to_string(),
            result: transition.into(),
        })
    }
}
