//! Unit tests for the approval workflow handlers
//!
//! The storage-backed paths are covered by the integration tests in
//! tests/integration_api.rs; these cover the command types and the
//! authoritative-field resolution rules.

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::handlers::commands::{resolve_amount, resolve_field};
    use crate::handlers::{PackageDecisionCommand, WithdrawalDecisionCommand};

    // =========================================================================
    // Command construction
    // =========================================================================

    #[test]
    fn test_package_decision_command() {
        let cmd = PackageDecisionCommand::new(
            "655f1e4f2c8b9a0012345678".to_string(),
            "Approved".to_string(),
            "buyer@example.com".to_string(),
        )
        .with_plan_name("Gold".to_string());

        assert_eq!(cmd.status, "Approved");
        assert_eq!(cmd.plan_name, Some("Gold".to_string()));
    }

    #[test]
    fn test_withdrawal_decision_command() {
        let cmd = WithdrawalDecisionCommand::new(
            "655f1e4f2c8b9a0012345678".to_string(),
            "Rejected".to_string(),
            "seller@example.com".to_string(),
        );

        assert_eq!(cmd.status, "Rejected");
        assert!(cmd.amount.is_none());

        let cmd = cmd.with_amount(60.0);
        assert_eq!(cmd.amount, Some(60.0));
    }

    // =========================================================================
    // Authoritative-field resolution
    // =========================================================================

    #[test]
    fn test_resolve_field_prefers_stored_value() {
        let plan = resolve_field("planName", "Gold", None).unwrap();
        assert_eq!(plan, "Gold");

        // Matching caller copy passes the cross-check.
        let plan = resolve_field("planName", "Gold", Some("Gold")).unwrap();
        assert_eq!(plan, "Gold");
    }

    #[test]
    fn test_resolve_field_rejects_mismatch() {
        let result = resolve_field("planName", "Gold", Some("Platinum"));
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_resolve_field_rejects_empty_stored_value() {
        let result = resolve_field("planName", "", None);
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_resolve_field_ignores_empty_caller_copy() {
        // An empty caller string means "not supplied", not a mismatch.
        let email = resolve_field("email", "buyer@example.com", Some("")).unwrap();
        assert_eq!(email, "buyer@example.com");
    }

    #[test]
    fn test_resolve_amount_uses_stored_record() {
        let amount = resolve_amount(60.0, None).unwrap();
        assert_eq!(amount, 60.0);

        let amount = resolve_amount(60.0, Some(60.0)).unwrap();
        assert_eq!(amount, 60.0);
    }

    #[test]
    fn test_resolve_amount_rejects_mismatch() {
        let result = resolve_amount(60.0, Some(600.0));
        assert!(matches!(result, Err(AppError::InvalidRequest(_))));
    }

    #[test]
    fn test_resolve_amount_rejects_non_positive() {
        for stored in [0.0, -25.0] {
            let result = resolve_amount(stored, None);
            assert!(
                matches!(result, Err(AppError::InvalidRequest(_))),
                "expected rejection for amount {stored}"
            );
        }
    }
}
