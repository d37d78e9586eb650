//! Approval workflow handlers
//!
//! The conditional state-transition core: each handler settles a pending
//! request (approve or reject) and reconciles the owning user account so
//! the account mutation and the status transition are visible together or
//! not at all.

mod commands;
mod package_handler;
mod withdrawal_handler;

#[cfg(test)]
mod tests;

pub use commands::*;
pub use package_handler::PackageApprovalHandler;
pub use withdrawal_handler::WithdrawalApprovalHandler;
