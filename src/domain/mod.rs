//! Domain models for the storefront entities the workflow core reads.

mod requests;
mod user;

pub use requests::{status, PackagePurchase, RequestKind, WithdrawalRequest};
pub use user::{ReferralEntry, Subscription, UserAccount};
