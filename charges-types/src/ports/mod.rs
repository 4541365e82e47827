//! Port traits (interfaces for adapters).
//!
//! These are the contracts that adapters must implement.
//! The service layer depends on these traits, not concrete implementations.

mod authorizer;
mod clock;
mod repository;
mod security;
mod transaction;

pub use authorizer::{AuthorizationError, PaymentAuthorizer};
pub use clock::{Clock, SystemClock};
pub use repository::{
    ChargeRepository, DepositRepository, PaymentRepository, Repositories, UserRepository,
};
pub use security::PasswordHasher;
pub use transaction::TransactionBoundary;
