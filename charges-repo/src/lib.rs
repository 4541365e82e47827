//! # Charges Repository
//!
//! Outbound adapters for the charges service:
//! - `memory` - in-memory store implementing every repository port and the
//!   transaction boundary
//! - `authorizer` - HTTP and static implementations of `PaymentAuthorizer`
//! - `security` - HMAC-SHA256 implementation of `PasswordHasher`

pub mod authorizer;
pub mod memory;
pub mod security;

#[cfg(test)]
mod memory_tests;

pub use authorizer::{HttpPaymentAuthorizer, StaticAuthorizer};
pub use memory::InMemoryStore;
pub use security::HmacPasswordHasher;
