//! # Charges Hex
//!
//! Application layer for the charges service.
//!
//! ## Architecture
//!
//! - `usecase/` - Domain services, one per use case, run inside an open transaction
//! - `service` - `ChargeService` facade (validates requests, opens the transaction)
//!
//! Everything is generic over the port traits from `charges-types`, so
//! storage, authorizer, clock and hasher are injected by the binary or tests.

pub mod service;
pub mod usecase;


pub use service::ChargeService;
