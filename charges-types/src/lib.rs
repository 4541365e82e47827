//! # Charges Types
//!
//! Domain types and port traits for the charges service.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the hexagonal architecture:
//! - `domain/` - Value types (money, ids, CPF, card) and entities (User, Charge, Payment, Deposit)
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Plain request data accepted by the use-case layer
//! - `error/` - Domain, repository and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Amount, Balance, Charge, ChargeId, ChargeStatus, Cpf, CreditCard, CreditCardFields, Deposit,
    DepositId, Description, EmailAddress, NewCharge, NewUser, Payment, PaymentId, PaymentMethod,
    PaymentMethodKind, PersonName, PlainTextPassword, PositiveMoney, TimeMillis, User, UserId,
};
pub use dto::*;
pub use error::{AppError, DomainError, IdentityError, RepoError};
pub use ports::{
    AuthorizationError, ChargeRepository, Clock, DepositRepository, PasswordHasher,
    PaymentAuthorizer, PaymentRepository, Repositories, SystemClock, TransactionBoundary,
    UserRepository,
};
