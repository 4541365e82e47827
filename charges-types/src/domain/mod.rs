//! Domain models for the charges service.

pub mod charge;
pub mod cpf;
pub mod credit_card;
pub mod deposit;
pub mod identity;
pub mod money;
pub mod payment;
pub mod person;
pub mod time;
pub mod user;

pub use charge::{Charge, ChargeStatus, DEFAULT_DUE_DAYS, Description, NewCharge};
pub use cpf::Cpf;
pub use credit_card::{CardNumber, CreditCard, CreditCardFields, ExpirationDate};
pub use deposit::Deposit;
pub use identity::{ChargeId, DepositId, PaymentId, UserId};
pub use money::{Amount, Balance, PositiveMoney};
pub use payment::{Payment, PaymentMethod, PaymentMethodKind};
pub use person::{EmailAddress, PersonName, PlainTextPassword};
pub use time::TimeMillis;
pub use user::{NewUser, User};
