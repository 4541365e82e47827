//! Domain services.
//!
//! Each service performs one use case against the repository ports and
//! assumes a transaction is already open around it. Opening that transaction
//! is the job of [`ChargeService`](crate::ChargeService).

mod cancel_charge;
mod create_charge;
mod create_deposit;
mod create_user;
mod register_payment;

pub use cancel_charge::{CancelChargeService, CancelPaymentService};
pub use create_charge::{CreateCharge, CreateChargeService};
pub use create_deposit::CreateDepositService;
pub use create_user::{CreateUser, CreateUserService};
pub use register_payment::RegisterPaymentService;

use charges_types::AppError;

/// Entities read back from a repository always carry an id.
fn persisted<I>(id: Option<I>, entity: &str) -> Result<I, AppError> {
    id.ok_or_else(|| AppError::Internal(format!("stored {} has no id", entity)))
}
