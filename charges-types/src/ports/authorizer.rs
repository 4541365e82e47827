//! External authorization port.
//!
//! The authorizer is an opaque yes/no service consulted before card
//! payments, card cancellations and deposits take effect.

use crate::domain::{Charge, CreditCard, Deposit};

/// Error type for authorization calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthorizationError {
    #[error("authorization declined: {0}")]
    Declined(String),

    #[error("authorizer unavailable: {0}")]
    Unavailable(String),
}

#[async_trait::async_trait]
pub trait PaymentAuthorizer: Send + Sync + 'static {
    async fn authorize_payment(
        &self,
        charge: &Charge,
        card: &CreditCard,
    ) -> Result<(), AuthorizationError>;

    async fn authorize_cancellation(
        &self,
        charge: &Charge,
        card: &CreditCard,
    ) -> Result<(), AuthorizationError>;

    async fn authorize_deposit(&self, deposit: &Deposit) -> Result<(), AuthorizationError>;
}
