//! Payment domain model.

use serde::{Deserialize, Serialize};

use super::credit_card::CreditCard;
use super::identity::{ChargeId, PaymentId, assign_once};
use super::time::TimeMillis;
use crate::error::IdentityError;

/// How a charge is settled, without the card data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethodKind {
    Balance,
    CreditCard,
}

impl std::fmt::Display for PaymentMethodKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethodKind::Balance => write!(f, "BALANCE"),
            PaymentMethodKind::CreditCard => write!(f, "CREDIT_CARD"),
        }
    }
}

/// How a charge is settled. A card is present exactly when the method is
/// `CreditCard`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "method", content = "credit_card", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Balance,
    CreditCard(CreditCard),
}

impl PaymentMethod {
    pub fn kind(&self) -> PaymentMethodKind {
        match self {
            PaymentMethod::Balance => PaymentMethodKind::Balance,
            PaymentMethod::CreditCard(_) => PaymentMethodKind::CreditCard,
        }
    }

    pub fn credit_card(&self) -> Option<&CreditCard> {
        match self {
            PaymentMethod::Balance => None,
            PaymentMethod::CreditCard(card) => Some(card),
        }
    }
}

/// Record of how and when a charge was settled. One per charge.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    id: Option<PaymentId>,
    charge_id: ChargeId,
    #[serde(flatten)]
    method: PaymentMethod,
    paid_at: TimeMillis,
}

impl Payment {
    pub fn new(charge_id: ChargeId, method: PaymentMethod, paid_at: TimeMillis) -> Self {
        Self {
            id: None,
            charge_id,
            method,
            paid_at,
        }
    }

    /// Assigns the storage id. Callable once.
    pub fn finalize_creation(&mut self, id: PaymentId) -> Result<(), IdentityError> {
        assign_once(&mut self.id, id, "payment")
    }

    pub fn id(&self) -> Option<PaymentId> {
        self.id
    }

    pub fn charge_id(&self) -> ChargeId {
        self.charge_id
    }

    pub fn method(&self) -> &PaymentMethod {
        &self.method
    }

    pub fn paid_at(&self) -> TimeMillis {
        self.paid_at
    }
}
