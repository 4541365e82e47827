//! Charge domain model and its status machine.

use serde::{Deserialize, Serialize};

use super::identity::{ChargeId, UserId, assign_once};
use super::money::PositiveMoney;
use super::time::TimeMillis;
use crate::error::{DomainError, IdentityError};

/// Days between issuing a charge and its due date.
pub const DEFAULT_DUE_DAYS: i64 = 30;

/// Maximum length of a charge description, in characters.
pub const DESCRIPTION_MAX: usize = 70;

/// Lifecycle of a charge.
///
/// ```text
/// PENDING ──► PAID ──► CANCELED
///    └────────────────────▲
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChargeStatus {
    Pending,
    Paid,
    Canceled,
}

impl std::fmt::Display for ChargeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChargeStatus::Pending => write!(f, "PENDING"),
            ChargeStatus::Paid => write!(f, "PAID"),
            ChargeStatus::Canceled => write!(f, "CANCELED"),
        }
    }
}

/// Optional free-text description: trimmed, at most 70 characters, blank
/// input becomes `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Description(String);

impl Description {
    pub fn parse(raw: Option<&str>) -> Result<Option<Self>, DomainError> {
        let Some(text) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
            return Ok(None);
        };
        if text.chars().count() > DESCRIPTION_MAX {
            return Err(DomainError::Validation(format!(
                "description must have at most {} characters",
                DESCRIPTION_MAX
            )));
        }
        Ok(Some(Self(text.to_string())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Fields of a charge that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewCharge {
    pub issuer_id: UserId,
    pub payer_id: UserId,
    pub amount: PositiveMoney,
    pub description: Option<Description>,
    pub created_at: TimeMillis,
    pub due_at: TimeMillis,
}

/// An obligation for `payer_id` to pay `issuer_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charge {
    id: Option<ChargeId>,
    issuer_id: UserId,
    payer_id: UserId,
    amount: PositiveMoney,
    description: Option<Description>,
    created_at: TimeMillis,
    due_at: TimeMillis,
    status: ChargeStatus,
}

impl Charge {
    /// Creates a `PENDING` charge.
    ///
    /// # Validation
    /// - issuer and payer must differ
    /// - `due_at` must be strictly after `created_at`
    pub fn new(new: NewCharge) -> Result<Self, DomainError> {
        if new.issuer_id == new.payer_id {
            return Err(DomainError::validation(
                "issuer and payer of a charge must be different users",
            ));
        }
        if !new.due_at.is_after(new.created_at) {
            return Err(DomainError::validation(
                "due date must be after the creation date",
            ));
        }
        Ok(Self {
            id: None,
            issuer_id: new.issuer_id,
            payer_id: new.payer_id,
            amount: new.amount,
            description: new.description,
            created_at: new.created_at,
            due_at: new.due_at,
            status: ChargeStatus::Pending,
        })
    }

    /// Assigns the storage id. Callable once.
    pub fn finalize_creation(&mut self, id: ChargeId) -> Result<(), IdentityError> {
        assign_once(&mut self.id, id, "charge")
    }

    pub fn id(&self) -> Option<ChargeId> {
        self.id
    }

    pub fn issuer_id(&self) -> UserId {
        self.issuer_id
    }

    pub fn payer_id(&self) -> UserId {
        self.payer_id
    }

    pub fn amount(&self) -> PositiveMoney {
        self.amount
    }

    pub fn description(&self) -> Option<&Description> {
        self.description.as_ref()
    }

    pub fn created_at(&self) -> TimeMillis {
        self.created_at
    }

    pub fn due_at(&self) -> TimeMillis {
        self.due_at
    }

    pub fn status(&self) -> ChargeStatus {
        self.status
    }

    pub fn ensure_pending_status(&self) -> Result<(), DomainError> {
        if self.status != ChargeStatus::Pending {
            return Err(DomainError::illegal_state("charge is not pending"));
        }
        Ok(())
    }

    pub fn ensure_not_canceled_status(&self) -> Result<(), DomainError> {
        if self.status == ChargeStatus::Canceled {
            return Err(DomainError::illegal_state("charge is already canceled"));
        }
        Ok(())
    }

    /// PENDING -> PAID.
    pub fn change_status_to_paid(&mut self) -> Result<(), DomainError> {
        self.ensure_pending_status()?;
        self.status = ChargeStatus::Paid;
        Ok(())
    }

    /// PENDING | PAID -> CANCELED.
    pub fn change_status_to_canceled(&mut self) -> Result<(), DomainError> {
        self.ensure_not_canceled_status()?;
        self.status = ChargeStatus::Canceled;
        Ok(())
    }
}
