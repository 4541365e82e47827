//! Repository port traits.
//!
//! Adapters implement these; services depend only on the traits. `save_*`
//! inserts when the entity has no id (assigning one through
//! `finalize_creation`) and updates otherwise. Writes are expected to run
//! inside a [`TransactionBoundary`](super::TransactionBoundary).

use crate::domain::{
    Charge, ChargeId, Cpf, Deposit, DepositId, EmailAddress, Payment, PaymentId, User, UserId,
};
use crate::error::{DomainError, RepoError};

#[async_trait::async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError>;

    async fn find_user_by_cpf(&self, cpf: &Cpf) -> Result<Option<User>, RepoError>;

    async fn find_user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepoError>;

    async fn save_user(&self, user: User) -> Result<User, RepoError>;

    async fn get_user_or_throw(&self, id: UserId) -> Result<User, RepoError> {
        self.get_user(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("user {} not found", id)).into())
    }

    /// The error message carries the masked CPF only.
    async fn get_user_by_cpf_or_throw(&self, cpf: &Cpf) -> Result<User, RepoError> {
        self.find_user_by_cpf(cpf).await?.ok_or_else(|| {
            DomainError::NotFound(format!("user with CPF {} not found", cpf.masked())).into()
        })
    }
}

#[async_trait::async_trait]
pub trait ChargeRepository: Send + Sync + 'static {
    async fn get_charge(&self, id: ChargeId) -> Result<Option<Charge>, RepoError>;

    async fn save_charge(&self, charge: Charge) -> Result<Charge, RepoError>;

    async fn get_charge_or_throw(&self, id: ChargeId) -> Result<Charge, RepoError> {
        self.get_charge(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("charge {} not found", id)).into())
    }
}

#[async_trait::async_trait]
pub trait PaymentRepository: Send + Sync + 'static {
    async fn payment_exists(&self, charge_id: ChargeId) -> Result<bool, RepoError>;

    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError>;

    async fn find_payment_by_charge(&self, charge_id: ChargeId)
    -> Result<Option<Payment>, RepoError>;

    /// Fails with `Conflict` when another payment already exists for the
    /// same charge.
    async fn save_payment(&self, payment: Payment) -> Result<Payment, RepoError>;

    async fn get_payment_or_throw(&self, id: PaymentId) -> Result<Payment, RepoError> {
        self.get_payment(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("payment {} not found", id)).into())
    }
}

#[async_trait::async_trait]
pub trait DepositRepository: Send + Sync + 'static {
    async fn get_deposit(&self, id: DepositId) -> Result<Option<Deposit>, RepoError>;

    async fn save_deposit(&self, deposit: Deposit) -> Result<Deposit, RepoError>;
}

/// Every repository plus the transaction boundary, as offered by a single
/// storage adapter.
pub trait Repositories:
    UserRepository
    + ChargeRepository
    + PaymentRepository
    + DepositRepository
    + super::TransactionBoundary
{
}

impl<T> Repositories for T where
    T: UserRepository
        + ChargeRepository
        + PaymentRepository
        + DepositRepository
        + super::TransactionBoundary
{
}
