use std::sync::Arc;

use charges_types::domain::DEFAULT_DUE_DAYS;
use charges_types::{
    AppError, Charge, ChargeRepository, Clock, Cpf, Description, NewCharge, PositiveMoney,
    TransactionBoundary, UserRepository,
};
use tracing::info;

use super::persisted;

/// Validated input for issuing a charge.
#[derive(Debug, Clone)]
pub struct CreateCharge {
    pub issuer_cpf: Cpf,
    pub payer_cpf: Cpf,
    pub amount: PositiveMoney,
    pub description: Option<Description>,
}

/// Issues a pending charge from one user to another.
///
/// Creating a charge records an obligation only; no balance moves until the
/// charge is paid.
pub struct CreateChargeService<R, C> {
    repo: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> CreateChargeService<R, C>
where
    R: UserRepository + ChargeRepository + TransactionBoundary,
    C: Clock,
{
    pub fn new(repo: Arc<R>, clock: Arc<C>) -> Self {
        Self { repo, clock }
    }

    #[tracing::instrument(
        skip_all,
        fields(issuer = %cmd.issuer_cpf, payer = %cmd.payer_cpf, amount = %cmd.amount)
    )]
    pub async fn create(&self, cmd: CreateCharge) -> Result<Charge, AppError> {
        debug_assert!(self.repo.in_transaction());

        let issuer = self.repo.get_user_by_cpf_or_throw(&cmd.issuer_cpf).await?;
        let payer = self.repo.get_user_by_cpf_or_throw(&cmd.payer_cpf).await?;

        let created_at = self.clock.now();
        let charge = Charge::new(NewCharge {
            issuer_id: persisted(issuer.id(), "user")?,
            payer_id: persisted(payer.id(), "user")?,
            amount: cmd.amount,
            description: cmd.description,
            created_at,
            due_at: created_at.plus_days(DEFAULT_DUE_DAYS)?,
        })?;
        let charge = self.repo.save_charge(charge).await?;

        info!(charge_id = ?charge.id(), due_at = %charge.due_at(), "charge created");
        Ok(charge)
    }
}
