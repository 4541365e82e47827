use std::sync::Arc;

use charges_types::{
    AppError, Clock, Deposit, DepositRepository, PaymentAuthorizer, PositiveMoney,
    TransactionBoundary, UserId, UserRepository,
};
use tracing::{info, warn};

/// Credits a user's balance with money coming from outside the system.
pub struct CreateDepositService<R, A, C> {
    repo: Arc<R>,
    authorizer: Arc<A>,
    clock: Arc<C>,
}

impl<R, A, C> CreateDepositService<R, A, C>
where
    R: UserRepository + DepositRepository + TransactionBoundary,
    A: PaymentAuthorizer,
    C: Clock,
{
    pub fn new(repo: Arc<R>, authorizer: Arc<A>, clock: Arc<C>) -> Self {
        Self {
            repo,
            authorizer,
            clock,
        }
    }

    #[tracing::instrument(skip_all, fields(user_id = %user_id, amount = %amount))]
    pub async fn deposit(
        &self,
        user_id: UserId,
        amount: PositiveMoney,
    ) -> Result<Deposit, AppError> {
        debug_assert!(self.repo.in_transaction());

        let mut user = self.repo.get_user_or_throw(user_id).await?;
        let deposit = Deposit::new(user_id, amount, self.clock.now());

        // Nothing is written before the authorizer agrees.
        if let Err(e) = self.authorizer.authorize_deposit(&deposit).await {
            warn!(error = %e, "deposit not authorized");
            return Err(e.into());
        }

        let deposit = self.repo.save_deposit(deposit).await?;
        user.increase_balance(amount)?;
        let user = self.repo.save_user(user).await?;

        info!(deposit_id = ?deposit.id(), balance = %user.balance().value(), "deposit credited");
        Ok(deposit)
    }
}
