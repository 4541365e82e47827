use std::sync::Arc;

use charges_types::{
    AppError, Charge, ChargeRepository, Clock, Payment, PaymentAuthorizer, PaymentMethod,
    PaymentRepository, TransactionBoundary, UserRepository,
};
use tracing::{info, warn};

use super::persisted;

/// Settles a pending charge, either from the payer's balance or by card.
pub struct RegisterPaymentService<R, A, C> {
    repo: Arc<R>,
    authorizer: Arc<A>,
    clock: Arc<C>,
}

impl<R, A, C> RegisterPaymentService<R, A, C>
where
    R: UserRepository + ChargeRepository + PaymentRepository + TransactionBoundary,
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

    /// Writes happen in a fixed order: balances, then the charge, then the
    /// payment record. Any failure leaves rollback to the enclosing
    /// transaction.
    #[tracing::instrument(
        skip_all,
        fields(charge_id = ?charge.id(), method = %method.kind(), amount = %charge.amount())
    )]
    pub async fn register(
        &self,
        mut charge: Charge,
        method: PaymentMethod,
    ) -> Result<Payment, AppError> {
        debug_assert!(self.repo.in_transaction());

        let charge_id = persisted(charge.id(), "charge")?;
        if self.repo.payment_exists(charge_id).await? {
            return Err(AppError::IllegalState(format!(
                "payment already exists for charge {}",
                charge_id
            )));
        }
        charge.ensure_pending_status()?;

        if let PaymentMethod::CreditCard(card) = &method {
            if let Err(e) = self.authorizer.authorize_payment(&charge, card).await {
                warn!(card = %card.number().masked(), error = %e, "card payment not authorized");
                return Err(e.into());
            }
        }

        let payment = Payment::new(charge_id, method, self.clock.now());

        if matches!(payment.method(), PaymentMethod::Balance) {
            let amount = charge.amount();
            let mut issuer = self.repo.get_user_or_throw(charge.issuer_id()).await?;
            let mut payer = self.repo.get_user_or_throw(charge.payer_id()).await?;

            if let Err(e) = payer.decrease_balance(amount) {
                warn!(payer_id = %charge.payer_id(), error = %e, "payer cannot cover charge");
                return Err(e.into());
            }
            issuer.increase_balance(amount)?;

            self.repo.save_user(payer).await?;
            self.repo.save_user(issuer).await?;
        }

        charge.change_status_to_paid()?;
        self.repo.save_charge(charge).await?;
        let payment = self.repo.save_payment(payment).await?;

        info!(payment_id = ?payment.id(), "charge paid");
        Ok(payment)
    }
}
