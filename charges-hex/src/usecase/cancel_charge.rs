use std::sync::Arc;

use charges_types::{
    AppError, Charge, ChargeRepository, ChargeStatus, PaymentAuthorizer, PaymentId,
    PaymentMethod, PaymentRepository, TransactionBoundary, UserRepository,
};
use tracing::{info, warn};

use super::persisted;

/// Cancels a charge, undoing its payment first when it was already paid.
///
/// A balance payment is reversed by moving the amount back from the issuer to
/// the payer. A card payment needs the authorizer to approve the refund.
pub struct CancelChargeService<R, A> {
    repo: Arc<R>,
    authorizer: Arc<A>,
}

impl<R, A> CancelChargeService<R, A>
where
    R: UserRepository + ChargeRepository + PaymentRepository + TransactionBoundary,
    A: PaymentAuthorizer,
{
    pub fn new(repo: Arc<R>, authorizer: Arc<A>) -> Self {
        Self { repo, authorizer }
    }

    #[tracing::instrument(skip_all, fields(charge_id = ?charge.id(), status = %charge.status()))]
    pub async fn cancel(&self, mut charge: Charge) -> Result<Charge, AppError> {
        debug_assert!(self.repo.in_transaction());

        match charge.status() {
            ChargeStatus::Pending => {}
            ChargeStatus::Paid => self.undo_payment(&charge).await?,
            status => {
                return Err(AppError::IllegalState(format!(
                    "charge cannot be canceled in its current status: {}",
                    status
                )));
            }
        }

        charge.change_status_to_canceled()?;
        let charge = self.repo.save_charge(charge).await?;

        info!("charge canceled");
        Ok(charge)
    }

    async fn undo_payment(&self, charge: &Charge) -> Result<(), AppError> {
        let charge_id = persisted(charge.id(), "charge")?;
        let payment = self
            .repo
            .find_payment_by_charge(charge_id)
            .await?
            .ok_or_else(|| {
                AppError::IllegalState(format!("paid charge {} has no payment", charge_id))
            })?;

        match payment.method() {
            PaymentMethod::Balance => {
                let amount = charge.amount();
                let mut issuer = self.repo.get_user_or_throw(charge.issuer_id()).await?;
                let mut payer = self.repo.get_user_or_throw(charge.payer_id()).await?;

                if let Err(e) = issuer.decrease_balance(amount) {
                    warn!(issuer_id = %charge.issuer_id(), error = %e, "issuer cannot cover reversal");
                    return Err(e.into());
                }
                payer.increase_balance(amount)?;

                self.repo.save_user(issuer).await?;
                self.repo.save_user(payer).await?;
            }
            PaymentMethod::CreditCard(card) => {
                if let Err(e) = self.authorizer.authorize_cancellation(charge, card).await {
                    warn!(card = %card.number().masked(), error = %e, "card refund not authorized");
                    return Err(e.into());
                }
            }
        }
        Ok(())
    }
}

/// Cancels the charge behind a payment, with the same rules as
/// [`CancelChargeService`].
pub struct CancelPaymentService<R, A> {
    repo: Arc<R>,
    cancel_charge: CancelChargeService<R, A>,
}

impl<R, A> CancelPaymentService<R, A>
where
    R: UserRepository + ChargeRepository + PaymentRepository + TransactionBoundary,
    A: PaymentAuthorizer,
{
    pub fn new(repo: Arc<R>, authorizer: Arc<A>) -> Self {
        Self {
            cancel_charge: CancelChargeService::new(Arc::clone(&repo), authorizer),
            repo,
        }
    }

    #[tracing::instrument(skip_all, fields(payment_id = %payment_id))]
    pub async fn cancel(&self, payment_id: PaymentId) -> Result<Charge, AppError> {
        let payment = self.repo.get_payment_or_throw(payment_id).await?;
        let charge = self.repo.get_charge_or_throw(payment.charge_id()).await?;
        self.cancel_charge.cancel(charge).await
    }
}
