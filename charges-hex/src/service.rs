//! Charges Application Service
//!
//! Entry point for callers. Turns plain requests into validated value types,
//! then runs each mutating use case inside one transaction of the injected
//! store. Contains NO infrastructure logic - pure business orchestration.

use std::sync::Arc;

use charges_types::{
    AppError, Charge, ChargeId, Clock, Cpf, CreateChargeRequest, CreateDepositRequest,
    CreateUserRequest, CreditCard, CreditCardRequest, Deposit, DepositId, Description,
    EmailAddress, PasswordHasher, Payment, PaymentAuthorizer, PaymentId, PaymentMethod,
    PaymentMethodKind, PersonName, PlainTextPassword, PositiveMoney, RegisterPaymentRequest,
    Repositories, User, UserId,
};

use crate::usecase::{
    CancelChargeService, CancelPaymentService, CreateCharge, CreateChargeService,
    CreateDepositService, CreateUser, CreateUserService, RegisterPaymentService,
};

/// Application service for charge operations.
///
/// Generic over its adapters, which are injected at compile time:
/// - `R` - storage, providing every repository and the transaction boundary
/// - `A` - external payment authorizer
/// - `C` - time source
/// - `H` - password hasher
pub struct ChargeService<R, A, C, H> {
    repo: Arc<R>,
    clock: Arc<C>,
    create_user: CreateUserService<R, C, H>,
    create_charge: CreateChargeService<R, C>,
    register_payment: RegisterPaymentService<R, A, C>,
    cancel_charge: CancelChargeService<R, A>,
    cancel_payment: CancelPaymentService<R, A>,
    create_deposit: CreateDepositService<R, A, C>,
}

impl<R, A, C, H> ChargeService<R, A, C, H>
where
    R: Repositories,
    A: PaymentAuthorizer,
    C: Clock,
    H: PasswordHasher,
{
    pub fn new(repo: Arc<R>, authorizer: Arc<A>, clock: Arc<C>, hasher: Arc<H>) -> Self {
        Self {
            create_user: CreateUserService::new(repo.clone(), clock.clone(), hasher),
            create_charge: CreateChargeService::new(repo.clone(), clock.clone()),
            register_payment: RegisterPaymentService::new(
                repo.clone(),
                authorizer.clone(),
                clock.clone(),
            ),
            cancel_charge: CancelChargeService::new(repo.clone(), authorizer.clone()),
            cancel_payment: CancelPaymentService::new(repo.clone(), authorizer.clone()),
            create_deposit: CreateDepositService::new(repo.clone(), authorizer, clock.clone()),
            repo,
            clock,
        }
    }

    /// Returns a reference to the underlying store.
    pub fn repo(&self) -> &R {
        &self.repo
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // User Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Registers a new user with a zero balance.
    pub async fn create_user(&self, req: CreateUserRequest) -> Result<User, AppError> {
        let cmd = CreateUser {
            name: PersonName::new(&req.name)?,
            cpf: Cpf::new(&req.cpf)?,
            email: EmailAddress::new(&req.email)?,
            password: PlainTextPassword::new(&req.password)?,
        };

        self.repo
            .execute(move || self.create_user.create(cmd))
            .await
    }

    /// Gets a user by ID.
    pub async fn get_user(&self, id: UserId) -> Result<User, AppError> {
        Ok(self.repo.get_user_or_throw(id).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Charge Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Issues a pending charge from the issuer to the payer, both given by CPF.
    pub async fn create_charge(&self, req: CreateChargeRequest) -> Result<Charge, AppError> {
        let cmd = CreateCharge {
            issuer_cpf: Cpf::new(&req.issuer_cpf)?,
            payer_cpf: Cpf::new(&req.payer_cpf)?,
            amount: PositiveMoney::new(req.amount)?,
            description: Description::parse(req.description.as_deref())?,
        };

        self.repo
            .execute(move || self.create_charge.create(cmd))
            .await
    }

    /// Gets a charge by ID.
    pub async fn get_charge(&self, id: ChargeId) -> Result<Charge, AppError> {
        Ok(self.repo.get_charge_or_throw(id).await?)
    }

    /// Cancels a charge, reversing its payment when it was already paid.
    pub async fn cancel_charge(&self, id: ChargeId) -> Result<Charge, AppError> {
        self.repo
            .execute(move || async move {
                let charge = self.repo.get_charge_or_throw(id).await?;
                self.cancel_charge.cancel(charge).await
            })
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Payment Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Pays a pending charge with the requested method.
    pub async fn register_payment(&self, req: RegisterPaymentRequest) -> Result<Payment, AppError> {
        let method = self.payment_method(req.method, req.credit_card.as_ref())?;
        let charge_id = req.charge_id;

        self.repo
            .execute(move || async move {
                let charge = self.repo.get_charge_or_throw(charge_id).await?;
                self.register_payment.register(charge, method).await
            })
            .await
    }

    /// Cancels the charge a payment settled.
    pub async fn cancel_payment(&self, id: PaymentId) -> Result<Charge, AppError> {
        self.repo
            .execute(move || self.cancel_payment.cancel(id))
            .await
    }

    /// Gets a payment by ID.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        Ok(self.repo.get_payment_or_throw(id).await?)
    }

    /// Gets the payment that settled a charge, if any.
    pub async fn find_payment_for_charge(
        &self,
        charge_id: ChargeId,
    ) -> Result<Option<Payment>, AppError> {
        Ok(self.repo.find_payment_by_charge(charge_id).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Deposit Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Credits a user's balance after the authorizer approves the deposit.
    pub async fn create_deposit(&self, req: CreateDepositRequest) -> Result<Deposit, AppError> {
        let amount = PositiveMoney::new(req.amount)?;
        let user_id = req.user_id;

        self.repo
            .execute(move || self.create_deposit.deposit(user_id, amount))
            .await
    }

    /// Gets a deposit by ID.
    pub async fn get_deposit(&self, id: DepositId) -> Result<Deposit, AppError> {
        self.repo
            .get_deposit(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("deposit {} not found", id)))
    }

    /// The card is required for card payments and rejected otherwise.
    fn payment_method(
        &self,
        kind: PaymentMethodKind,
        card: Option<&CreditCardRequest>,
    ) -> Result<PaymentMethod, AppError> {
        match (kind, card) {
            (PaymentMethodKind::Balance, None) => Ok(PaymentMethod::Balance),
            (PaymentMethodKind::Balance, Some(_)) => Err(AppError::Validation(
                "credit card must not be given for BALANCE payments".into(),
            )),
            (PaymentMethodKind::CreditCard, Some(card)) => Ok(PaymentMethod::CreditCard(
                CreditCard::new(card.as_fields(), self.clock.now())?,
            )),
            (PaymentMethodKind::CreditCard, None) => Err(AppError::Validation(
                "credit card is required for CREDIT_CARD payments".into(),
            )),
        }
    }
}
