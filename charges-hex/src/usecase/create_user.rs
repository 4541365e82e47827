use std::sync::Arc;

use charges_types::{
    AppError, Clock, Cpf, EmailAddress, NewUser, PasswordHasher, PersonName, PlainTextPassword,
    TransactionBoundary, User, UserRepository,
};
use tracing::info;

/// Validated input for user registration.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: PersonName,
    pub cpf: Cpf,
    pub email: EmailAddress,
    pub password: PlainTextPassword,
}

/// Registers a user with a zero balance.
pub struct CreateUserService<R, C, H> {
    repo: Arc<R>,
    clock: Arc<C>,
    hasher: Arc<H>,
}

impl<R, C, H> CreateUserService<R, C, H>
where
    R: UserRepository + TransactionBoundary,
    C: Clock,
    H: PasswordHasher,
{
    pub fn new(repo: Arc<R>, clock: Arc<C>, hasher: Arc<H>) -> Self {
        Self {
            repo,
            clock,
            hasher,
        }
    }

    #[tracing::instrument(skip_all, fields(cpf = %cmd.cpf, email = %cmd.email))]
    pub async fn create(&self, cmd: CreateUser) -> Result<User, AppError> {
        debug_assert!(self.repo.in_transaction());

        if self.repo.find_user_by_cpf(&cmd.cpf).await?.is_some() {
            return Err(AppError::IllegalState(format!(
                "user with CPF {} already exists",
                cmd.cpf.masked()
            )));
        }
        if self.repo.find_user_by_email(&cmd.email).await?.is_some() {
            return Err(AppError::IllegalState(format!(
                "user with email {} already exists",
                cmd.email.masked()
            )));
        }

        let user = User::new(NewUser {
            name: cmd.name,
            cpf: cmd.cpf,
            email: cmd.email,
            password_hash: self.hasher.hash(&cmd.password),
            created_at: self.clock.now(),
        })?;
        let user = self.repo.save_user(user).await?;

        info!(user_id = ?user.id(), "user registered");
        Ok(user)
    }
}
