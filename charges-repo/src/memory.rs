//! In-memory repository adapter.
//!
//! Implements every repository port plus the transaction boundary. Units of
//! work run one at a time against a private copy of all tables, which is
//! committed only when the unit succeeds.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use charges_types::{
    AppError, Charge, ChargeId, ChargeRepository, Cpf, Deposit, DepositId, DepositRepository,
    EmailAddress, Payment, PaymentId, PaymentRepository, RepoError, TransactionBoundary, User,
    UserId, UserRepository,
};

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

/// Per-table id sequence, starting at 1.
#[derive(Debug, Clone, Default)]
struct Sequence(i64);

impl Sequence {
    fn next(&mut self) -> i64 {
        self.0 += 1;
        self.0
    }
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    charges: BTreeMap<ChargeId, Charge>,
    payments: BTreeMap<PaymentId, Payment>,
    deposits: BTreeMap<DepositId, Deposit>,
    user_seq: Sequence,
    charge_seq: Sequence,
    payment_seq: Sequence,
    deposit_seq: Sequence,
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory store
// ─────────────────────────────────────────────────────────────────────────────

static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(1);

/// Working copy of one store's tables, visible only to the task running the
/// unit of work.
#[derive(Clone)]
struct UnitOfWork {
    store: u64,
    tables: Arc<Mutex<Tables>>,
}

tokio::task_local! {
    static UNIT_OF_WORK: UnitOfWork;
}

/// In-memory store shared by all services of one process.
///
/// Readers outside a unit of work only ever see committed tables. A unit of
/// work reads and writes a private copy that replaces the committed tables
/// when it returns `Ok`; on `Err` or panic the copy is dropped. Writers are
/// serialized by `gate`.
pub struct InMemoryStore {
    id: u64,
    committed: Mutex<Tables>,
    gate: tokio::sync::Mutex<()>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self {
            id: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            committed: Mutex::new(Tables::default()),
            gate: tokio::sync::Mutex::new(()),
        }
    }
}

fn lock(tables: &Mutex<Tables>) -> Result<MutexGuard<'_, Tables>, RepoError> {
    tables
        .lock()
        .map_err(|_| RepoError::Database("in-memory store lock poisoned".into()))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed payments.
    pub fn payment_count(&self) -> Result<usize, RepoError> {
        self.read(|t| t.payments.len())
    }

    /// Number of committed deposits.
    pub fn deposit_count(&self) -> Result<usize, RepoError> {
        self.read(|t| t.deposits.len())
    }

    /// The current task's working copy, if it runs a unit of work on this store.
    fn working_copy(&self) -> Option<Arc<Mutex<Tables>>> {
        UNIT_OF_WORK
            .try_with(|unit| (unit.store == self.id).then(|| Arc::clone(&unit.tables)))
            .ok()
            .flatten()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, RepoError> {
        match self.working_copy() {
            Some(working) => {
                let tables = lock(&working)?;
                Ok(f(&tables))
            }
            None => {
                let tables = lock(&self.committed)?;
                Ok(f(&tables))
            }
        }
    }

    /// Outside a unit of work the write waits for the gate and lands directly
    /// in the committed tables.
    async fn write<T>(
        &self,
        f: impl FnOnce(&mut Tables) -> Result<T, RepoError> + Send,
    ) -> Result<T, RepoError> {
        match self.working_copy() {
            Some(working) => {
                let mut tables = lock(&working)?;
                f(&mut tables)
            }
            None => {
                let _gate = self.gate.lock().await;
                let mut tables = lock(&self.committed)?;
                f(&mut tables)
            }
        }
    }
}

#[async_trait]
impl TransactionBoundary for InMemoryStore {
    async fn execute<T, F, Fut>(&self, work: F) -> Result<T, AppError>
    where
        T: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, AppError>> + Send,
    {
        // Nested units join the enclosing one.
        if self.in_transaction() {
            return work().await;
        }

        let _gate = self.gate.lock().await;
        let staged = lock(&self.committed)?.clone();
        let working = Arc::new(Mutex::new(staged));
        let unit = UnitOfWork {
            store: self.id,
            tables: Arc::clone(&working),
        };

        let result = UNIT_OF_WORK.scope(unit, async move { work().await }).await;

        match &result {
            Ok(_) => {
                let staged = std::mem::take(&mut *lock(&working)?);
                *lock(&self.committed)? = staged;
                tracing::debug!("unit of work committed");
            }
            Err(err) => tracing::debug!(error = %err, "unit of work rolled back"),
        }
        result
    }

    fn in_transaction(&self) -> bool {
        self.working_copy().is_some()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository implementations
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>, RepoError> {
        self.read(|t| t.users.get(&id).cloned())
    }

    async fn find_user_by_cpf(&self, cpf: &Cpf) -> Result<Option<User>, RepoError> {
        self.read(|t| t.users.values().find(|u| u.cpf() == cpf).cloned())
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> Result<Option<User>, RepoError> {
        self.read(|t| t.users.values().find(|u| u.email() == email).cloned())
    }

    async fn save_user(&self, mut user: User) -> Result<User, RepoError> {
        self.write(move |tables| {
            let clash = tables.users.values().find(|other| {
                other.id() != user.id()
                    && (other.cpf() == user.cpf() || other.email() == user.email())
            });
            if let Some(other) = clash {
                return Err(RepoError::Conflict(format!(
                    "user with CPF {} or email {} already exists",
                    other.cpf().masked(),
                    other.email().masked()
                )));
            }

            let id = match user.id() {
                Some(id) if tables.users.contains_key(&id) => id,
                Some(_) => return Err(RepoError::NotFound),
                None => {
                    let id = UserId::new(tables.user_seq.next())?;
                    user.finalize_creation(id)?;
                    tracing::debug!(user_id = %id, "user inserted");
                    id
                }
            };
            tables.users.insert(id, user.clone());
            Ok(user)
        })
        .await
    }
}

#[async_trait]
impl ChargeRepository for InMemoryStore {
    async fn get_charge(&self, id: ChargeId) -> Result<Option<Charge>, RepoError> {
        self.read(|t| t.charges.get(&id).cloned())
    }

    async fn save_charge(&self, mut charge: Charge) -> Result<Charge, RepoError> {
        self.write(move |tables| {
            let id = match charge.id() {
                Some(id) if tables.charges.contains_key(&id) => id,
                Some(_) => return Err(RepoError::NotFound),
                None => {
                    let id = ChargeId::new(tables.charge_seq.next())?;
                    charge.finalize_creation(id)?;
                    tracing::debug!(charge_id = %id, "charge inserted");
                    id
                }
            };
            tables.charges.insert(id, charge.clone());
            Ok(charge)
        })
        .await
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn payment_exists(&self, charge_id: ChargeId) -> Result<bool, RepoError> {
        self.read(|t| t.payments.values().any(|p| p.charge_id() == charge_id))
    }

    async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>, RepoError> {
        self.read(|t| t.payments.get(&id).cloned())
    }

    async fn find_payment_by_charge(
        &self,
        charge_id: ChargeId,
    ) -> Result<Option<Payment>, RepoError> {
        self.read(|t| {
            t.payments
                .values()
                .find(|p| p.charge_id() == charge_id)
                .cloned()
        })
    }

    async fn save_payment(&self, mut payment: Payment) -> Result<Payment, RepoError> {
        self.write(move |tables| {
            let duplicate = tables
                .payments
                .values()
                .any(|p| p.charge_id() == payment.charge_id() && p.id() != payment.id());
            if duplicate {
                return Err(RepoError::Conflict(format!(
                    "payment already exists for charge {}",
                    payment.charge_id()
                )));
            }

            let id = match payment.id() {
                Some(id) if tables.payments.contains_key(&id) => id,
                Some(_) => return Err(RepoError::NotFound),
                None => {
                    let id = PaymentId::new(tables.payment_seq.next())?;
                    payment.finalize_creation(id)?;
                    tracing::debug!(payment_id = %id, charge_id = %payment.charge_id(), "payment inserted");
                    id
                }
            };
            tables.payments.insert(id, payment.clone());
            Ok(payment)
        })
        .await
    }
}

#[async_trait]
impl DepositRepository for InMemoryStore {
    async fn get_deposit(&self, id: DepositId) -> Result<Option<Deposit>, RepoError> {
        self.read(|t| t.deposits.get(&id).cloned())
    }

    async fn save_deposit(&self, mut deposit: Deposit) -> Result<Deposit, RepoError> {
        self.write(move |tables| {
            let id = match deposit.id() {
                Some(id) if tables.deposits.contains_key(&id) => id,
                Some(_) => return Err(RepoError::NotFound),
                None => {
                    let id = DepositId::new(tables.deposit_seq.next())?;
                    deposit.finalize_creation(id)?;
                    tracing::debug!(deposit_id = %id, user_id = %deposit.user_id(), "deposit inserted");
                    id
                }
            };
            tables.deposits.insert(id, deposit.clone());
            Ok(deposit)
        })
        .await
    }
}
