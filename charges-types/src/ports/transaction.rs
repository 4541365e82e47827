//! Transaction boundary port.

use std::future::Future;

use crate::error::AppError;

/// Runs a unit of work so that every repository write issued inside it
/// commits or rolls back together.
///
/// The caller of a use case opens the boundary; domain services assume one is
/// already active and never start their own.
#[async_trait::async_trait]
pub trait TransactionBoundary: Send + Sync + 'static {
    /// Runs `work` atomically. An `Err` from `work` rolls back every write it
    /// issued and is returned unchanged.
    async fn execute<T, F, Fut>(&self, work: F) -> Result<T, AppError>
    where
        T: Send,
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<T, AppError>> + Send;

    /// True while a unit of work started by [`execute`](Self::execute) is
    /// running.
    fn in_transaction(&self) -> bool;
}
