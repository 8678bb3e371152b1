use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::{TransactionError, TransactionResult};

/// Executor wraps an open relational transaction for use by repositories.
///
/// The runner hands an `Executor` to the unit of work. Clones share the same
/// transaction, so several repositories can take part in one unit of work.
/// Once the unit of work returns, the runner takes the transaction back to
/// commit or roll it back; clones kept past that point see
/// [`TransactionError::TransactionClosed`].
#[derive(Debug)]
pub struct Executor<T = Transaction<'static, Postgres>> {
    tx: Arc<Mutex<Option<T>>>,
}

impl<T> Clone for Executor<T> {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}

impl<T> Executor<T> {
    /// Creates a new Executor from an open transaction.
    pub fn new(tx: T) -> Self {
        Self {
            tx: Arc::new(Mutex::new(Some(tx))),
        }
    }

    /// Locks the transaction for a statement.
    ///
    /// The guard derefs to the transaction itself; drop it before awaiting
    /// another repository call on the same executor.
    pub async fn lock(&self) -> TransactionResult<TransactionGuard<'_, T>> {
        let guard = self.tx.lock().await;
        if guard.is_none() {
            return Err(TransactionError::TransactionClosed);
        }
        Ok(TransactionGuard { guard })
    }

    /// Takes ownership of the transaction, leaving None in its place.
    /// This should only be called when committing or rolling back.
    pub(crate) async fn take_transaction(&self) -> TransactionResult<T> {
        self.tx
            .lock()
            .await
            .take()
            .ok_or(TransactionError::TransactionClosed)
    }
}

/// Exclusive access to the transaction held by an [`Executor`].
pub struct TransactionGuard<'a, T> {
    guard: MutexGuard<'a, Option<T>>,
}

impl<T> std::ops::Deref for TransactionGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        // `lock` only builds a guard over a present transaction, and only the
        // runner empties the slot, which requires this same mutex.
        match self.guard.as_ref() {
            Some(tx) => tx,
            None => unreachable!("transaction guard over an empty slot"),
        }
    }
}

impl<T> std::ops::DerefMut for TransactionGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        match self.guard.as_mut() {
            Some(tx) => tx,
            None => unreachable!("transaction guard over an empty slot"),
        }
    }
}
