//! Transaction runners.
//!
//! [`db_transaction`] wraps a unit of work in one relational transaction.
//! [`db_transaction_with_session`] additionally opens a document-store session
//! and transaction, and drives both stores from the same outcome. The two
//! stores commit independently: there is no atomicity across them.

use futures::FutureExt;
use serde::Deserialize;
use std::any::Any;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

use crate::store::{DocumentSession, DocumentStore, RelationalStore, RelationalTransaction};
use crate::{Executor, SessionContext, TransactionError, TransactionResult};

/// What the dual-store runner does when a commit fails after the unit of work
/// succeeded.
///
/// Both commits are always attempted and every failure is logged. `Surface`
/// also returns [`TransactionError::CommitFailed`]; `LogOnly` reports success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitFailurePolicy {
    #[default]
    Surface,
    LogOnly,
}

/// How a unit of work ended.
enum Outcome<R, E> {
    Panicked(Box<dyn Any + Send + 'static>),
    Failed(E),
    Succeeded(R),
}

impl<R, E> Outcome<R, E> {
    async fn capture<Fut>(work: Fut) -> Self
    where
        Fut: Future<Output = Result<R, E>>,
    {
        match AssertUnwindSafe(work).catch_unwind().await {
            Err(payload) => Outcome::Panicked(payload),
            Ok(Err(err)) => Outcome::Failed(err),
            Ok(Ok(value)) => Outcome::Succeeded(value),
        }
    }
}

/// Runs `f` inside a relational transaction.
///
/// The transaction is committed when `f` returns `Ok` and rolled back when it
/// returns `Err` or panics. A panic is re-raised after the rollback. Begin and
/// commit failures are returned through `E`; rollback failures are only logged
/// so they never hide the error that caused them.
pub async fn db_transaction<S, F, Fut, R, E>(db: &S, f: F) -> Result<R, E>
where
    S: RelationalStore + ?Sized,
    F: FnOnce(Executor<S::Transaction>) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: From<TransactionError>,
{
    let tx = db.begin().await?;
    let executor = Executor::new(tx);

    let work = executor.clone();
    let outcome = Outcome::capture(async move { f(work).await }).await;
    let tx = executor.take_transaction().await;

    match outcome {
        Outcome::Panicked(payload) => {
            rollback_reclaimed(tx).await;
            panic::resume_unwind(payload)
        }
        Outcome::Failed(err) => {
            rollback_reclaimed(tx).await;
            Err(err)
        }
        Outcome::Succeeded(value) => {
            tx?.commit().await?;
            debug!("relational transaction committed");
            Ok(value)
        }
    }
}

/// Runs `f` inside a relational transaction and a document-store transaction,
/// using [`CommitFailurePolicy::default`].
pub async fn db_transaction_with_session<D, S, F, Fut, R, E>(
    docs: &D,
    db: &S,
    f: F,
) -> Result<R, E>
where
    D: DocumentStore + ?Sized,
    S: RelationalStore + ?Sized,
    F: FnOnce(Executor<S::Transaction>, SessionContext<D::Session>) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: From<TransactionError>,
{
    db_transaction_with_session_policy(docs, db, CommitFailurePolicy::default(), f).await
}

/// Runs `f` inside a relational transaction and a document-store transaction.
///
/// Sequence: begin the relational transaction, start a session, start a
/// document transaction, run `f`. Then:
///
/// - panic: roll back, abort, end the session and re-raise the panic;
/// - `Err`: roll back, abort, return the error;
/// - `Ok`: commit the document transaction, then the relational one even if
///   the first commit failed. Failures are handled per `policy`.
///
/// The session is ended exactly once on every path that started it.
pub async fn db_transaction_with_session_policy<D, S, F, Fut, R, E>(
    docs: &D,
    db: &S,
    policy: CommitFailurePolicy,
    f: F,
) -> Result<R, E>
where
    D: DocumentStore + ?Sized,
    S: RelationalStore + ?Sized,
    F: FnOnce(Executor<S::Transaction>, SessionContext<D::Session>) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: From<TransactionError>,
{
    let tx = db.begin().await?;

    let mut session = match docs.start_session().await {
        Ok(session) => session,
        Err(err) => {
            rollback_logged(tx).await;
            return Err(err.into());
        }
    };

    if let Err(err) = session.start_transaction().await {
        rollback_logged(tx).await;
        session.end_session().await;
        return Err(err.into());
    }

    let executor = Executor::new(tx);
    let context = SessionContext::new(session);

    let (work, work_session) = (executor.clone(), context.clone());
    let outcome = Outcome::capture(async move { f(work, work_session).await }).await;
    let mut finalizer = DualFinalizer {
        tx: executor.take_transaction().await.ok(),
        session: context.take_session().await.ok(),
    };

    match outcome {
        Outcome::Panicked(payload) => {
            finalizer.abort().await;
            finalizer.release().await;
            panic::resume_unwind(payload)
        }
        Outcome::Failed(err) => {
            finalizer.abort().await;
            finalizer.release().await;
            Err(err)
        }
        Outcome::Succeeded(value) => {
            let committed = finalizer.commit(policy).await;
            finalizer.release().await;
            committed?;
            Ok(value)
        }
    }
}

/// Both resources of a dual-store invocation, reclaimed from the unit of work.
struct DualFinalizer<T, S> {
    tx: Option<T>,
    session: Option<S>,
}

impl<T, S> DualFinalizer<T, S>
where
    T: RelationalTransaction,
    S: DocumentSession,
{
    async fn abort(&mut self) {
        match self.tx.take() {
            Some(tx) => rollback_logged(tx).await,
            None => error!("Relational transaction unavailable for rollback"),
        }
        match self.session.as_mut() {
            Some(session) => {
                if let Err(err) = session.abort_transaction().await {
                    warn!("Failed to abort document store transaction: {err}");
                }
            }
            None => error!("Document store session unavailable for abort"),
        }
    }

    async fn commit(&mut self, policy: CommitFailurePolicy) -> TransactionResult<()> {
        let mut failures = Vec::new();

        match self.session.as_mut() {
            Some(session) => match session.commit_transaction().await {
                Ok(()) => debug!("document store transaction committed"),
                Err(err) => {
                    error!("Error committing document store transaction: {err}");
                    failures.push(format!("document store: {err}"));
                }
            },
            None => {
                error!("Document store session unavailable for commit");
                failures.push("document store: session unavailable".to_string());
            }
        }

        match self.tx.take() {
            Some(tx) => match tx.commit().await {
                Ok(()) => debug!("relational transaction committed"),
                Err(err) => {
                    error!("Error committing relational transaction: {err}");
                    failures.push(format!("relational: {err}"));
                }
            },
            None => {
                error!("Relational transaction unavailable for commit");
                failures.push("relational: transaction unavailable".to_string());
            }
        }

        if failures.is_empty() || policy == CommitFailurePolicy::LogOnly {
            Ok(())
        } else {
            Err(TransactionError::CommitFailed(failures.join("; ")))
        }
    }

    async fn release(&mut self) {
        if let Some(session) = self.session.take() {
            session.end_session().await;
        }
    }
}

async fn rollback_reclaimed<T: RelationalTransaction>(tx: TransactionResult<T>) {
    match tx {
        Ok(tx) => rollback_logged(tx).await,
        Err(err) => error!("Relational transaction unavailable for rollback: {err}"),
    }
}

async fn rollback_logged<T: RelationalTransaction>(tx: T) {
    match tx.rollback().await {
        Ok(()) => debug!("relational transaction rolled back"),
        Err(err) => warn!("Failed to roll back relational transaction: {err}"),
    }
}
