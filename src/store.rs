//! Store seams used by the transaction runners.
//!
//! The runners only need begin/commit/rollback on the relational side and
//! start/commit/abort/end on the document side. PostgreSQL (through sqlx) is
//! always available; the MongoDB driver is behind the `mongodb` feature.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::TransactionResult;

/// A relational database that can open transactions.
#[async_trait]
pub trait RelationalStore: Send + Sync {
    type Transaction: RelationalTransaction;

    /// Begin a new transaction.
    async fn begin(&self) -> TransactionResult<Self::Transaction>;
}

/// An open relational transaction.
#[async_trait]
pub trait RelationalTransaction: Send + 'static {
    async fn commit(self) -> TransactionResult<()>;

    async fn rollback(self) -> TransactionResult<()>;
}

/// A document database that can open sessions.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    type Session: DocumentSession;

    /// Start a new session. No transaction is open on it yet.
    async fn start_session(&self) -> TransactionResult<Self::Session>;
}

/// A document-store session carrying its own transaction state.
#[async_trait]
pub trait DocumentSession: Send + 'static {
    async fn start_transaction(&mut self) -> TransactionResult<()>;

    async fn commit_transaction(&mut self) -> TransactionResult<()>;

    async fn abort_transaction(&mut self) -> TransactionResult<()>;

    /// Release the session. Called exactly once per runner invocation.
    async fn end_session(self);
}

#[async_trait]
impl RelationalStore for PgPool {
    type Transaction = Transaction<'static, Postgres>;

    async fn begin(&self) -> TransactionResult<Self::Transaction> {
        Ok(sqlx::Pool::begin(self).await?)
    }
}

#[async_trait]
impl RelationalTransaction for Transaction<'static, Postgres> {
    async fn commit(self) -> TransactionResult<()> {
        Ok(sqlx::Transaction::commit(self).await?)
    }

    async fn rollback(self) -> TransactionResult<()> {
        Ok(sqlx::Transaction::rollback(self).await?)
    }
}

#[cfg(feature = "mongodb")]
mod mongo {
    use async_trait::async_trait;
    use mongodb::{Client, ClientSession, Database};

    use super::{DocumentSession, DocumentStore};
    use crate::TransactionResult;

    #[async_trait]
    impl DocumentStore for Client {
        type Session = ClientSession;

        async fn start_session(&self) -> TransactionResult<Self::Session> {
            Ok(Client::start_session(self).await?)
        }
    }

    #[async_trait]
    impl DocumentStore for Database {
        type Session = ClientSession;

        async fn start_session(&self) -> TransactionResult<Self::Session> {
            Ok(Client::start_session(self.client()).await?)
        }
    }

    #[async_trait]
    impl DocumentSession for ClientSession {
        async fn start_transaction(&mut self) -> TransactionResult<()> {
            Ok(ClientSession::start_transaction(self).await?)
        }

        async fn commit_transaction(&mut self) -> TransactionResult<()> {
            Ok(ClientSession::commit_transaction(self).await?)
        }

        async fn abort_transaction(&mut self) -> TransactionResult<()> {
            Ok(ClientSession::abort_transaction(self).await?)
        }

        async fn end_session(self) {
            // the driver returns the server session to its pool on drop
            drop(self);
        }
    }
}
