use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

use ops_util::{
    DocumentSession, DocumentStore, RelationalStore, RelationalTransaction, TransactionError,
    TransactionResult,
};

/// Store calls observed by the recording stores, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin,
    Commit,
    Rollback,
    Write(String),
    SessionStart,
    TransactionStart,
    DocumentWrite(String),
    DocumentCommit,
    DocumentAbort,
    SessionEnd,
}

/// Which store calls should fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct Failures {
    pub begin: bool,
    pub commit: bool,
    pub rollback: bool,
    pub session_start: bool,
    pub transaction_start: bool,
    pub document_commit: bool,
    pub document_abort: bool,
}

#[derive(Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Event>>>,
    failures: Failures,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(failures: Failures) -> Self {
        Self {
            events: Arc::default(),
            failures,
        }
    }

    pub fn relational(&self) -> RecordingDb {
        RecordingDb {
            recorder: self.clone(),
        }
    }

    pub fn documents(&self) -> RecordingDocs {
        RecordingDocs {
            recorder: self.clone(),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn count(&self, event: &Event) -> usize {
        self.events.lock().iter().filter(|e| *e == event).count()
    }

    fn record(&self, event: Event) {
        self.events.lock().push(event);
    }
}

/// Relational store that records every call instead of talking to a server.
pub struct RecordingDb {
    recorder: Recorder,
}

pub struct RecordingTx {
    recorder: Recorder,
}

impl RecordingTx {
    pub fn write(&mut self, row: &str) {
        self.recorder.record(Event::Write(row.to_string()));
    }
}

#[async_trait]
impl RelationalStore for RecordingDb {
    type Transaction = RecordingTx;

    async fn begin(&self) -> TransactionResult<RecordingTx> {
        self.recorder.record(Event::Begin);
        if self.recorder.failures.begin {
            return Err(TransactionError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        Ok(RecordingTx {
            recorder: self.recorder.clone(),
        })
    }
}

#[async_trait]
impl RelationalTransaction for RecordingTx {
    async fn commit(self) -> TransactionResult<()> {
        self.recorder.record(Event::Commit);
        if self.recorder.failures.commit {
            return Err(TransactionError::DatabaseError(sqlx::Error::WorkerCrashed));
        }
        Ok(())
    }

    async fn rollback(self) -> TransactionResult<()> {
        self.recorder.record(Event::Rollback);
        if self.recorder.failures.rollback {
            return Err(TransactionError::RollbackFailed("injected".to_string()));
        }
        Ok(())
    }
}

/// Document store that records every call.
pub struct RecordingDocs {
    recorder: Recorder,
}

pub struct RecordingSession {
    recorder: Recorder,
}

impl RecordingSession {
    pub fn insert(&mut self, doc: &str) {
        self.recorder.record(Event::DocumentWrite(doc.to_string()));
    }
}

#[async_trait]
impl DocumentStore for RecordingDocs {
    type Session = RecordingSession;

    async fn start_session(&self) -> TransactionResult<RecordingSession> {
        self.recorder.record(Event::SessionStart);
        if self.recorder.failures.session_start {
            return Err(TransactionError::Session("no servers available".to_string()));
        }
        Ok(RecordingSession {
            recorder: self.recorder.clone(),
        })
    }
}

#[async_trait]
impl DocumentSession for RecordingSession {
    async fn start_transaction(&mut self) -> TransactionResult<()> {
        self.recorder.record(Event::TransactionStart);
        if self.recorder.failures.transaction_start {
            return Err(TransactionError::Session("transaction already in progress".to_string()));
        }
        Ok(())
    }

    async fn commit_transaction(&mut self) -> TransactionResult<()> {
        self.recorder.record(Event::DocumentCommit);
        if self.recorder.failures.document_commit {
            return Err(TransactionError::Session("write conflict".to_string()));
        }
        Ok(())
    }

    async fn abort_transaction(&mut self) -> TransactionResult<()> {
        self.recorder.record(Event::DocumentAbort);
        if self.recorder.failures.document_abort {
            return Err(TransactionError::Session("abort failed".to_string()));
        }
        Ok(())
    }

    async fn end_session(self) {
        self.recorder.record(Event::SessionEnd);
    }
}
