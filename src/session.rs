use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::{TransactionError, TransactionResult};

/// Session-bound execution context handed to a dual-store unit of work.
///
/// Wraps the document-store session whose transaction the runner started.
/// Operations that must join that transaction lock the context and pass the
/// session to the driver. The runner reclaims the session when the unit of
/// work returns.
#[derive(Debug)]
pub struct SessionContext<S> {
    session: Arc<Mutex<Option<S>>>,
}

impl<S> Clone for SessionContext<S> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<S> SessionContext<S> {
    pub(crate) fn new(session: S) -> Self {
        Self {
            session: Arc::new(Mutex::new(Some(session))),
        }
    }

    /// Locks the session for one driver call.
    pub async fn lock(&self) -> TransactionResult<SessionGuard<'_, S>> {
        let guard = self.session.lock().await;
        if guard.is_none() {
            return Err(TransactionError::TransactionClosed);
        }
        Ok(SessionGuard { guard })
    }

    pub(crate) async fn take_session(&self) -> TransactionResult<S> {
        self.session
            .lock()
            .await
            .take()
            .ok_or(TransactionError::TransactionClosed)
    }
}

/// Exclusive access to the session held by a [`SessionContext`].
pub struct SessionGuard<'a, S> {
    guard: MutexGuard<'a, Option<S>>,
}

impl<S> std::ops::Deref for SessionGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        match self.guard.as_ref() {
            Some(session) => session,
            None => unreachable!("session guard over an empty slot"),
        }
    }
}

impl<S> std::ops::DerefMut for SessionGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        match self.guard.as_mut() {
            Some(session) => session,
            None => unreachable!("session guard over an empty slot"),
        }
    }
}
