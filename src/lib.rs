//! Ops Utility Module
//!
//! Shared helpers for backend services: time formatting, SQL placeholder
//! rewriting, base64, and transaction runners that coordinate a PostgreSQL
//! transaction with an optional document-store session.

pub mod config;
pub mod datetime;
pub mod encoding;
pub mod error;
pub mod executor;
pub mod session;
pub mod sql;
pub mod store;
pub mod unit_of_work;

pub use config::OpsConfig;
pub use datetime::{
    add_day_increment_time, date_now, datetime_layout_now, datetime_now, time_between, TimeLayouts,
};
pub use encoding::{decrypt_base64, encrypt_base64};
pub use error::{TransactionError, TransactionResult, UtilError};
pub use executor::{Executor, TransactionGuard};
pub use session::{SessionContext, SessionGuard};
pub use sql::{query_fill, replace_sql};
pub use store::{DocumentSession, DocumentStore, RelationalStore, RelationalTransaction};
pub use unit_of_work::{
    db_transaction, db_transaction_with_session, db_transaction_with_session_policy,
    CommitFailurePolicy,
};
