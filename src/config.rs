use serde::Deserialize;

use crate::datetime::TimeLayouts;
use crate::unit_of_work::CommitFailurePolicy;

/// Settings a service can load from its own configuration source.
///
/// Missing fields fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OpsConfig {
    pub layouts: TimeLayouts,
    pub commit_policy: CommitFailurePolicy,
}
