//! Deploy stage configuration

use super::{Moniker, Strategy};
use serde::{Deserialize, Serialize};

/// `max_initial_count` value meaning no limit is configured
pub const NO_MAX_INITIAL_COUNT: i64 = -1;

/// Configuration of one deploy stage
///
/// Read-only input to every composer hook. The same value is passed to
/// each hook of a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConfig {
    /// Deployment strategy
    #[serde(default)]
    pub strategy: Strategy,

    /// Provider name used to route the stage to a composer (e.g. "alicloud")
    pub cloud_provider: String,

    /// Cluster being deployed into
    pub cluster: String,

    /// Owning application
    pub application: String,

    /// Account the cluster lives in
    #[serde(alias = "account")]
    pub credentials: String,

    /// Region of the deployment
    pub region: String,

    /// Structured cluster name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub moniker: Option<Moniker>,

    /// Upper bound on enabled server groups before deploying; -1 disables the check
    #[serde(default = "default_max_initial_count")]
    pub max_initial_count: i64,

    /// Whether the source server group has already been scaled down
    #[serde(default)]
    pub scale_down: bool,
}

fn default_max_initial_count() -> i64 {
    NO_MAX_INITIAL_COUNT
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::None,
            cloud_provider: String::new(),
            cluster: String::new(),
            application: String::new(),
            credentials: String::new(),
            region: String::new(),
            moniker: None,
            max_initial_count: NO_MAX_INITIAL_COUNT,
            scale_down: false,
        }
    }
}

impl StageConfig {
    /// Whether a cluster size limit is configured
    pub fn has_max_initial_count(&self) -> bool {
        self.max_initial_count != NO_MAX_INITIAL_COUNT
    }
}
