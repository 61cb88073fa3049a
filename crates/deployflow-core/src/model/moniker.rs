//! Structured server group names

use serde::{Deserialize, Serialize};

/// Structured name of a cluster or server group
///
/// `app-stack-detail-v003` splits into app `app`, stack `stack`,
/// detail `detail`, sequence `3`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Moniker {
    pub app: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<u32>,
}

impl Moniker {
    pub fn new(app: impl Into<String>) -> Self {
        Self {
            app: app.into(),
            ..Default::default()
        }
    }

    pub fn with_cluster(mut self, cluster: impl Into<String>) -> Self {
        self.cluster = Some(cluster.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moniker_serialization_skips_absent_parts() {
        let moniker = Moniker::new("app").with_cluster("app-main").with_stack("main");
        let value = serde_json::to_value(&moniker).unwrap();

        assert_eq!(
            value,
            serde_json::json!({ "app": "app", "cluster": "app-main", "stack": "main" })
        );
    }
}
