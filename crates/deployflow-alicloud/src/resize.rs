//! Resize contexts for pin and unpin stages

use deployflow_cloud::{Result, ServerGroupResolver, SourceLookup, SourceServerGroup};
use deployflow_core::{Moniker, StageConfig, StageContext};
use serde_json::{Value, json};
use std::sync::Arc;

/// Context key carrying the stage's location; alicloud locates by region
pub const LOCATION_KEY: &str = "region";

/// Capacity action of a resize stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeAction {
    /// Match the capacity of the source server group
    ScaleToServerGroup,
}

impl ResizeAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResizeAction::ScaleToServerGroup => "scale_to_server_group",
        }
    }
}

/// Minimum-capacity lock carried by a resize context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPin {
    Pin,
    Unpin { stage_timeout_ms: Option<u64> },
}

/// Context of a stage that resizes the target server group against its source
///
/// Only ever built from a resolved source; there is no partially filled
/// context for a cluster without one.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeContext {
    pub location: String,
    pub cluster: String,
    pub moniker: Option<Moniker>,
    pub credentials: String,
    pub cloud_provider: String,
    pub server_group_name: String,
    pub action: ResizeAction,
    pub source: SourceServerGroup,
    pub use_name_as_label: bool,
    pub capacity_pin: Option<CapacityPin>,
}

impl ResizeContext {
    fn from_source(config: &StageConfig, source: SourceServerGroup) -> Self {
        Self {
            location: config.region.clone(),
            cluster: config.cluster.clone(),
            moniker: config.moniker.clone(),
            credentials: config.credentials.clone(),
            cloud_provider: config.cloud_provider.clone(),
            server_group_name: source.server_group_name.clone(),
            action: ResizeAction::ScaleToServerGroup,
            source,
            use_name_as_label: true,
            capacity_pin: None,
        }
    }

    /// Mark the context as pinning minimum capacity
    pub fn pin(mut self) -> Self {
        self.capacity_pin = Some(CapacityPin::Pin);
        self
    }

    /// Mark the context as releasing a previous pin
    pub fn unpin(mut self, stage_timeout_ms: Option<u64>) -> Self {
        self.capacity_pin = Some(CapacityPin::Unpin { stage_timeout_ms });
        self
    }

    /// Render as the untyped context handed to the execution engine
    pub fn to_context(&self) -> StageContext {
        let mut context = StageContext::new();
        context.insert(LOCATION_KEY.to_string(), json!(self.location));
        context.insert("cluster".to_string(), json!(self.cluster));
        if let Some(moniker) = &self.moniker {
            context.insert("moniker".to_string(), moniker_value(moniker));
        }
        context.insert("credentials".to_string(), json!(self.credentials));
        context.insert("cloudProvider".to_string(), json!(self.cloud_provider));
        context.insert("serverGroupName".to_string(), json!(self.server_group_name));
        context.insert("action".to_string(), json!(self.action.as_str()));
        context.insert("source".to_string(), source_value(&self.source));
        context.insert("useNameAsLabel".to_string(), json!(self.use_name_as_label));

        match self.capacity_pin {
            Some(CapacityPin::Pin) => {
                context.insert("pinMinimumCapacity".to_string(), json!(true));
            }
            Some(CapacityPin::Unpin { stage_timeout_ms }) => {
                context.insert("unpinMinimumCapacity".to_string(), json!(true));
                if let Some(timeout) = stage_timeout_ms {
                    context.insert("stageTimeoutMs".to_string(), json!(timeout));
                }
            }
            None => {}
        }

        context
    }
}

fn moniker_value(moniker: &Moniker) -> Value {
    let mut value = json!({ "app": moniker.app });
    for (key, part) in [
        ("cluster", &moniker.cluster),
        ("stack", &moniker.stack),
        ("detail", &moniker.detail),
    ] {
        if let Some(part) = part {
            value[key] = json!(part);
        }
    }
    if let Some(sequence) = moniker.sequence {
        value["sequence"] = json!(sequence);
    }
    value
}

fn source_value(source: &SourceServerGroup) -> Value {
    let mut value = json!({
        "serverGroupName": source.server_group_name,
        "cluster": source.cluster,
        "credentials": source.credentials,
    });
    value[LOCATION_KEY] = json!(source.region);
    if let Some(capacity) = source.capacity {
        value["capacity"] = json!({
            "min": capacity.min,
            "max": capacity.max,
            "desired": capacity.desired,
        });
    }
    value
}

/// Builds resize contexts from a stage config and its resolved source
#[derive(Clone)]
pub struct ResizeContextBuilder {
    resolver: Arc<dyn ServerGroupResolver>,
}

impl ResizeContextBuilder {
    pub fn new(resolver: Arc<dyn ServerGroupResolver>) -> Self {
        Self { resolver }
    }

    /// Resolve the source server group and build a context around it
    ///
    /// `Ok(None)` when the cluster has no source server group yet. Resolver
    /// failures propagate unchanged.
    pub async fn build(&self, config: &StageConfig) -> Result<Option<ResizeContext>> {
        let lookup = self
            .resolver
            .resolve_source(&config.cluster, &config.credentials, &config.region)
            .await?;

        match lookup {
            SourceLookup::Found(source) => Ok(Some(ResizeContext::from_source(config, source))),
            SourceLookup::NotFound => {
                tracing::debug!(
                    cluster = %config.cluster,
                    account = %config.credentials,
                    region = %config.region,
                    "No source server group"
                );
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use deployflow_cloud::{Capacity, CloudError, StaticServerGroupResolver};

    struct UnavailableResolver;

    #[async_trait]
    impl ServerGroupResolver for UnavailableResolver {
        async fn resolve_source(
            &self,
            cluster: &str,
            account: &str,
            region: &str,
        ) -> Result<SourceLookup> {
            Err(CloudError::resolution_failed(
                cluster,
                account,
                region,
                "upstream unavailable",
            ))
        }
    }

    fn config() -> StageConfig {
        StageConfig {
            cloud_provider: "alicloud".to_string(),
            cluster: "app-main".to_string(),
            application: "app".to_string(),
            credentials: "prod".to_string(),
            region: "cn-hangzhou".to_string(),
            moniker: Some(Moniker::new("app").with_cluster("app-main").with_stack("main")),
            ..Default::default()
        }
    }

    fn builder_with_source() -> ResizeContextBuilder {
        let source = SourceServerGroup::new("app-main-v002", "app-main", "prod", "cn-hangzhou")
            .with_capacity(Capacity {
                min: 2,
                max: 8,
                desired: 4,
            });
        ResizeContextBuilder::new(Arc::new(StaticServerGroupResolver::from_groups([source])))
    }

    #[tokio::test]
    async fn test_build_populates_every_field() {
        let context = builder_with_source().build(&config()).await.unwrap().unwrap();

        assert_eq!(context.location, "cn-hangzhou");
        assert_eq!(context.cluster, "app-main");
        assert_eq!(context.credentials, "prod");
        assert_eq!(context.cloud_provider, "alicloud");
        assert_eq!(context.server_group_name, "app-main-v002");
        assert_eq!(context.action, ResizeAction::ScaleToServerGroup);
        assert!(context.use_name_as_label);
        assert_eq!(context.capacity_pin, None);
    }

    #[tokio::test]
    async fn test_build_absent_without_source() {
        let builder = ResizeContextBuilder::new(Arc::new(StaticServerGroupResolver::new()));
        assert!(builder.build(&config()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_build_propagates_resolution_failure() {
        let builder = ResizeContextBuilder::new(Arc::new(UnavailableResolver));
        let err = builder.build(&config()).await.unwrap_err();
        assert!(matches!(err, CloudError::ResolutionFailed { ref cluster, .. } if cluster == "app-main"));
    }

    #[tokio::test]
    async fn test_pin_context_rendering() {
        let context = builder_with_source()
            .build(&config())
            .await
            .unwrap()
            .unwrap()
            .pin()
            .to_context();

        assert_eq!(context["region"], "cn-hangzhou");
        assert_eq!(context["serverGroupName"], "app-main-v002");
        assert_eq!(context["action"], "scale_to_server_group");
        assert_eq!(context["useNameAsLabel"], true);
        assert_eq!(context["pinMinimumCapacity"], true);
        assert_eq!(context["moniker"]["stack"], "main");
        assert_eq!(context["source"]["region"], "cn-hangzhou");
        assert_eq!(context["source"]["capacity"]["desired"], 4);
        assert!(!context.contains_key("unpinMinimumCapacity"));
        assert!(!context.contains_key("stageTimeoutMs"));
    }

    #[tokio::test]
    async fn test_unpin_replaces_pin() {
        let context = builder_with_source()
            .build(&config())
            .await
            .unwrap()
            .unwrap()
            .pin()
            .unpin(Some(1_200_000));

        assert_eq!(
            context.capacity_pin,
            Some(CapacityPin::Unpin {
                stage_timeout_ms: Some(1_200_000)
            })
        );

        let rendered = context.to_context();
        assert_eq!(rendered["unpinMinimumCapacity"], true);
        assert_eq!(rendered["stageTimeoutMs"], 1_200_000);
        assert!(!rendered.contains_key("pinMinimumCapacity"));
    }

    #[tokio::test]
    async fn test_moniker_omitted_when_absent() {
        let config = StageConfig {
            moniker: None,
            ..config()
        };
        let context = builder_with_source()
            .build(&config)
            .await
            .unwrap()
            .unwrap()
            .to_context();
        assert!(!context.contains_key("moniker"));
    }
}
