//! Source server group resolution

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Finds the current source server group of a cluster
///
/// Implementations must tell "the cluster has no server group yet"
/// ([`SourceLookup::NotFound`]) apart from a failed lookup (`Err`).
/// A first deploy into a new cluster always resolves to `NotFound`.
#[async_trait]
pub trait ServerGroupResolver: Send + Sync {
    async fn resolve_source(&self, cluster: &str, account: &str, region: &str)
    -> Result<SourceLookup>;
}

/// Outcome of a successful source lookup
#[derive(Debug, Clone, PartialEq)]
pub enum SourceLookup {
    Found(SourceServerGroup),
    NotFound,
}

/// Capacity bounds of a server group
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub min: u32,
    pub max: u32,
    pub desired: u32,
}

/// The existing server group a deployment is measured against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceServerGroup {
    pub server_group_name: String,

    pub cluster: String,

    #[serde(alias = "account")]
    pub credentials: String,

    pub region: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<Capacity>,
}

impl SourceServerGroup {
    pub fn new(
        server_group_name: impl Into<String>,
        cluster: impl Into<String>,
        credentials: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            server_group_name: server_group_name.into(),
            cluster: cluster.into(),
            credentials: credentials.into(),
            region: region.into(),
            capacity: None,
        }
    }

    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = Some(capacity);
        self
    }

    fn key(&self) -> LookupKey {
        lookup_key(&self.cluster, &self.credentials, &self.region)
    }
}

/// account, region, cluster
type LookupKey = (String, String, String);

fn lookup_key(cluster: &str, account: &str, region: &str) -> LookupKey {
    (account.to_string(), region.to_string(), cluster.to_string())
}

/// Resolver backed by a fixed set of server groups
///
/// At most one source per cluster/account/region; registering a second
/// group for the same location replaces the first.
#[derive(Debug, Clone, Default)]
pub struct StaticServerGroupResolver {
    groups: HashMap<LookupKey, SourceServerGroup>,
}

impl StaticServerGroupResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_groups(groups: impl IntoIterator<Item = SourceServerGroup>) -> Self {
        let mut resolver = Self::new();
        for group in groups {
            resolver.add(group);
        }
        resolver
    }

    pub fn add(&mut self, group: SourceServerGroup) {
        self.groups.insert(group.key(), group);
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

#[async_trait]
impl ServerGroupResolver for StaticServerGroupResolver {
    async fn resolve_source(
        &self,
        cluster: &str,
        account: &str,
        region: &str,
    ) -> Result<SourceLookup> {
        let lookup = match self.groups.get(&lookup_key(cluster, account, region)) {
            Some(group) => SourceLookup::Found(group.clone()),
            None => SourceLookup::NotFound,
        };
        tracing::debug!(
            cluster,
            account,
            region,
            found = matches!(lookup, SourceLookup::Found(_)),
            "Resolved source server group"
        );
        Ok(lookup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_resolver_found() {
        let resolver = StaticServerGroupResolver::from_groups([SourceServerGroup::new(
            "app-v002",
            "app",
            "prod",
            "cn-hangzhou",
        )]);

        let lookup = resolver.resolve_source("app", "prod", "cn-hangzhou").await.unwrap();
        let SourceLookup::Found(source) = lookup else {
            panic!("expected a source server group, got {lookup:?}");
        };
        assert_eq!(source.server_group_name, "app-v002");
    }

    #[tokio::test]
    async fn test_static_resolver_not_found_for_other_location() {
        let resolver = StaticServerGroupResolver::from_groups([SourceServerGroup::new(
            "app-v002",
            "app",
            "prod",
            "cn-hangzhou",
        )]);

        let lookup = resolver.resolve_source("app", "prod", "cn-beijing").await.unwrap();
        assert_eq!(lookup, SourceLookup::NotFound);

        let lookup = resolver.resolve_source("app", "test", "cn-hangzhou").await.unwrap();
        assert_eq!(lookup, SourceLookup::NotFound);
    }

    #[test]
    fn test_later_group_replaces_earlier() {
        let mut resolver = StaticServerGroupResolver::new();
        resolver.add(SourceServerGroup::new("app-v001", "app", "prod", "cn-hangzhou"));
        resolver.add(SourceServerGroup::new("app-v002", "app", "prod", "cn-hangzhou"));
        assert_eq!(resolver.len(), 1);

        let lookup = tokio_test::block_on(resolver.resolve_source("app", "prod", "cn-hangzhou"))
            .unwrap();
        assert!(matches!(lookup, SourceLookup::Found(ref g) if g.server_group_name == "app-v002"));
    }

    #[tokio::test]
    async fn test_colons_in_names_do_not_collide() {
        let resolver = StaticServerGroupResolver::from_groups([
            SourceServerGroup::new("first-v001", "r:c", "x", "p"),
            SourceServerGroup::new("second-v001", "c", "x", "p:r"),
        ]);
        assert_eq!(resolver.len(), 2);

        let lookup = resolver.resolve_source("r:c", "x", "p").await.unwrap();
        assert!(matches!(lookup, SourceLookup::Found(ref g) if g.server_group_name == "first-v001"));

        let lookup = resolver.resolve_source("c", "x", "p:r").await.unwrap();
        assert!(matches!(lookup, SourceLookup::Found(ref g) if g.server_group_name == "second-v001"));

        let lookup = resolver.resolve_source("c", "x:p", "r").await.unwrap();
        assert_eq!(lookup, SourceLookup::NotFound);
    }

    #[test]
    fn test_source_deserializes_account_alias() {
        let json = r#"{
            "serverGroupName": "app-v003",
            "cluster": "app",
            "account": "prod",
            "region": "cn-shanghai",
            "capacity": { "min": 2, "max": 10, "desired": 4 }
        }"#;
        let source: SourceServerGroup = serde_json::from_str(json).unwrap();
        assert_eq!(source.credentials, "prod");
        assert_eq!(source.capacity.unwrap().desired, 4);
    }
}
