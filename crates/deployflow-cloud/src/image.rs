//! Image lookup by package name and tags

use crate::error::{CloudError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Source of raw image records for a provider
#[async_trait]
pub trait ImageCatalog: Send + Sync {
    /// Images for `provider` matching `package_name` and every tag filter
    async fn find_images(
        &self,
        provider: &str,
        package_name: &str,
        tags: &HashMap<String, String>,
    ) -> Result<Vec<Value>>;
}

/// Selects the image a bake or deploy stage should use
#[async_trait]
pub trait ImageFinder: Send + Sync {
    fn cloud_provider(&self) -> &str;

    async fn by_tags(
        &self,
        package_name: &str,
        tags: &HashMap<String, String>,
    ) -> Result<Vec<ImageDetails>>;
}

/// An image record as returned by the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogImage {
    pub image_name: String,

    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl CatalogImage {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// `creationTime` attribute rendered as a string
    pub fn creation_time(&self) -> Option<String> {
        match self.attributes.get("creationTime")? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Build information attached to an image
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JenkinsDetails {
    pub host: String,
    pub name: String,
    pub number: String,
}

/// Image selected for a stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageDetails {
    pub image_name: String,
    pub image_id: String,
    pub ami: String,
    pub ami_id: String,
    pub region: String,
    pub jenkins: JenkinsDetails,
}

/// Catalog over a fixed list of image records
///
/// An image matches when its name contains the package name and, for each
/// `tag:<key>` filter, its `tags` attribute carries the same value.
#[derive(Debug, Clone, Default)]
pub struct StaticImageCatalog {
    provider: String,
    images: Vec<Value>,
}

impl StaticImageCatalog {
    pub fn new(provider: impl Into<String>, images: Vec<Value>) -> Self {
        Self {
            provider: provider.into(),
            images,
        }
    }

    fn matches(image: &Value, package_name: &str, tags: &HashMap<String, String>) -> bool {
        let name = image.get("imageName").and_then(Value::as_str).unwrap_or("");
        if !name.contains(package_name) {
            return false;
        }

        let image_tags = image.pointer("/attributes/tags");
        tags.iter().all(|(key, expected)| {
            let key = key.strip_prefix("tag:").unwrap_or(key);
            image_tags
                .and_then(|t| t.get(key))
                .and_then(Value::as_str)
                .is_some_and(|v| v == expected)
        })
    }
}

#[async_trait]
impl ImageCatalog for StaticImageCatalog {
    async fn find_images(
        &self,
        provider: &str,
        package_name: &str,
        tags: &HashMap<String, String>,
    ) -> Result<Vec<Value>> {
        if provider != self.provider {
            return Err(CloudError::ImageCatalog(format!(
                "catalog serves '{}', not '{}'",
                self.provider, provider
            )));
        }

        Ok(self
            .images
            .iter()
            .filter(|image| Self::matches(image, package_name, tags))
            .cloned()
            .collect())
    }
}
