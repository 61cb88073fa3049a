//! Newest-image selection for alicloud

use crate::PROVIDER;
use async_trait::async_trait;
use deployflow_cloud::{
    CatalogImage, ImageCatalog, ImageDetails, ImageFinder, JenkinsDetails, Result,
};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

/// alicloud images are global rather than regional
const IMAGE_REGION: &str = "global";

/// Finds the most recently created alicloud image for a package
pub struct AliCloudImageFinder {
    catalog: Arc<dyn ImageCatalog>,
}

impl AliCloudImageFinder {
    pub fn new(catalog: Arc<dyn ImageCatalog>) -> Self {
        Self { catalog }
    }
}

/// Catalog tag filters are keyed `tag:<name>`
pub fn prefix_tags(tags: &HashMap<String, String>) -> HashMap<String, String> {
    tags.iter()
        .map(|(key, value)| (format!("tag:{}", key), value.clone()))
        .collect()
}

/// Newest first; `creationTime` is ISO-8601 so string order is time order.
/// Images without a creation time go last.
fn newest_first(a: &CatalogImage, b: &CatalogImage) -> Ordering {
    match (a.creation_time(), b.creation_time()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => Ordering::Equal,
    }
}

fn image_details(image: CatalogImage) -> ImageDetails {
    ImageDetails {
        image_id: image.image_name.clone(),
        ami: image.image_name.clone(),
        ami_id: image.image_name.clone(),
        image_name: image.image_name,
        region: IMAGE_REGION.to_string(),
        jenkins: JenkinsDetails::default(),
    }
}

#[async_trait]
impl ImageFinder for AliCloudImageFinder {
    fn cloud_provider(&self) -> &str {
        PROVIDER
    }

    async fn by_tags(
        &self,
        package_name: &str,
        tags: &HashMap<String, String>,
    ) -> Result<Vec<ImageDetails>> {
        let mut images = self
            .catalog
            .find_images(self.cloud_provider(), package_name, &prefix_tags(tags))
            .await?
            .into_iter()
            .map(CatalogImage::from_value)
            .collect::<Result<Vec<_>>>()?;

        images.sort_by(newest_first);
        tracing::debug!(package = package_name, images = images.len(), "Found images");

        Ok(images.into_iter().next().map(image_details).into_iter().collect())
    }
}
