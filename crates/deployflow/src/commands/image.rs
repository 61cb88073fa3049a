use crate::inputs::read_document;
use colored::Colorize;
use deployflow_alicloud::{AliCloudImageFinder, PROVIDER};
use deployflow_cloud::{ImageFinder, StaticImageCatalog};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

pub async fn handle(
    catalog: &Path,
    package: &str,
    tags: &[(String, String)],
) -> anyhow::Result<()> {
    let images: Vec<serde_json::Value> = read_document(catalog)?;
    let finder = AliCloudImageFinder::new(Arc::new(StaticImageCatalog::new(PROVIDER, images)));

    let tags: HashMap<String, String> = tags.iter().cloned().collect();
    let found = finder.by_tags(package, &tags).await?;

    if found.is_empty() {
        eprintln!("{} no image matches package '{}'", "!".yellow().bold(), package);
    }

    println!("{}", serde_json::to_string_pretty(&found)?);
    Ok(())
}
