//! Input documents (stage configs, inventories, image catalogs)

use anyhow::Context;
use serde::de::DeserializeOwned;
use std::path::Path;

/// Read a JSON or YAML document, chosen by file extension
///
/// Files without a recognised extension are tried as JSON, then YAML.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let parsed = match extension.as_deref() {
        Some("json") => serde_json::from_str(&content).map_err(anyhow::Error::from),
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(anyhow::Error::from),
        _ => serde_json::from_str(&content)
            .or_else(|_| serde_yaml::from_str(&content))
            .map_err(anyhow::Error::from),
    };

    parsed.with_context(|| format!("failed to parse {}", path.display()))
}

/// Parse a `key=value` tag filter
pub fn parse_tag(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{}'", s)),
    }
}
