//! Cloud provider error types

use thiserror::Error;

/// Cloud provider errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Failed to resolve source server group for {cluster} ({account}/{region}): {reason}")]
    ResolutionFailed {
        cluster: String,
        account: String,
        region: String,
        reason: String,
    },

    #[error("No stage pre-processor supports cloud provider: {0}")]
    ProviderNotFound(String),

    #[error("Image catalog error: {0}")]
    ImageCatalog(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CloudError {
    pub fn resolution_failed(
        cluster: impl Into<String>,
        account: impl Into<String>,
        region: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        CloudError::ResolutionFailed {
            cluster: cluster.into(),
            account: account.into(),
            region: region.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
