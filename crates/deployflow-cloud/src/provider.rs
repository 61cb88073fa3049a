//! Deploy stage pre-processor trait definition

use crate::error::{CloudError, Result};
use async_trait::async_trait;
use deployflow_core::{StageConfig, StageDefinition, StepDefinition};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Composes the auxiliary work around a deploy stage
///
/// Each provider implements this trait to tell the execution engine what
/// must run before, after, and on failure of a deployment. Implementations
/// never deploy anything themselves.
///
/// The engine only hands a stage to a pre-processor whose
/// [`supports`](Self::supports) returned true; the other methods assume
/// that check already happened.
#[async_trait]
pub trait DeployStagePreProcessor: Send + Sync {
    /// Returns the provider name (e.g., "alicloud")
    fn name(&self) -> &str;

    /// Whether stages for this configuration belong to this pre-processor
    fn supports(&self, config: &StageConfig) -> bool;

    /// Steps that run inside the deploy stage itself
    fn additional_steps(&self, config: &StageConfig) -> Vec<StepDefinition>;

    /// Stages that run before the deploy stage, in order
    async fn before_stage_definitions(&self, config: &StageConfig) -> Result<Vec<StageDefinition>>;

    /// Stages that run after a successful deploy stage, in order
    async fn after_stage_definitions(&self, config: &StageConfig) -> Result<Vec<StageDefinition>>;

    /// Stages that run when the deploy stage fails, in order
    async fn on_failure_stage_definitions(
        &self,
        config: &StageConfig,
    ) -> Result<Vec<StageDefinition>>;

    /// Run every hook for one stage
    async fn compose(&self, config: &StageConfig) -> Result<Composition> {
        Ok(Composition {
            additional_steps: self.additional_steps(config),
            before_stages: self.before_stage_definitions(config).await?,
            after_stages: self.after_stage_definitions(config).await?,
            on_failure_stages: self.on_failure_stage_definitions(config).await?,
        })
    }
}

/// Output of all hooks for one stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Composition {
    pub additional_steps: Vec<StepDefinition>,
    pub before_stages: Vec<StageDefinition>,
    pub after_stages: Vec<StageDefinition>,
    pub on_failure_stages: Vec<StageDefinition>,
}

/// Routes stage configurations to the pre-processor that supports them
#[derive(Default, Clone)]
pub struct PreProcessorRegistry {
    processors: Vec<Arc<dyn DeployStagePreProcessor>>,
}

impl PreProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, processor: Arc<dyn DeployStagePreProcessor>) {
        tracing::debug!(provider = processor.name(), "Registered stage pre-processor");
        self.processors.push(processor);
    }

    /// First registered pre-processor that supports the configuration
    pub fn find(&self, config: &StageConfig) -> Result<Arc<dyn DeployStagePreProcessor>> {
        self.processors
            .iter()
            .find(|p| p.supports(config))
            .cloned()
            .ok_or_else(|| CloudError::ProviderNotFound(config.cloud_provider.clone()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }
}
