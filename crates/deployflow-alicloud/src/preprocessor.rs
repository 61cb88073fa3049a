//! Alibaba Cloud deploy stage pre-processor

use crate::PROVIDER;
use crate::policy::{CapacityPreservation, requires_pinning, requires_precondition_gate};
use crate::precondition::build_precondition_gate;
use crate::resize::ResizeContextBuilder;
use async_trait::async_trait;
use deployflow_cloud::{DeployStagePreProcessor, Result, ServerGroupResolver};
use deployflow_config::{ComposerConfig, DEFAULT_FAILED_UNPIN_TIMEOUT_MS};
use deployflow_core::{StageConfig, StageDefinition, StageType, StepDefinition, TaskRef};
use std::sync::Arc;

pub const SNAPSHOT_STEP_NAME: &str = "snapshotSourceServerGroup";
pub const RESTORE_STAGE_NAME: &str = "restoreMinCapacityFromSnapshot";

/// Composes pin/unpin, snapshot/restore and precondition stages for
/// `alicloud` deploy stages
pub struct AliCloudDeployStagePreProcessor {
    provider: String,
    failed_unpin_timeout_ms: u64,
    resize: ResizeContextBuilder,
}

impl AliCloudDeployStagePreProcessor {
    pub fn new(resolver: Arc<dyn ServerGroupResolver>) -> Self {
        Self {
            provider: PROVIDER.to_string(),
            failed_unpin_timeout_ms: DEFAULT_FAILED_UNPIN_TIMEOUT_MS,
            resize: ResizeContextBuilder::new(resolver),
        }
    }

    pub fn from_config(config: &ComposerConfig, resolver: Arc<dyn ServerGroupResolver>) -> Self {
        Self {
            provider: config.provider.clone(),
            failed_unpin_timeout_ms: config.failed_unpin_timeout_ms,
            resize: ResizeContextBuilder::new(resolver),
        }
    }

    /// Unpin stage releasing the pin taken before the deploy
    ///
    /// After a deploy that failed, the stage gets its own generous timeout:
    /// the deploy may have failed by running out of its own.
    async fn build_unpin_stage(
        &self,
        config: &StageConfig,
        deploy_failed: bool,
    ) -> Result<Option<StageDefinition>> {
        if !requires_pinning(&config.strategy) {
            return Ok(None);
        }

        if config.scale_down && !deploy_failed {
            // source group was already scaled down, nothing left pinned
            tracing::debug!(
                cluster = %config.cluster,
                "Source already scaled down, skipping unpin"
            );
            return Ok(None);
        }

        let Some(context) = self.resize.build(config).await? else {
            return Ok(None);
        };

        let timeout = deploy_failed.then_some(self.failed_unpin_timeout_ms);
        let context = context.unpin(timeout);
        tracing::info!(
            server_group = %context.server_group_name,
            deploy_failed,
            "Unpin stage"
        );
        let name = format!(
            "Unpin {} (deployFailed={})",
            context.server_group_name, deploy_failed
        );

        Ok(Some(StageDefinition::new(
            name,
            StageType::PinServerGroup,
            context.to_context(),
        )))
    }
}

#[async_trait]
impl DeployStagePreProcessor for AliCloudDeployStagePreProcessor {
    fn name(&self) -> &str {
        &self.provider
    }

    fn supports(&self, config: &StageConfig) -> bool {
        config.cloud_provider == self.provider
    }

    fn additional_steps(&self, config: &StageConfig) -> Vec<StepDefinition> {
        match CapacityPreservation::for_strategy(&config.strategy) {
            CapacityPreservation::Pin => vec![],
            CapacityPreservation::Snapshot => vec![StepDefinition::new(
                SNAPSHOT_STEP_NAME,
                TaskRef::CaptureSourceServerGroupCapacity,
            )],
        }
    }

    async fn before_stage_definitions(&self, config: &StageConfig) -> Result<Vec<StageDefinition>> {
        let mut stages = Vec::new();

        if requires_precondition_gate(config) {
            stages.push(build_precondition_gate(config));
        }

        if requires_pinning(&config.strategy) {
            let Some(context) = self.resize.build(config).await? else {
                // first deploy into the cluster, nothing to pin
                return Ok(stages);
            };

            let context = context.pin();
            tracing::info!(server_group = %context.server_group_name, "Pin stage");
            stages.push(StageDefinition::new(
                format!("Pin {}", context.server_group_name),
                StageType::PinServerGroup,
                context.to_context(),
            ));
        }

        Ok(stages)
    }

    async fn after_stage_definitions(&self, config: &StageConfig) -> Result<Vec<StageDefinition>> {
        let mut stages = Vec::new();

        if CapacityPreservation::for_strategy(&config.strategy) == CapacityPreservation::Snapshot {
            stages.push(StageDefinition::bare(
                RESTORE_STAGE_NAME,
                StageType::ApplySourceServerGroupCapacity,
            ));
        }

        if let Some(unpin) = self.build_unpin_stage(config, false).await? {
            stages.push(unpin);
        }

        Ok(stages)
    }

    async fn on_failure_stage_definitions(
        &self,
        config: &StageConfig,
    ) -> Result<Vec<StageDefinition>> {
        Ok(self.build_unpin_stage(config, true).await?.into_iter().collect())
    }
}
