use crate::inputs::read_document;
use clap::ValueEnum;
use colored::Colorize;
use deployflow_alicloud::AliCloudDeployStagePreProcessor;
use deployflow_cloud::{PreProcessorRegistry, SourceServerGroup, StaticServerGroupResolver};
use deployflow_config::ComposerConfig;
use deployflow_core::StageConfig;
use std::path::Path;
use std::sync::Arc;

/// Which hook output to print
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Hook {
    /// Every hook
    All,
    /// Additional steps of the deploy stage
    Steps,
    /// Stages before the deploy
    Before,
    /// Stages after a successful deploy
    After,
    /// Stages after a failed deploy
    OnFailure,
}

pub fn build_registry(
    config: &ComposerConfig,
    inventory: Option<&Path>,
) -> anyhow::Result<PreProcessorRegistry> {
    let resolver = match inventory {
        Some(path) => {
            let groups: Vec<SourceServerGroup> = read_document(path)?;
            StaticServerGroupResolver::from_groups(groups)
        }
        None => StaticServerGroupResolver::new(),
    };
    tracing::debug!(groups = resolver.len(), "Loaded server group inventory");

    let mut registry = PreProcessorRegistry::new();
    registry.register(Arc::new(AliCloudDeployStagePreProcessor::from_config(
        config,
        Arc::new(resolver),
    )));
    Ok(registry)
}

pub async fn handle(
    config: &ComposerConfig,
    stage: &Path,
    inventory: Option<&Path>,
    hook: Hook,
) -> anyhow::Result<()> {
    let stage_config: StageConfig = read_document(stage)?;
    let registry = build_registry(config, inventory)?;
    let processor = registry.find(&stage_config)?;

    eprintln!(
        "{} {} ({}, {}/{})",
        "Composing".blue(),
        stage_config.cluster.cyan(),
        stage_config.strategy,
        stage_config.credentials,
        stage_config.region
    );

    let output = match hook {
        Hook::All => serde_json::to_value(processor.compose(&stage_config).await?)?,
        Hook::Steps => serde_json::to_value(processor.additional_steps(&stage_config))?,
        Hook::Before => {
            serde_json::to_value(processor.before_stage_definitions(&stage_config).await?)?
        }
        Hook::After => {
            serde_json::to_value(processor.after_stage_definitions(&stage_config).await?)?
        }
        Hook::OnFailure => {
            serde_json::to_value(processor.on_failure_stage_definitions(&stage_config).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
