use crate::inputs::read_document;
use colored::Colorize;
use deployflow_config::ComposerConfig;
use deployflow_core::StageConfig;
use std::path::Path;

pub fn handle(config: &ComposerConfig, stage: &Path) -> anyhow::Result<()> {
    let stage_config: StageConfig = read_document(stage)?;
    let registry = super::compose::build_registry(config, None)?;

    match registry.find(&stage_config) {
        Ok(processor) => {
            println!(
                "{} {} is handled by {}",
                "✓".green().bold(),
                stage_config.cloud_provider.cyan(),
                processor.name()
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("{} {}", "✗".red().bold(), e);
            eprintln!("  configured providers: {}", registry.names().join(", "));
            std::process::exit(1);
        }
    }
}
