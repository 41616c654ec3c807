//! CLI subcommand implementations.

pub mod check;
pub mod generate;

use std::path::Path;

use anyhow::Context;

use vkbridge_registry::{GeneratorConfig, RawRegistry};

/// Load the registry document and the (optional) configuration file.
pub fn load_inputs(
    registry_path: &Path,
    config_path: Option<&Path>,
) -> anyhow::Result<(RawRegistry, GeneratorConfig)> {
    let raw = RawRegistry::load(registry_path)
        .with_context(|| format!("loading registry {}", registry_path.display()))?;
    let config = match config_path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };
    Ok((raw, config))
}
