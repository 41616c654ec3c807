//! `vkbridge check` — resolve and analyze without writing sources.

use std::path::Path;

use anyhow::Context;

use vkbridge_abi::build_model;
use vkbridge_registry::Catalog;
use vkbridge_resolve::resolve;

pub fn run(
    registry_path: &Path,
    config_path: Option<&Path>,
    report: Option<&str>,
) -> anyhow::Result<()> {
    let (raw, config) = super::load_inputs(registry_path, config_path)?;

    let mut catalog = Catalog::build(&raw).context("building entity catalog")?;
    let resolution = resolve(&mut catalog, &raw.features, &raw.extensions, &config)
        .context("resolving required entities")?;
    let model = build_model(&catalog, &resolution, &config).context("assembling bridge model")?;
    let summary = model.summary();

    match report {
        Some("json") => println!("{}", serde_json::to_string_pretty(&summary)?),
        _ => {
            println!("registry: {} entities", catalog.len());
            println!("required structs:   {}", summary.required_structs);
            println!("converting structs: {}", summary.conversion_structs);
            println!("conversions/frees:  {}", summary.operations);
            println!(
                "functions:          {} global, {} instance, {} device",
                summary.global_functions, summary.instance_functions, summary.device_functions
            );
            println!("extensions:         {}", summary.extensions);
        }
    }
    Ok(())
}
