//! `vkbridge generate` — full pipeline, writes the four source files.

use std::path::Path;

use anyhow::Context;

use vkbridge_abi::build_model;
use vkbridge_emit::render_all;
use vkbridge_registry::Catalog;
use vkbridge_resolve::resolve;

pub fn run(registry_path: &Path, config_path: Option<&Path>, out_dir: &Path) -> anyhow::Result<()> {
    let (raw, config) = super::load_inputs(registry_path, config_path)?;

    let mut catalog = Catalog::build(&raw).context("building entity catalog")?;
    let resolution = resolve(&mut catalog, &raw.features, &raw.extensions, &config)
        .context("resolving required entities")?;
    let model = build_model(&catalog, &resolution, &config).context("assembling bridge model")?;
    let artifacts =
        render_all(&catalog, &model, &resolution.required, &config).context("rendering sources")?;
    artifacts.write_to_dir(out_dir)?;

    let summary = model.summary();
    println!(
        "generated {} ({} structs, {} conversions, {} functions)",
        out_dir.display(),
        summary.required_structs,
        summary.operations,
        summary.global_functions + summary.instance_functions + summary.device_functions,
    );
    Ok(())
}
