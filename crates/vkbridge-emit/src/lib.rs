//! Source rendering of the vkbridge bridge model.
//!
//! A thin layer: it consumes the fully resolved, ordered, deduplicated
//! model and produces text. No analysis happens here; a different emitter
//! could replace this crate without touching the model.
//!
//! ## Modules
//!
//! - [`decl`] — C declaration text for members and prototypes
//! - [`header`] — the public API header (foreign layout)
//! - [`driver`] — the platform driver interface header
//! - [`thunks`] — the bridging header and thunk source

pub mod decl;
pub mod driver;
pub mod error;
pub mod header;
pub mod thunks;

use std::path::Path;

use tracing::info;

use vkbridge_abi::{BridgeModel, LayoutAnalyzer};
use vkbridge_registry::{Catalog, GeneratorConfig};
use vkbridge_resolve::RequiredSet;

pub use error::EmitError;

/// File names of the generated sources.
pub const API_HEADER: &str = "vulkan.h";
pub const DRIVER_HEADER: &str = "vulkan_driver.h";
pub const BRIDGE_HEADER: &str = "vulkan_thunks.h";
pub const THUNK_SOURCE: &str = "vulkan_thunks.c";

/// The four rendered artifacts.
#[derive(Debug)]
pub struct Artifacts {
    pub api_header: String,
    pub driver_header: String,
    pub bridge_header: String,
    pub thunk_source: String,
}

/// Render all artifacts from the model.
pub fn render_all(
    catalog: &Catalog,
    model: &BridgeModel,
    required: &RequiredSet,
    config: &GeneratorConfig,
) -> error::Result<Artifacts> {
    let mut layout = LayoutAnalyzer::new();
    Ok(Artifacts {
        api_header: header::render_api_header(catalog, model, required, &mut layout)?,
        driver_header: driver::render_driver_header(catalog, model, config)?,
        bridge_header: thunks::render_bridge_header(catalog, model, &mut layout)?,
        thunk_source: thunks::render_thunk_source(catalog, model, &mut layout, config)?,
    })
}

impl Artifacts {
    /// Write the four files into a directory, creating it if needed.
    pub fn write_to_dir(&self, dir: &Path) -> error::Result<()> {
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(API_HEADER), &self.api_header)?;
        std::fs::write(dir.join(DRIVER_HEADER), &self.driver_header)?;
        std::fs::write(dir.join(BRIDGE_HEADER), &self.bridge_header)?;
        std::fs::write(dir.join(THUNK_SOURCE), &self.thunk_source)?;
        info!(dir = %dir.display(), "wrote generated sources");
        Ok(())
    }
}
