//! The resolved bridge model.
//!
//! Everything the emitter needs, fully computed: dependency-ordered
//! structure lists, the deduplicated conversion/free operation list, the
//! three function scope lists and the surviving extension metadata. The
//! model is plain data; rendering never mutates it.

use serde::Serialize;

use vkbridge_registry::EntityId;
use vkbridge_resolve::ExtensionInfo;

use crate::classify::Classified;
use crate::convert::SynthesizedOp;

/// Output of the analysis pipeline.
#[derive(Debug)]
pub struct BridgeModel {
    /// All required structures, ordered so no declaration forward-references.
    pub required_structs: Vec<EntityId>,
    /// The subset needing host-layout variants, independently ordered.
    pub conversion_structs: Vec<EntityId>,
    /// Conversion and free functions in safe-to-emit order.
    pub operations: Vec<SynthesizedOp>,
    /// Classified functions with directions and dispatch metadata.
    pub functions: Classified,
    /// Surviving extensions, name-sorted.
    pub extensions: Vec<ExtensionInfo>,
}

impl BridgeModel {
    /// Machine-readable statistics for `check --report json`.
    pub fn summary(&self) -> ModelSummary {
        ModelSummary {
            required_structs: self.required_structs.len(),
            conversion_structs: self.conversion_structs.len(),
            operations: self.operations.len(),
            global_functions: self.functions.global.len(),
            instance_functions: self.functions.instance.len(),
            device_functions: self.functions.device.len(),
            extensions: self.extensions.len(),
        }
    }
}

/// Counts over the assembled model.
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub required_structs: usize,
    pub conversion_structs: usize,
    pub operations: usize,
    pub global_functions: usize,
    pub instance_functions: usize,
    pub device_functions: usize,
    pub extensions: usize,
}
