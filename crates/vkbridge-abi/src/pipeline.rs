//! Analysis pipeline: resolution output to bridge model.
//!
//! Runs strictly after resolution has reached its fixed point; every stage
//! here treats the catalog and the required set as read-only ground truth.

use tracing::info;

use vkbridge_registry::{Catalog, GeneratorConfig};
use vkbridge_resolve::Resolution;

use crate::classify::classify_functions;
use crate::convert::synthesize;
use crate::error::Result;
use crate::layout::LayoutAnalyzer;
use crate::model::BridgeModel;
use crate::order::dependency_order;

/// Build the full bridge model from a resolved catalog.
pub fn build_model(
    catalog: &Catalog,
    resolution: &Resolution,
    config: &GeneratorConfig,
) -> Result<BridgeModel> {
    let mut layout = LayoutAnalyzer::new();
    let required = &resolution.required;

    // The two independently ordered structure subsets: everything required
    // (public header), and the converting subset (bridging header).
    let required_subset: Vec<_> = catalog
        .struct_ids()
        .into_iter()
        .filter(|id| required.contains(*id))
        .collect();

    let mut conversion_subset = Vec::new();
    for &id in &required_subset {
        if layout.struct_needs_conversion(catalog, id)? {
            conversion_subset.push(id);
        }
    }

    let required_structs = dependency_order(catalog, &required_subset)?;
    let conversion_structs = dependency_order(catalog, &conversion_subset)?;

    let functions = classify_functions(catalog, required, config, &mut layout)?;
    let operations = synthesize(catalog, required, config, &mut layout)?;

    let model = BridgeModel {
        required_structs,
        conversion_structs,
        operations,
        functions,
        extensions: resolution.extensions.clone(),
    };

    info!(
        structs = model.required_structs.len(),
        converting = model.conversion_structs.len(),
        operations = model.operations.len(),
        functions = model.functions.len(),
        "bridge model assembled"
    );

    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Direction;
    use crate::convert::{Arrayness, ConversionDirection, SynthesizedOp};
    use vkbridge_registry::RawRegistry;
    use vkbridge_resolve::resolve;

    /// Minimal registry: one feature requiring one function taking a plain
    /// 32-bit struct by value and writing a returned-only 64-bit struct.
    fn minimal() -> (Catalog, Resolution, GeneratorConfig) {
        let raw = RawRegistry::parse(
            r#"
[[enums]]
name = "VkResult"

[[enums.values]]
name = "VK_SUCCESS"
value = 0

[[handles]]
name = "VkDevice"
dispatchable = true

[[structs]]
name = "VkPlainStruct"

[[structs.members]]
name = "flags"
type = "uint32_t"

[[structs]]
name = "VkReturnedOnlyStruct"
returned-only = true

[[structs.members]]
name = "size"
type = "uint64_t"

[[commands]]
name = "vkQueryThing"
return-type = "VkResult"

[[commands.params]]
name = "device"
type = "VkDevice"

[[commands.params]]
name = "input"
type = "VkPlainStruct"

[[commands.params]]
name = "pOutput"
type = "VkReturnedOnlyStruct"
pointer = 1

[[features]]
name = "VK_VERSION_1_0"
commands = ["vkQueryThing"]
"#,
        )
        .unwrap();
        let mut catalog = Catalog::build(&raw).unwrap();
        let config = GeneratorConfig::default();
        let resolution = resolve(&mut catalog, &raw.features, &raw.extensions, &config).unwrap();
        (catalog, resolution, config)
    }

    #[test]
    fn end_to_end_minimal_model() {
        let (catalog, resolution, config) = minimal();
        let model = build_model(&catalog, &resolution, &config).unwrap();

        // Both structs are required.
        let names: Vec<&str> = model
            .required_structs
            .iter()
            .map(|&id| catalog.name(id))
            .collect();
        assert!(names.contains(&"VkPlainStruct"));
        assert!(names.contains(&"VkReturnedOnlyStruct"));

        // Only the 64-bit struct converts.
        let conv: Vec<&str> = model
            .conversion_structs
            .iter()
            .map(|&id| catalog.name(id))
            .collect();
        assert_eq!(conv, ["VkReturnedOnlyStruct"]);

        // The output parameter is classified Out.
        let binding = model
            .functions
            .device
            .iter()
            .find(|b| b.name == "vkQueryThing")
            .unwrap();
        assert_eq!(binding.directions[1], Direction::In);
        assert_eq!(binding.directions[2], Direction::Out);
        assert!(binding.needs_conversion);

        // Exactly one from-host scalar conversion, for the output struct.
        let convs: Vec<_> = model
            .operations
            .iter()
            .filter_map(|op| match op {
                SynthesizedOp::Convert(c) => Some(c),
                SynthesizedOp::Free(_) => None,
            })
            .collect();
        assert_eq!(convs.len(), 1);
        assert_eq!(convs[0].direction, ConversionDirection::ToForeign);
        assert_eq!(convs[0].arrayness, Arrayness::Scalar);
        assert_eq!(catalog.name(convs[0].ty), "VkReturnedOnlyStruct");
    }

    #[test]
    fn summary_counts() {
        let (catalog, resolution, config) = minimal();
        let model = build_model(&catalog, &resolution, &config).unwrap();
        let summary = model.summary();
        assert_eq!(summary.conversion_structs, 1);
        assert_eq!(summary.device_functions, 1);
        assert_eq!(summary.operations, 1);
        assert_eq!(summary.extensions, 0);
    }
}
