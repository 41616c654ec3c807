//! Driver-interface header rendering.
//!
//! The platform driver provides only the functions marked `driver` in the
//! override table; everything else reaches the native API through the
//! dispatch tables of dispatchable objects.

use vkbridge_registry::{Catalog, GeneratorConfig};

use vkbridge_abi::BridgeModel;

use crate::decl::pfn;
use crate::error::Result;

/// Render the driver-interface header.
pub fn render_driver_header(
    catalog: &Catalog,
    model: &BridgeModel,
    config: &GeneratorConfig,
) -> Result<String> {
    let mut out = String::new();
    out.push_str("/* Automatically generated from the API registry; do not edit. */\n\n");
    out.push_str("#ifndef __VKBRIDGE_DRIVER_H\n#define __VKBRIDGE_DRIVER_H\n\n");

    out.push_str("/* Bump on any change to the driver function table. */\n");
    out.push_str(&format!(
        "#define VKBRIDGE_DRIVER_VERSION {}\n\n",
        config.driver_version
    ));

    out.push_str("struct vulkan_driver_funcs\n{\n");
    for binding in model.functions.all() {
        if !binding.overrides.driver {
            continue;
        }
        let func = catalog
            .get(binding.id)
            .as_function()
            .expect("classified function");
        // Keep the driver table free of the void-function pointer typedef:
        // its spelling drags calling-convention details along.
        let text = pfn(&binding.name, func, None).replace("PFN_vkVoidFunction", "void *");
        out.push_str(&format!("    {text};\n"));
    }
    out.push_str("};\n\n");

    out.push_str(
        "extern const struct vulkan_driver_funcs *vkbridge_get_driver(unsigned int version);\n\n",
    );
    out.push_str("#endif /* __VKBRIDGE_DRIVER_H */\n");
    Ok(out)
}
