//! Function scope classification and parameter direction inference.
//!
//! Every required function lands in exactly one of three scopes: global
//! functions are reached before any dispatchable object exists, instance
//! functions dispatch through the top-level scope handles, everything else
//! dispatches through the device scope.
//!
//! Parameter direction cannot be read off the declaration alone: a
//! non-const pointer can be an output, a caller-filled input, or both at
//! once for the extensible query structures. The rules below run in order;
//! the chain/tag check must precede the generic non-const-pointer fallback.

use serde::Serialize;

use vkbridge_registry::entity::{EntityKind, Member, TypeRef};
use vkbridge_registry::{Catalog, EntityId, FunctionOverride, GeneratorConfig};

use crate::convert::param_needs_conversion;
use crate::error::{AbiError, Result};
use crate::layout::LayoutAnalyzer;

/// Handle types whose first-parameter presence marks an instance-scope
/// function.
pub const INSTANCE_SCOPE_HANDLES: [&str; 2] = ["VkInstance", "VkPhysicalDevice"];

/// The designated entry function, global because it accepts a null
/// instance.
pub const GLOBAL_ENTRY_FUNCTION: &str = "vkGetInstanceProcAddr";

/// Parameter direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    pub fn is_input(self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }

    pub fn is_output(self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }
}

/// Function scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FunctionScope {
    Global,
    Instance,
    Device,
}

/// A classified function with everything the emitter needs.
#[derive(Debug, Clone)]
pub struct FunctionBinding {
    pub id: EntityId,
    pub name: String,
    pub scope: FunctionScope,
    /// Per-parameter directions, in declaration order.
    pub directions: Vec<Direction>,
    /// Dispatch/driver/thunk participation.
    pub overrides: FunctionOverride,
    /// Whether any parameter requires cross-ABI conversion.
    pub needs_conversion: bool,
}

/// The three scope lists, each name-sorted.
#[derive(Debug, Clone, Default)]
pub struct Classified {
    pub global: Vec<FunctionBinding>,
    pub instance: Vec<FunctionBinding>,
    pub device: Vec<FunctionBinding>,
}

impl Classified {
    /// All bindings across the three scopes.
    pub fn all(&self) -> impl Iterator<Item = &FunctionBinding> {
        self.global
            .iter()
            .chain(self.instance.iter())
            .chain(self.device.iter())
    }

    pub fn len(&self) -> usize {
        self.global.len() + self.instance.len() + self.device.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Infer the direction of a single parameter.
pub fn param_direction(catalog: &Catalog, param: &Member) -> Result<Direction> {
    // 1. By-value: always an input.
    if !param.is_pointer() {
        return Ok(Direction::In);
    }
    // 2. Pointer-to-const: an input.
    if param.is_const {
        return Ok(Direction::In);
    }
    // 3. Non-const pointer to a struct.
    if let TypeRef::Entity(id) = param.ty {
        if let EntityKind::Struct(s) = &catalog.get(id).kind {
            if !s.returned_only {
                // Caller supplies the whole struct by reference.
                return Ok(Direction::In);
            }
            if s.has_chain_tag() {
                // Extensible query struct: the caller seeds the chain and
                // tag, the callee fills the rest.
                return Ok(Direction::InOut);
            }
            return Ok(Direction::Out);
        }
    }
    // 4. Any other non-const pointer.
    Ok(Direction::Out)
}

/// Classify a function into its scope.
pub fn function_scope(catalog: &Catalog, id: EntityId) -> Result<FunctionScope> {
    let entity = catalog.get(id);
    let func = entity
        .as_function()
        .ok_or_else(|| AbiError::MissingOverrideMetadata {
            function: entity.name.clone(),
        })?;

    if entity.name == GLOBAL_ENTRY_FUNCTION {
        return Ok(FunctionScope::Global);
    }

    let first = func
        .params
        .first()
        .ok_or_else(|| AbiError::MissingOverrideMetadata {
            function: entity.name.clone(),
        })?;

    let first_is_dispatchable = match first.ty {
        TypeRef::Entity(ty) => catalog
            .get(ty)
            .as_handle()
            .map(|h| h.dispatchable)
            .unwrap_or(false),
        TypeRef::Scalar(_) => false,
    };

    if !first_is_dispatchable {
        return Ok(FunctionScope::Global);
    }
    if INSTANCE_SCOPE_HANDLES.contains(&first.type_name.as_str()) {
        return Ok(FunctionScope::Instance);
    }
    Ok(FunctionScope::Device)
}

/// Classify every required function, producing the three scope lists.
pub fn classify_functions(
    catalog: &Catalog,
    required: &vkbridge_resolve::RequiredSet,
    config: &GeneratorConfig,
    layout: &mut LayoutAnalyzer,
) -> Result<Classified> {
    let mut classified = Classified::default();

    for id in catalog.function_ids() {
        if !required.contains(id) {
            continue;
        }
        let entity = catalog.get(id);
        let func = entity.as_function().expect("function_ids yields functions");

        let scope = function_scope(catalog, id)?;
        let mut directions = Vec::with_capacity(func.params.len());
        let mut needs_conversion = false;
        for param in &func.params {
            directions.push(param_direction(catalog, param)?);
            if param_needs_conversion(catalog, layout, config, param)? {
                needs_conversion = true;
            }
        }

        let binding = FunctionBinding {
            id,
            name: entity.name.clone(),
            scope,
            directions,
            overrides: config.override_for(&entity.name),
            needs_conversion,
        };

        match scope {
            FunctionScope::Global => classified.global.push(binding),
            FunctionScope::Instance => classified.instance.push(binding),
            FunctionScope::Device => classified.device.push(binding),
        }
    }

    Ok(classified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkbridge_registry::RawRegistry;
    use vkbridge_resolve::resolve;

    fn fixture() -> (Catalog, vkbridge_resolve::Resolution, GeneratorConfig) {
        let raw = RawRegistry::parse(
            r#"
[[enums]]
name = "VkResult"

[[enums.values]]
name = "VK_SUCCESS"
value = 0

[[enums]]
name = "VkStructureType"

[[enums.values]]
name = "VK_STRUCTURE_TYPE_PROPERTIES_2"
value = 1

[[handles]]
name = "VkInstance"
dispatchable = true

[[handles]]
name = "VkPhysicalDevice"
dispatchable = true
parent = "VkInstance"

[[handles]]
name = "VkDevice"
dispatchable = true
parent = "VkPhysicalDevice"

[[structs]]
name = "VkCreateInfo"

[[structs.members]]
name = "flags"
type = "uint32_t"

[[structs]]
name = "VkProperties"
returned-only = true

[[structs.members]]
name = "apiVersion"
type = "uint32_t"

[[structs]]
name = "VkProperties2"
returned-only = true

[[structs.members]]
name = "sType"
type = "VkStructureType"

[[structs.members]]
name = "pNext"
type = "void"
pointer = 1

[[structs.members]]
name = "size"
type = "uint64_t"

[[commands]]
name = "vkGetInstanceProcAddr"
return-type = "void"

[[commands.params]]
name = "instance"
type = "VkInstance"

[[commands.params]]
name = "pName"
type = "char"
const = true
pointer = 1

[[commands]]
name = "vkGetPhysicalDeviceProperties"
return-type = "void"

[[commands.params]]
name = "physicalDevice"
type = "VkPhysicalDevice"

[[commands.params]]
name = "pProperties"
type = "VkProperties"
pointer = 1

[[commands]]
name = "vkGetPhysicalDeviceProperties2"
return-type = "void"

[[commands.params]]
name = "physicalDevice"
type = "VkPhysicalDevice"

[[commands.params]]
name = "pProperties"
type = "VkProperties2"
pointer = 1

[[commands]]
name = "vkCreateThing"
return-type = "VkResult"

[[commands.params]]
name = "device"
type = "VkDevice"

[[commands.params]]
name = "pCreateInfo"
type = "VkCreateInfo"
pointer = 1

[[commands]]
name = "vkEnumerateInstanceExtensionProperties"
return-type = "VkResult"

[[commands.params]]
name = "pPropertyCount"
type = "uint32_t"
pointer = 1

[[features]]
name = "VK_VERSION_1_0"
commands = [
    "vkGetInstanceProcAddr",
    "vkGetPhysicalDeviceProperties",
    "vkGetPhysicalDeviceProperties2",
    "vkCreateThing",
    "vkEnumerateInstanceExtensionProperties",
]
"#,
        )
        .unwrap();
        let mut catalog = Catalog::build(&raw).unwrap();
        let config = GeneratorConfig::default();
        let resolution = resolve(&mut catalog, &raw.features, &raw.extensions, &config).unwrap();
        (catalog, resolution, config)
    }

    #[test]
    fn scopes_split_by_first_parameter() {
        let (catalog, resolution, config) = fixture();
        let mut layout = LayoutAnalyzer::new();
        let classified =
            classify_functions(&catalog, &resolution.required, &config, &mut layout).unwrap();

        let names = |list: &[FunctionBinding]| -> Vec<String> {
            list.iter().map(|b| b.name.clone()).collect()
        };

        assert_eq!(
            names(&classified.global),
            [
                "vkEnumerateInstanceExtensionProperties",
                "vkGetInstanceProcAddr"
            ]
        );
        assert_eq!(
            names(&classified.instance),
            [
                "vkGetPhysicalDeviceProperties",
                "vkGetPhysicalDeviceProperties2"
            ]
        );
        assert_eq!(names(&classified.device), ["vkCreateThing"]);
    }

    #[test]
    fn direction_rules_in_order() {
        let (catalog, _resolution, _config) = fixture();

        let dir_of = |func: &str, idx: usize| {
            let f = catalog.lookup(func).unwrap().as_function().unwrap();
            param_direction(&catalog, &f.params[idx]).unwrap()
        };

        // By-value handle.
        assert_eq!(dir_of("vkCreateThing", 0), Direction::In);
        // Const char pointer.
        assert_eq!(dir_of("vkGetInstanceProcAddr", 1), Direction::In);
        // Non-const pointer to a plain struct: caller-supplied input.
        assert_eq!(dir_of("vkCreateThing", 1), Direction::In);
        // Non-const pointer to returned-only without chain/tag: output.
        assert_eq!(dir_of("vkGetPhysicalDeviceProperties", 1), Direction::Out);
        // Returned-only with chain/tag pair: input-output.
        assert_eq!(
            dir_of("vkGetPhysicalDeviceProperties2", 1),
            Direction::InOut
        );
        // Non-const pointer to a scalar: output.
        assert_eq!(
            dir_of("vkEnumerateInstanceExtensionProperties", 0),
            Direction::Out
        );
    }

    #[test]
    fn conversion_flag_tracks_parameters() {
        let (catalog, resolution, config) = fixture();
        let mut layout = LayoutAnalyzer::new();
        let classified =
            classify_functions(&catalog, &resolution.required, &config, &mut layout).unwrap();

        let binding = |name: &str| classified.all().find(|b| b.name == name).unwrap();
        // VkProperties2 carries a 64-bit member.
        assert!(binding("vkGetPhysicalDeviceProperties2").needs_conversion);
        assert!(!binding("vkCreateThing").needs_conversion);
    }

    #[test]
    fn override_metadata_attached() {
        let (catalog, resolution, config) = fixture();
        let mut layout = LayoutAnalyzer::new();
        let classified =
            classify_functions(&catalog, &resolution.required, &config, &mut layout).unwrap();

        let entry = classified
            .all()
            .find(|b| b.name == GLOBAL_ENTRY_FUNCTION)
            .unwrap();
        assert!(entry.overrides.driver);
        assert!(!entry.overrides.thunk);

        let plain = classified.all().find(|b| b.name == "vkCreateThing").unwrap();
        assert!(plain.overrides.dispatch);
        assert!(plain.overrides.thunk);
    }
}
