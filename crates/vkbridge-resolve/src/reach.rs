//! Required-entity closure computation.
//!
//! Starting from the core feature blocks and the included extensions, walk
//! the entity graph (parameter-of, member-of, requires edges) and collect
//! every reachable entity. The output is an immutable [`RequiredSet`]:
//! downstream stages read it, nothing mutates requiredness afterwards.

use std::collections::HashSet;

use tracing::{debug, info};

use vkbridge_registry::entity::{EntityKind, TypeRef};
use vkbridge_registry::{
    Catalog, EntityId, EnumValue, GeneratorConfig, RawExtension, RawExtensionKind, RawFeature,
};

use crate::error::{ResolveError, Result};
use crate::numbering::{bit_value, extension_enum_value};
use crate::policy::filter_extensions;

/// The set of entities required by the selected API surface.
#[derive(Debug, Clone, Default)]
pub struct RequiredSet {
    ids: HashSet<EntityId>,
}

impl RequiredSet {
    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.ids.iter().copied()
    }

    /// Insert an id; false if it was already present. Doubles as the
    /// visited guard of the reachability walk, so cyclic struct references
    /// terminate.
    fn insert(&mut self, id: EntityId) -> bool {
        self.ids.insert(id)
    }
}

/// A surviving extension, for the emitter's extension name tables.
#[derive(Debug, Clone)]
pub struct ExtensionInfo {
    pub name: String,
    pub kind: RawExtensionKind,
}

/// Output of resolution: the required closure plus surviving extensions.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub required: RequiredSet,
    pub extensions: Vec<ExtensionInfo>,
}

/// Resolve the required closure for the given feature blocks and extension
/// set.
///
/// The catalog is borrowed mutably because included extensions append enum
/// values and stamp their name onto pulled-in functions; after this call
/// the catalog is read-only ground truth for every downstream stage.
pub fn resolve(
    catalog: &mut Catalog,
    features: &[RawFeature],
    extensions: &[RawExtension],
    config: &GeneratorConfig,
) -> Result<Resolution> {
    let mut required = RequiredSet::default();

    // Core feature blocks, in document order.
    for feature in features {
        info!(feature = %feature.name, "including feature block");
        for command in &feature.commands {
            mark_command(catalog, &mut required, command, &feature.name)?;
        }
        for type_name in &feature.types {
            let id = catalog
                .id_of(type_name)
                .ok_or_else(|| ResolveError::UnknownType {
                    name: type_name.clone(),
                    source_block: feature.name.clone(),
                })?;
            mark_entity(catalog, &mut required, id);
        }
    }

    // Extensions surviving the inclusion policy.
    let included = filter_extensions(extensions, config);
    let mut infos: Vec<ExtensionInfo> = Vec::with_capacity(included.len());

    for ext in included {
        debug!(extension = %ext.name, "loading extension");

        // Enum contributions first; commands may depend on the extended
        // enums through their parameter structs.
        for contribution in &ext.enums {
            if let Some(bitpos) = contribution.bitpos {
                catalog.add_enum_value(
                    &contribution.extends,
                    EnumValue {
                        name: contribution.name.clone(),
                        value: bit_value(bitpos),
                        hex: true,
                    },
                )?;
            } else if let Some(offset) = contribution.offset {
                let value = extension_enum_value(
                    config.ext_base,
                    config.ext_block_size,
                    ext.number,
                    offset,
                    contribution.negative,
                );
                catalog.add_enum_value(
                    &contribution.extends,
                    EnumValue {
                        name: contribution.name.clone(),
                        value,
                        hex: false,
                    },
                )?;
            } else {
                // Literal values carry extension name/version macros only.
                debug!(value = %contribution.name, "skipping literal enum contribution");
            }
        }

        for command in &ext.commands {
            mark_command(catalog, &mut required, command, &ext.name)?;
            // The id must exist: mark_command just resolved it.
            if let Some(id) = catalog.id_of(command) {
                catalog.set_function_extension(id, &ext.name);
            }
        }

        infos.push(ExtensionInfo {
            name: ext.name.clone(),
            kind: ext.kind,
        });
    }

    infos.sort_by(|a, b| a.name.cmp(&b.name));

    info!(
        required = required.len(),
        extensions = infos.len(),
        "resolution complete"
    );

    Ok(Resolution {
        required,
        extensions: infos,
    })
}

/// Mark a command and everything reachable from its signature.
fn mark_command(
    catalog: &Catalog,
    required: &mut RequiredSet,
    name: &str,
    source_block: &str,
) -> Result<()> {
    let id = catalog
        .id_of(name)
        .filter(|id| catalog.get(*id).is_function())
        .ok_or_else(|| ResolveError::UnknownCommand {
            name: name.to_string(),
            source_block: source_block.to_string(),
        })?;

    required.insert(id);

    let func = catalog
        .get(id)
        .as_function()
        .expect("checked function kind above");

    if let TypeRef::Entity(ret) = func.return_type {
        mark_entity(catalog, required, ret);
    }
    for param in &func.params {
        if let TypeRef::Entity(ty) = param.ty {
            mark_entity(catalog, required, ty);
        }
    }
    Ok(())
}

/// Mark an entity and recurse through its type dependencies. The required
/// set itself is the visited guard, so mutually referencing structures
/// cannot loop.
fn mark_entity(catalog: &Catalog, required: &mut RequiredSet, id: EntityId) {
    if !required.insert(id) {
        return;
    }

    match &catalog.get(id).kind {
        EntityKind::Struct(s) => {
            for member in &s.members {
                if let TypeRef::Entity(ty) = member.ty {
                    mark_entity(catalog, required, ty);
                }
            }
        }
        EntityKind::FuncPointer(fp) => {
            for member in &fp.members {
                if let TypeRef::Entity(ty) = member.ty {
                    mark_entity(catalog, required, ty);
                }
            }
        }
        EntityKind::Bitmask(b) => {
            if let Some(flag_bits) = b.flag_bits {
                mark_entity(catalog, required, flag_bits);
            }
        }
        // Leaf kinds: nothing further to pull in.
        EntityKind::Base(_)
        | EntityKind::Constant(_)
        | EntityKind::Define(_)
        | EntityKind::Enum(_)
        | EntityKind::Handle(_)
        | EntityKind::Function(_) => {}
    }
}
