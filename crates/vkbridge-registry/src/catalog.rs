//! The entity catalog: an arena of typed entities keyed by name.
//!
//! Construction is two-pass: first every entity name is interned and given
//! an arena index, then payloads are built with member type references
//! resolved through the name index. Registry entries reference each other
//! freely by name and there is no forward-declaration notion in the
//! document, so nothing can be resolved until all names are known.

use std::collections::HashMap;

use crate::entity::{
    BaseType, Bitmask, Constant, Define, Entity, EntityId, EntityKind, EnumType, EnumValue,
    FuncPointer, Function, Handle, Member, MemberRole, StructType, TypeRef,
};
use crate::error::{RegistryError, Result};
use crate::raw::RawRegistry;
use crate::scalar::ScalarType;

/// The synthesized maximum sentinel appended to every enum.
pub const MAX_ENUM_SENTINEL: i64 = 0x7fff_ffff;

/// Name-keyed arena of all API entities.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entities: Vec<Entity>,
    by_name: HashMap<String, EntityId>,
}

impl Catalog {
    /// Build the catalog from a raw registry document.
    pub fn build(raw: &RawRegistry) -> Result<Catalog> {
        raw.validate()?;

        let mut by_name: HashMap<String, EntityId> = HashMap::new();
        let mut count: u32 = 0;

        // Pass 1: intern every entity name in category order.
        {
            let mut add = |name: &str| -> Result<()> {
                let id = EntityId(count);
                if by_name.insert(name.to_string(), id).is_some() {
                    return Err(RegistryError::DuplicateEntity {
                        name: name.to_string(),
                    });
                }
                count += 1;
                Ok(())
            };
            for c in &raw.constants {
                add(&c.name)?;
            }
            for b in &raw.base_types {
                add(&b.name)?;
            }
            for d in &raw.defines {
                add(&d.name)?;
            }
            for e in &raw.enums {
                add(&e.name)?;
            }
            for b in &raw.bitmasks {
                add(&b.name)?;
            }
            for h in &raw.handles {
                add(&h.name)?;
            }
            for fp in &raw.func_pointers {
                add(&fp.name)?;
            }
            for s in &raw.structs {
                add(&s.name)?;
            }
            for c in &raw.commands {
                add(&c.name)?;
            }
        }

        // Pass 2: construct payloads, resolving references by name.
        let mut entities: Vec<Entity> = Vec::with_capacity(by_name.len());

        let resolve = |owner: &str, member: &str, type_name: &str| -> Result<TypeRef> {
            if let Some(scalar) = ScalarType::from_name(type_name) {
                return Ok(TypeRef::Scalar(scalar));
            }
            match by_name.get(type_name) {
                Some(id) => Ok(TypeRef::Entity(*id)),
                None => Err(RegistryError::UnknownTypeReference {
                    entity: owner.to_string(),
                    member: member.to_string(),
                    type_name: type_name.to_string(),
                }),
            }
        };

        let build_members = |owner: &str, raws: &[crate::raw::RawMember], role: MemberRole| -> Result<Vec<Member>> {
            raws.iter()
                .map(|rm| {
                    let ty = resolve(owner, &rm.name, &rm.type_name)?;
                    Ok(Member::from_raw(rm, ty, role))
                })
                .collect()
        };

        for c in &raw.constants {
            entities.push(Entity {
                name: c.name.clone(),
                kind: EntityKind::Constant(Constant {
                    value: c.value.clone(),
                }),
            });
        }

        for b in &raw.base_types {
            let underlying = ScalarType::from_name(&b.underlying).ok_or_else(|| {
                RegistryError::UnknownTypeReference {
                    entity: b.name.clone(),
                    member: "underlying".to_string(),
                    type_name: b.underlying.clone(),
                }
            })?;
            entities.push(Entity {
                name: b.name.clone(),
                kind: EntityKind::Base(BaseType { underlying }),
            });
        }

        for d in &raw.defines {
            entities.push(Entity {
                name: d.name.clone(),
                kind: EntityKind::Define(Define {
                    body: d.body.clone(),
                }),
            });
        }

        for e in &raw.enums {
            let mut values: Vec<EnumValue> = Vec::with_capacity(e.values.len() + 1);
            for v in &e.values {
                match v.bitpos {
                    Some(bitpos) => values.push(EnumValue {
                        name: v.name.clone(),
                        value: 1i64 << bitpos,
                        hex: true,
                    }),
                    None => values.push(EnumValue {
                        name: v.name.clone(),
                        // validate() guarantees value or bitpos.
                        value: v.value.unwrap(),
                        hex: v.hex,
                    }),
                }
            }
            // Sentinel pinning the enum to 32 bits; extensions may add
            // values later and must not change the type's size.
            values.push(EnumValue {
                name: max_enum_name(&e.name),
                value: MAX_ENUM_SENTINEL,
                hex: true,
            });
            entities.push(Entity {
                name: e.name.clone(),
                kind: EntityKind::Enum(EnumType { values }),
            });
        }

        for b in &raw.bitmasks {
            let underlying = resolve(&b.name, "underlying", &b.underlying)?;
            let flag_bits = match &b.flag_bits {
                Some(fb) => Some(*by_name.get(fb).ok_or_else(|| {
                    RegistryError::UnknownTypeReference {
                        entity: b.name.clone(),
                        member: "flag-bits".to_string(),
                        type_name: fb.clone(),
                    }
                })?),
                None => None,
            };
            entities.push(Entity {
                name: b.name.clone(),
                kind: EntityKind::Bitmask(Bitmask {
                    underlying,
                    underlying_name: b.underlying.clone(),
                    flag_bits,
                }),
            });
        }

        for h in &raw.handles {
            let parent = match &h.parent {
                Some(p) => Some(*by_name.get(p).ok_or_else(|| {
                    RegistryError::UnknownTypeReference {
                        entity: h.name.clone(),
                        member: "parent".to_string(),
                        type_name: p.clone(),
                    }
                })?),
                None => None,
            };
            entities.push(Entity {
                name: h.name.clone(),
                kind: EntityKind::Handle(Handle {
                    dispatchable: h.dispatchable,
                    parent,
                }),
            });
        }

        for fp in &raw.func_pointers {
            let members = build_members(&fp.name, &fp.members, MemberRole::Parameter)?;
            entities.push(Entity {
                name: fp.name.clone(),
                kind: EntityKind::FuncPointer(FuncPointer {
                    return_type: fp.return_type.clone(),
                    members,
                }),
            });
        }

        for s in &raw.structs {
            let members = build_members(&s.name, &s.members, MemberRole::StructMember)?;
            entities.push(Entity {
                name: s.name.clone(),
                kind: EntityKind::Struct(StructType {
                    members,
                    returned_only: s.returned_only,
                    is_union: s.union,
                }),
            });
        }

        for c in &raw.commands {
            let return_type = resolve(&c.name, "return", &c.return_type)?;
            let params = build_members(&c.name, &c.params, MemberRole::Parameter)?;
            entities.push(Entity {
                name: c.name.clone(),
                kind: EntityKind::Function(Function {
                    return_type,
                    return_type_name: c.return_type.clone(),
                    params,
                    extension: None,
                }),
            });
        }

        Ok(Catalog { entities, by_name })
    }

    // --- Lookup ---

    pub fn get(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn name(&self, id: EntityId) -> &str {
        &self.entities[id.index()].name
    }

    pub fn id_of(&self, name: &str) -> Option<EntityId> {
        self.by_name.get(name).copied()
    }

    pub fn lookup(&self, name: &str) -> Option<&Entity> {
        self.id_of(name).map(|id| self.get(id))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate all entities with their ids, in construction order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, e)| (EntityId(i as u32), e))
    }

    /// Ids of all entities matching a predicate, sorted by entity name so
    /// emission order is deterministic.
    pub fn sorted_ids_where(&self, pred: impl Fn(&Entity) -> bool) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self
            .iter()
            .filter(|(_, e)| pred(e))
            .map(|(id, _)| id)
            .collect();
        ids.sort_by(|a, b| self.name(*a).cmp(self.name(*b)));
        ids
    }

    /// All struct/union ids, name-sorted.
    pub fn struct_ids(&self) -> Vec<EntityId> {
        self.sorted_ids_where(Entity::is_struct)
    }

    /// All function ids, name-sorted.
    pub fn function_ids(&self) -> Vec<EntityId> {
        self.sorted_ids_where(Entity::is_function)
    }

    // --- Resolver-phase mutation ---

    /// Append an extension-contributed value to an enum.
    pub fn add_enum_value(&mut self, enum_name: &str, value: EnumValue) -> Result<()> {
        let value_name = value.name.clone();
        let id = self
            .id_of(enum_name)
            .ok_or_else(|| RegistryError::UnknownEnumTarget {
                enum_name: enum_name.to_string(),
                value_name: value_name.clone(),
            })?;
        match &mut self.entities[id.index()].kind {
            EntityKind::Enum(e) => {
                e.add(value);
                Ok(())
            }
            _ => Err(RegistryError::UnknownEnumTarget {
                enum_name: enum_name.to_string(),
                value_name,
            }),
        }
    }

    /// Record which extension pulled a function in.
    pub fn set_function_extension(&mut self, id: EntityId, extension: &str) {
        if let EntityKind::Function(f) = &mut self.entities[id.index()].kind {
            f.extension = Some(extension.to_string());
        }
    }
}

/// Derive the `*_MAX_ENUM` sentinel name from a camel-case enum name,
/// e.g. `VkImageTiling` -> `VK_IMAGE_TILING_MAX_ENUM`.
pub fn max_enum_name(enum_name: &str) -> String {
    let mut out = String::with_capacity(enum_name.len() + 12);
    let chars: Vec<char> = enum_name.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 {
            let prev = chars[i - 1];
            let prev_lower = prev.is_ascii_lowercase() || prev.is_ascii_digit() || prev == '_';
            let cur_upper = c.is_ascii_uppercase();
            if prev_lower && cur_upper {
                out.push('_');
            }
        }
        out.push(c.to_ascii_uppercase());
    }
    out.push_str("_MAX_ENUM");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_registry() -> RawRegistry {
        RawRegistry::parse(
            r#"
[[base-types]]
name = "VkDeviceSize"
underlying = "uint64_t"

[[enums]]
name = "VkResult"

[[enums.values]]
name = "VK_SUCCESS"
value = 0

[[enums.values]]
name = "VK_NOT_READY"
value = 1

[[handles]]
name = "VkInstance"
dispatchable = true

[[handles]]
name = "VkFence"
dispatchable = false
parent = "VkInstance"

[[structs]]
name = "VkExtent2D"

[[structs.members]]
name = "width"
type = "uint32_t"

[[structs.members]]
name = "height"
type = "uint32_t"

[[structs]]
name = "VkRect2D"

[[structs.members]]
name = "extent"
type = "VkExtent2D"

[[commands]]
name = "vkWaitForFences"
return-type = "VkResult"

[[commands.params]]
name = "instance"
type = "VkInstance"

[[commands.params]]
name = "fence"
type = "VkFence"
"#,
        )
        .unwrap()
    }

    #[test]
    fn build_and_lookup() {
        let catalog = Catalog::build(&small_registry()).unwrap();
        assert_eq!(catalog.len(), 7);

        let rect = catalog.lookup("VkRect2D").unwrap();
        let s = rect.as_struct().unwrap();
        let extent_id = catalog.id_of("VkExtent2D").unwrap();
        assert_eq!(s.members[0].ty, TypeRef::Entity(extent_id));

        let fence = catalog.lookup("VkFence").unwrap().as_handle().unwrap();
        assert!(!fence.dispatchable);
        assert_eq!(fence.parent, catalog.id_of("VkInstance"));
    }

    #[test]
    fn max_enum_sentinel_synthesized() {
        let catalog = Catalog::build(&small_registry()).unwrap();
        let e = catalog.lookup("VkResult").unwrap().as_enum().unwrap();
        let last = e.values.last().unwrap();
        assert_eq!(last.name, "VK_RESULT_MAX_ENUM");
        assert_eq!(last.value, MAX_ENUM_SENTINEL);
        assert!(last.hex);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut raw = small_registry();
        raw.handles.push(crate::raw::RawHandle {
            name: "VkExtent2D".to_string(),
            dispatchable: false,
            parent: None,
        });
        match Catalog::build(&raw) {
            Err(RegistryError::DuplicateEntity { name }) => assert_eq!(name, "VkExtent2D"),
            other => panic!("expected DuplicateEntity, got {other:?}"),
        }
    }

    #[test]
    fn unknown_member_type_rejected() {
        let mut raw = small_registry();
        raw.structs[0].members[0].type_name = "VkMissing".to_string();
        match Catalog::build(&raw) {
            Err(RegistryError::UnknownTypeReference {
                entity,
                member,
                type_name,
            }) => {
                assert_eq!(entity, "VkExtent2D");
                assert_eq!(member, "width");
                assert_eq!(type_name, "VkMissing");
            }
            other => panic!("expected UnknownTypeReference, got {other:?}"),
        }
    }

    #[test]
    fn extension_value_insertion() {
        let mut catalog = Catalog::build(&small_registry()).unwrap();
        catalog
            .add_enum_value(
                "VkResult",
                EnumValue {
                    name: "VK_ERROR_SURFACE_LOST_KHR".to_string(),
                    value: -1000000000,
                    hex: false,
                },
            )
            .unwrap();
        let e = catalog.lookup("VkResult").unwrap().as_enum().unwrap();
        // Sorted emission puts the negative extension value first.
        assert_eq!(e.sorted_values()[0].name, "VK_ERROR_SURFACE_LOST_KHR");

        assert!(catalog
            .add_enum_value(
                "VkExtent2D",
                EnumValue {
                    name: "X".to_string(),
                    value: 0,
                    hex: false
                }
            )
            .is_err());
    }

    #[test]
    fn sorted_views() {
        let catalog = Catalog::build(&small_registry()).unwrap();
        let structs: Vec<&str> = catalog
            .struct_ids()
            .into_iter()
            .map(|id| catalog.name(id))
            .collect::<Vec<_>>();
        assert_eq!(structs, ["VkExtent2D", "VkRect2D"]);
    }

    #[test]
    fn sentinel_names() {
        assert_eq!(max_enum_name("VkResult"), "VK_RESULT_MAX_ENUM");
        assert_eq!(
            max_enum_name("VkImageTiling"),
            "VK_IMAGE_TILING_MAX_ENUM"
        );
        assert_eq!(
            max_enum_name("VkFormatFeatureFlagBits"),
            "VK_FORMAT_FEATURE_FLAG_BITS_MAX_ENUM"
        );
    }
}
