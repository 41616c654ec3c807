//! Structure dependency ordering.
//!
//! Generated declarations must never forward-reference: a structure can
//! only be emitted once every struct/union-typed member it contains has
//! been emitted before it. The orderer repeatedly scans the remaining set
//! and moves everything currently emittable, so mutually independent
//! structures keep their incoming (name-sorted) relative order.
//!
//! A member whose struct type is outside the input subset is not a
//! blocking dependency: for the bridging-header pass the subset holds only
//! converting structs, and a layout-compatible member struct is declared
//! elsewhere.

use std::collections::HashSet;

use vkbridge_registry::entity::TypeRef;
use vkbridge_registry::{Catalog, EntityId};

use crate::error::{AbiError, Result};

/// Order a subset of structures so no struct precedes a same-subset
/// dependency.
///
/// Cycles through non-pointer members cannot be satisfied by any order and
/// are reported as [`AbiError::CyclicStructDependency`]; a self-reference
/// (necessarily through a pointer) does not block its own emission.
pub fn dependency_order(catalog: &Catalog, subset: &[EntityId]) -> Result<Vec<EntityId>> {
    let in_subset: HashSet<EntityId> = subset.iter().copied().collect();
    let mut emitted: HashSet<EntityId> = HashSet::new();
    let mut remaining: Vec<EntityId> = subset.to_vec();
    let mut ordered: Vec<EntityId> = Vec::with_capacity(subset.len());

    while !remaining.is_empty() {
        // One pass: everything emittable against the set as of pass start.
        let (ready, blocked): (Vec<EntityId>, Vec<EntityId>) = remaining
            .iter()
            .partition(|&&id| is_emittable(catalog, id, &in_subset, &emitted));

        if ready.is_empty() {
            let names = blocked
                .iter()
                .map(|&id| catalog.name(id).to_string())
                .collect();
            return Err(AbiError::CyclicStructDependency { remaining: names });
        }

        for &id in &ready {
            emitted.insert(id);
            ordered.push(id);
        }
        remaining = blocked;
    }

    Ok(ordered)
}

fn is_emittable(
    catalog: &Catalog,
    id: EntityId,
    in_subset: &HashSet<EntityId>,
    emitted: &HashSet<EntityId>,
) -> bool {
    let s = match catalog.get(id).as_struct() {
        Some(s) => s,
        None => return true,
    };
    for member in &s.members {
        let dep = match member.ty {
            TypeRef::Entity(dep) if catalog.get(dep).is_struct() => dep,
            _ => continue,
        };
        if dep == id {
            continue;
        }
        if in_subset.contains(&dep) && !emitted.contains(&dep) {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkbridge_registry::RawRegistry;

    fn catalog() -> Catalog {
        let raw = RawRegistry::parse(
            r#"
[[structs]]
name = "VkA"

[[structs.members]]
name = "b"
type = "VkB"

[[structs.members]]
name = "c"
type = "VkC"

[[structs]]
name = "VkB"

[[structs.members]]
name = "c"
type = "VkC"

[[structs]]
name = "VkC"

[[structs.members]]
name = "x"
type = "uint32_t"

[[structs]]
name = "VkSelf"

[[structs.members]]
name = "pNext"
type = "VkSelf"
pointer = 1
"#,
        )
        .unwrap();
        Catalog::build(&raw).unwrap()
    }

    fn ids(c: &Catalog, names: &[&str]) -> Vec<EntityId> {
        names.iter().map(|n| c.id_of(n).unwrap()).collect()
    }

    #[test]
    fn dependencies_precede_dependents() {
        let c = catalog();
        let subset = ids(&c, &["VkA", "VkB", "VkC"]);
        let ordered = dependency_order(&c, &subset).unwrap();
        let pos = |name: &str| {
            ordered
                .iter()
                .position(|&id| c.name(id) == name)
                .unwrap()
        };
        assert!(pos("VkC") < pos("VkB"));
        assert!(pos("VkB") < pos("VkA"));
    }

    #[test]
    fn out_of_subset_members_do_not_block() {
        let c = catalog();
        // VkC excluded: VkB's dependency on it is out of scope here.
        let subset = ids(&c, &["VkA", "VkB"]);
        let ordered = dependency_order(&c, &subset).unwrap();
        assert_eq!(ordered.len(), 2);
        let pos = |name: &str| {
            ordered
                .iter()
                .position(|&id| c.name(id) == name)
                .unwrap()
        };
        assert!(pos("VkB") < pos("VkA"));
    }

    #[test]
    fn self_reference_does_not_block() {
        let c = catalog();
        let subset = ids(&c, &["VkSelf"]);
        let ordered = dependency_order(&c, &subset).unwrap();
        assert_eq!(ordered.len(), 1);
    }

    #[test]
    fn cycle_is_reported() {
        let raw = RawRegistry::parse(
            r#"
[[structs]]
name = "VkX"

[[structs.members]]
name = "pY"
type = "VkY"
pointer = 1

[[structs]]
name = "VkY"

[[structs.members]]
name = "pX"
type = "VkX"
pointer = 1
"#,
        )
        .unwrap();
        let c = Catalog::build(&raw).unwrap();
        let subset = vec![c.id_of("VkX").unwrap(), c.id_of("VkY").unwrap()];
        match dependency_order(&c, &subset) {
            Err(AbiError::CyclicStructDependency { remaining }) => {
                assert_eq!(remaining.len(), 2);
            }
            other => panic!("expected CyclicStructDependency, got {other:?}"),
        }
    }

    #[test]
    fn empty_subset_is_fine() {
        let c = catalog();
        assert!(dependency_order(&c, &[]).unwrap().is_empty());
    }
}
