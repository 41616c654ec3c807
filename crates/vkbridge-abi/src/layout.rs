//! Cross-ABI layout analysis.
//!
//! The two targets agree on pointer handling but disagree on the alignment
//! of 8-byte values inside structures. A structure whose in-memory layout
//! differs between the targets "needs alignment"; one that must be
//! rewritten member-by-member when crossing the boundary "needs
//! conversion". Conversion is the transitive closure of alignment over
//! struct nesting: a parent whose layout is fine at this level still needs
//! conversion when a nested struct differs deeper down.
//!
//! Struct graphs in this API family are deep, so both predicates are
//! memoized per entity.

use std::collections::{HashMap, HashSet};

use vkbridge_registry::entity::{EntityKind, Member, TypeRef};
use vkbridge_registry::{Catalog, EntityId};

use crate::error::{AbiError, Result};

/// Memoizing layout analyzer.
#[derive(Debug, Default)]
pub struct LayoutAnalyzer {
    align: HashMap<EntityId, bool>,
    conv: HashMap<EntityId, bool>,
    /// In-progress guard: a struct revisited through a pointer chain
    /// answers false at the revisit; its own entry answers for it.
    visiting: HashSet<EntityId>,
}

impl LayoutAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a single member's layout differs between the targets.
    ///
    /// Rule order matters: a pointer member never differs regardless of
    /// its pointee type.
    pub fn member_needs_alignment(
        &mut self,
        catalog: &Catalog,
        owner: &str,
        member: &Member,
    ) -> Result<bool> {
        if member.is_pointer() {
            return Ok(false);
        }
        match member.ty {
            TypeRef::Scalar(s) => Ok(s.needs_alignment()),
            TypeRef::Entity(id) => self.entity_needs_alignment(catalog, owner, &member.name, id),
        }
    }

    fn entity_needs_alignment(
        &mut self,
        catalog: &Catalog,
        owner: &str,
        member: &str,
        id: EntityId,
    ) -> Result<bool> {
        match &catalog.get(id).kind {
            EntityKind::Base(b) => Ok(b.underlying.needs_alignment()),
            EntityKind::Bitmask(b) => match b.underlying {
                TypeRef::Scalar(s) => Ok(s.needs_alignment()),
                TypeRef::Entity(uid) => self.entity_needs_alignment(catalog, owner, member, uid),
            },
            // Non-dispatchable handles are stored as 64-bit opaque values;
            // dispatchable ones are native pointer-sized references.
            EntityKind::Handle(h) => Ok(!h.dispatchable),
            EntityKind::Struct(_) => self.struct_needs_alignment(catalog, id),
            // Enums are pinned to 32 bits by their sentinel.
            EntityKind::Enum(_) => Ok(false),
            // A by-value function pointer member is pointer-sized.
            EntityKind::FuncPointer(_) => Ok(false),
            EntityKind::Constant(_) | EntityKind::Define(_) | EntityKind::Function(_) => {
                Err(AbiError::UnhandledLayoutCase {
                    entity: owner.to_string(),
                    member: member.to_string(),
                })
            }
        }
    }

    /// Whether a structure's layout differs between the targets: the OR
    /// over its direct members.
    pub fn struct_needs_alignment(&mut self, catalog: &Catalog, id: EntityId) -> Result<bool> {
        if let Some(&cached) = self.align.get(&id) {
            return Ok(cached);
        }
        if !self.visiting.insert(id) {
            return Ok(false);
        }

        let entity = catalog.get(id);
        let result = (|| {
            let s = match entity.as_struct() {
                Some(s) => s,
                None => return Ok(false),
            };
            for member in &s.members {
                if self.member_needs_alignment(catalog, &entity.name, member)? {
                    return Ok(true);
                }
            }
            Ok(false)
        })();

        self.visiting.remove(&id);
        if let Ok(value) = &result {
            self.align.insert(id, *value);
        }
        result
    }

    /// Whether a structure must be rewritten when crossing the boundary:
    /// its own alignment, or any member struct that itself converts (to
    /// any nesting depth, through pointers too).
    pub fn struct_needs_conversion(&mut self, catalog: &Catalog, id: EntityId) -> Result<bool> {
        if let Some(&cached) = self.conv.get(&id) {
            return Ok(cached);
        }

        if self.struct_needs_alignment(catalog, id)? {
            self.conv.insert(id, true);
            return Ok(true);
        }

        if !self.visiting.insert(id) {
            return Ok(false);
        }

        let entity = catalog.get(id);
        let result = (|| {
            let s = match entity.as_struct() {
                Some(s) => s,
                None => return Ok(false),
            };
            for member in &s.members {
                if self.member_needs_conversion(catalog, member)? {
                    return Ok(true);
                }
            }
            Ok(false)
        })();

        self.visiting.remove(&id);
        if let Ok(value) = &result {
            self.conv.insert(id, *value);
        }
        result
    }

    /// Whether a member's own struct type needs conversion. Non-struct
    /// members never do; their bridging is covered by the alignment markup
    /// alone.
    pub fn member_needs_conversion(&mut self, catalog: &Catalog, member: &Member) -> Result<bool> {
        match member.ty {
            TypeRef::Entity(id) if catalog.get(id).is_struct() => {
                self.struct_needs_conversion(catalog, id)
            }
            _ => Ok(false),
        }
    }

    /// Whether converting a structure to the host layout allocates
    /// buffers that must be released afterwards: true when any direct
    /// member is a converted dynamic array.
    pub fn struct_needs_free(&mut self, catalog: &Catalog, id: EntityId) -> Result<bool> {
        let entity = catalog.get(id);
        let s = match entity.as_struct() {
            Some(s) => s,
            None => return Ok(false),
        };
        for member in &s.members {
            if member.is_dynamic_array() && self.member_needs_conversion(catalog, member)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
