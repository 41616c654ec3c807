//! Conversion and free function synthesis.
//!
//! Every structure that needs conversion is bridged by a family of paired
//! functions: scalar, fixed-array and dynamic-array variants, in the
//! to-host direction for inputs and the from-host direction for outputs.
//! Dynamic-array conversion allocates a host-side buffer, so each
//! dynamic-array use also gets a free function, as does any scalar struct
//! that transitively owns converted dynamic-array members.
//!
//! Two use sites that reduce to the same `(direction, arrayness, type)`
//! identity are the same operation: the synthesizer deduplicates across
//! the whole run while preserving first-seen order, and collects nested
//! member conversions before the conversions that call them, so the output
//! list is safe to emit front to back.

use std::collections::HashSet;

use tracing::debug;

use vkbridge_registry::entity::{Member, TypeRef};
use vkbridge_registry::{Catalog, EntityId, GeneratorConfig};
use vkbridge_resolve::RequiredSet;

use crate::classify::param_direction;
use crate::error::Result;
use crate::layout::LayoutAnalyzer;

/// Which way a conversion moves data across the ABI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConversionDirection {
    /// Foreign layout in, host layout out (inputs to the underlying call).
    ToHost,
    /// Host layout in, foreign layout out (outputs of the underlying call).
    ToForeign,
}

/// Array shape of a conversion use site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arrayness {
    Scalar,
    FixedArray,
    DynamicArray,
}

/// A synthesized conversion function.
#[derive(Debug, Clone)]
pub struct ConversionFunction {
    pub direction: ConversionDirection,
    pub arrayness: Arrayness,
    pub ty: EntityId,
    pub name: String,
}

/// A synthesized free function releasing to-host conversion buffers.
#[derive(Debug, Clone)]
pub struct FreeFunction {
    pub ty: EntityId,
    pub dyn_array: bool,
    pub name: String,
}

/// One entry of the safe-to-emit operation list.
#[derive(Debug, Clone)]
pub enum SynthesizedOp {
    Convert(ConversionFunction),
    Free(FreeFunction),
}

impl SynthesizedOp {
    pub fn name(&self) -> &str {
        match self {
            SynthesizedOp::Convert(c) => &c.name,
            SynthesizedOp::Free(f) => &f.name,
        }
    }
}

/// Conversion function name for an identity.
pub fn conversion_name(
    catalog: &Catalog,
    direction: ConversionDirection,
    arrayness: Arrayness,
    ty: EntityId,
) -> String {
    let t = catalog.name(ty);
    match (direction, arrayness) {
        (ConversionDirection::ToHost, Arrayness::Scalar) => format!("convert_{t}_to_host"),
        (ConversionDirection::ToHost, Arrayness::FixedArray) => {
            format!("convert_{t}_static_array_to_host")
        }
        (ConversionDirection::ToHost, Arrayness::DynamicArray) => {
            format!("convert_{t}_array_to_host")
        }
        (ConversionDirection::ToForeign, Arrayness::Scalar) => format!("convert_{t}_from_host"),
        (ConversionDirection::ToForeign, Arrayness::FixedArray) => {
            format!("convert_{t}_static_array_from_host")
        }
        (ConversionDirection::ToForeign, Arrayness::DynamicArray) => {
            format!("convert_{t}_array_from_host")
        }
    }
}

/// Free function name for an identity.
pub fn free_name(catalog: &Catalog, ty: EntityId, dyn_array: bool) -> String {
    let t = catalog.name(ty);
    if dyn_array {
        format!("free_{t}_array")
    } else {
        format!("free_{t}")
    }
}

/// How the emitter copies one member inside a scalar conversion body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyKind {
    /// Plain assignment.
    Assign,
    /// Byte copy of a fixed array whose element layout matches.
    RawArrayCopy,
    /// Call the member type's scalar conversion.
    ConvertScalar,
    /// Call the member type's fixed-array conversion.
    ConvertFixedArray,
    /// Call the member type's dynamic-array conversion (allocates).
    ConvertDynamicArray,
}

/// Classify how a member is copied inside its parent's conversion.
pub fn member_copy_kind(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    member: &Member,
) -> Result<CopyKind> {
    if layout.member_needs_conversion(catalog, member)? {
        if member.is_dynamic_array() {
            return Ok(CopyKind::ConvertDynamicArray);
        }
        if member.is_fixed_array() {
            return Ok(CopyKind::ConvertFixedArray);
        }
        return Ok(CopyKind::ConvertScalar);
    }
    if member.is_fixed_array() {
        return Ok(CopyKind::RawArrayCopy);
    }
    Ok(CopyKind::Assign)
}

/// Whether a scalar conversion of this struct copies only the chain link
/// and the type tag.
///
/// Input-output query structures are populated by the callee; the caller
/// only seeds the next-extension-link pointer and the discriminant, so the
/// to-host copy must not touch the remaining (uninitialized) fields.
pub fn conversion_copies_chain_only(
    catalog: &Catalog,
    direction: ConversionDirection,
    ty: EntityId,
) -> bool {
    if direction != ConversionDirection::ToHost {
        return false;
    }
    match catalog.get(ty).as_struct() {
        Some(s) => s.returned_only && s.has_chain_tag(),
        None => false,
    }
}

/// Whether a parameter use site requires conversion.
///
/// Exempt structures (whose layouts happen to coincide) are skipped here
/// and only here; the struct-level predicate stays truthful.
pub fn param_needs_conversion(
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    config: &GeneratorConfig,
    param: &Member,
) -> Result<bool> {
    let id = match param.ty {
        TypeRef::Entity(id) if catalog.get(id).is_struct() => id,
        _ => return Ok(false),
    };
    if config.conversion_exempt.contains(catalog.name(id)) {
        return Ok(false);
    }
    layout.struct_needs_conversion(catalog, id)
}

/// Deduplicating registry of synthesized operations.
#[derive(Debug, Default)]
struct SynthesisSet {
    ops: Vec<SynthesizedOp>,
    seen: HashSet<OpKey>,
    /// Structs whose member walk is in progress; guards collection against
    /// struct graphs that cycle through pointer members.
    visiting: HashSet<EntityId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum OpKey {
    Convert(ConversionDirection, Arrayness, EntityId),
    Free(EntityId, bool),
}

impl SynthesisSet {
    fn push_conversion(
        &mut self,
        catalog: &Catalog,
        direction: ConversionDirection,
        arrayness: Arrayness,
        ty: EntityId,
    ) {
        if self.seen.insert(OpKey::Convert(direction, arrayness, ty)) {
            self.ops.push(SynthesizedOp::Convert(ConversionFunction {
                direction,
                arrayness,
                ty,
                name: conversion_name(catalog, direction, arrayness, ty),
            }));
        }
    }

    fn push_free(&mut self, catalog: &Catalog, ty: EntityId, dyn_array: bool) {
        if self.seen.insert(OpKey::Free(ty, dyn_array)) {
            self.ops.push(SynthesizedOp::Free(FreeFunction {
                ty,
                dyn_array,
                name: free_name(catalog, ty, dyn_array),
            }));
        }
    }
}

/// Synthesize the deduplicated conversion/free operation list for every
/// required, non-driver function that needs conversion.
pub fn synthesize(
    catalog: &Catalog,
    required: &RequiredSet,
    config: &GeneratorConfig,
    layout: &mut LayoutAnalyzer,
) -> Result<Vec<SynthesizedOp>> {
    let mut set = SynthesisSet::default();

    for id in catalog.function_ids() {
        if !required.contains(id) {
            continue;
        }
        let entity = catalog.get(id);
        // Driver functions are bridged by hand outside the thunks.
        if config.override_for(&entity.name).driver {
            debug!(function = %entity.name, "driver function, skipping conversion synthesis");
            continue;
        }
        let func = entity.as_function().expect("function_ids yields functions");

        for param in &func.params {
            collect_param(&mut set, catalog, layout, config, param)?;
        }
    }

    Ok(set.ops)
}

/// Collect the conversions needed by one parameter use site.
fn collect_param(
    set: &mut SynthesisSet,
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    config: &GeneratorConfig,
    param: &Member,
) -> Result<()> {
    if !param_needs_conversion(catalog, layout, config, param)? {
        return Ok(());
    }
    let sid = match param.ty {
        TypeRef::Entity(id) => id,
        TypeRef::Scalar(_) => unreachable!("param_needs_conversion checked the type"),
    };

    // Member conversions first, so the functions they name are defined
    // before the parent conversion calls them.
    let s = catalog.get(sid).as_struct().expect("struct parameter");
    for member in &s.members {
        if layout.member_needs_conversion(catalog, member)? {
            collect_member(set, catalog, layout, member)?;
        }
    }

    let direction = param_direction(catalog, param)?;
    let arrayness = if param.is_dynamic_array() {
        Arrayness::DynamicArray
    } else {
        Arrayness::Scalar
    };

    if direction.is_input() {
        set.push_conversion(catalog, ConversionDirection::ToHost, arrayness, sid);
    }
    if direction.is_output() {
        set.push_conversion(catalog, ConversionDirection::ToForeign, arrayness, sid);
    }
    if param.is_dynamic_array() || layout.struct_needs_free(catalog, sid)? {
        set.push_free(catalog, sid, param.is_dynamic_array());
    }
    Ok(())
}

/// Collect the conversions needed by one member use site. The caller has
/// already established that the member's struct type converts.
fn collect_member(
    set: &mut SynthesisSet,
    catalog: &Catalog,
    layout: &mut LayoutAnalyzer,
    member: &Member,
) -> Result<()> {
    let sid = match member.ty {
        TypeRef::Entity(id) => id,
        TypeRef::Scalar(_) => return Ok(()),
    };
    let s = match catalog.get(sid).as_struct() {
        Some(s) => s,
        None => return Ok(()),
    };
    if !set.visiting.insert(sid) {
        return Ok(());
    }

    for nested in &s.members {
        if layout.member_needs_conversion(catalog, nested)? {
            collect_member(set, catalog, layout, nested)?;
        }
    }

    // A member's direction follows its own struct: output-only structs
    // flow host-to-foreign, everything else foreign-to-host.
    let direction = if s.returned_only {
        ConversionDirection::ToForeign
    } else {
        ConversionDirection::ToHost
    };
    let arrayness = if member.is_dynamic_array() {
        Arrayness::DynamicArray
    } else if member.is_fixed_array() {
        Arrayness::FixedArray
    } else {
        Arrayness::Scalar
    };

    set.push_conversion(catalog, direction, arrayness, sid);

    if member.is_dynamic_array() {
        set.push_free(catalog, sid, true);
    }

    set.visiting.remove(&sid);
    Ok(())
}
