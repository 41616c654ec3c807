//! Typed API entities.
//!
//! Every named registry entity becomes one [`Entity`] with a closed
//! [`EntityKind`] payload. Consumers match exhaustively, so a new kind is a
//! compile-time exercise rather than a runtime surprise.

use crate::scalar::ScalarType;

/// Stable arena index of an entity inside the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl EntityId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Name of the next-extension-link member of chainable structures.
pub const CHAIN_MEMBER: &str = "pNext";
/// Name of the structure-type discriminant member of chainable structures.
pub const TAG_MEMBER: &str = "sType";

/// A resolved type reference: either a plain C scalar or another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeRef {
    Scalar(ScalarType),
    Entity(EntityId),
}

/// Fixed array length: a literal count or a named API constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedLen {
    Literal(u32),
    Constant(String),
}

impl std::fmt::Display for FixedLen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FixedLen::Literal(n) => write!(f, "{n}"),
            FixedLen::Constant(name) => write!(f, "{name}"),
        }
    }
}

/// Where a dynamic array finds its element count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LengthSource {
    /// A sibling member/parameter holding the count.
    Member(String),
    /// A literal count.
    Literal(u32),
}

/// Whether a member shape is constructed for a struct body or for a
/// function parameter list. Struct members with an unannotated pointer get
/// the singleton-dynamic-array default; parameters do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    StructMember,
    Parameter,
}

/// Shared member/parameter shape.
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    /// Resolved type.
    pub ty: TypeRef,
    /// Original type spelling, kept for rendering and diagnostics.
    pub type_name: String,
    pub is_const: bool,
    /// Pointer depth: 0 for by-value.
    pub pointer: u8,
    pub fixed_len: Option<FixedLen>,
    pub dyn_len: Option<LengthSource>,
    pub optional: bool,
}

impl Member {
    /// Build a member from its raw shape and a resolved type.
    ///
    /// A pointer member of a struct with no declared length source is
    /// treated as a dynamic array of length 1. This is a heuristic, not a
    /// registry guarantee: it keeps allocation and copy generation uniform
    /// for the handful of by-reference singleton members.
    pub fn from_raw(raw: &crate::raw::RawMember, ty: TypeRef, role: MemberRole) -> Member {
        let fixed_len = raw.array.as_deref().map(|a| match a.parse::<u32>() {
            Ok(n) => FixedLen::Literal(n),
            Err(_) => FixedLen::Constant(a.to_string()),
        });

        let mut dyn_len = raw.len.as_deref().map(|l| match l.parse::<u32>() {
            Ok(n) => LengthSource::Literal(n),
            Err(_) => LengthSource::Member(l.to_string()),
        });
        if dyn_len.is_none() && raw.pointer > 0 && role == MemberRole::StructMember {
            dyn_len = Some(LengthSource::Literal(1));
        }

        Member {
            name: raw.name.clone(),
            ty,
            type_name: raw.type_name.clone(),
            is_const: raw.is_const,
            pointer: raw.pointer,
            fixed_len,
            dyn_len,
            optional: raw.optional,
        }
    }

    pub fn is_pointer(&self) -> bool {
        self.pointer > 0
    }

    /// Fixed-size in-place array with the length in the declaration.
    pub fn is_fixed_array(&self) -> bool {
        self.fixed_len.is_some()
    }

    /// Dynamically sized array with a separate count.
    pub fn is_dynamic_array(&self) -> bool {
        self.dyn_len.is_some()
    }
}

/// A scalar typedef, e.g. the 64-bit device-size type.
#[derive(Debug, Clone)]
pub struct BaseType {
    pub underlying: ScalarType,
}

/// An API constant emitted as an object-like macro.
#[derive(Debug, Clone)]
pub struct Constant {
    pub value: String,
}

/// A free-form macro definition.
#[derive(Debug, Clone)]
pub struct Define {
    pub body: String,
}

/// A single enumerator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub name: String,
    pub value: i64,
    /// Preserve hex formatting for bit values and explicit hex constants.
    pub hex: bool,
}

impl std::fmt::Display for EnumValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.hex {
            write!(f, "{} = 0x{:08X}", self.name, self.value)
        } else {
            write!(f, "{} = {}", self.name, self.value)
        }
    }
}

/// An enumeration. Values keep insertion order internally; emission sorts
/// by numeric value since extensions append out of order.
#[derive(Debug, Clone)]
pub struct EnumType {
    pub values: Vec<EnumValue>,
}

impl EnumType {
    /// Append a value (extension contributions land here).
    pub fn add(&mut self, value: EnumValue) {
        self.values.push(value);
    }

    /// Values sorted by numeric value, the emission order.
    pub fn sorted_values(&self) -> Vec<&EnumValue> {
        let mut values: Vec<&EnumValue> = self.values.iter().collect();
        values.sort_by_key(|v| v.value);
        values
    }
}

/// A bitmask typedef with an optional companion flag-bits enum.
#[derive(Debug, Clone)]
pub struct Bitmask {
    pub underlying: TypeRef,
    pub underlying_name: String,
    pub flag_bits: Option<EntityId>,
}

/// An opaque handle.
///
/// Dispatchable handles are native pointer-sized references carrying a
/// dispatch table; non-dispatchable handles are transparent 64-bit values.
#[derive(Debug, Clone)]
pub struct Handle {
    pub dispatchable: bool,
    pub parent: Option<EntityId>,
}

/// A function pointer typedef.
#[derive(Debug, Clone)]
pub struct FuncPointer {
    /// Return type spelling, rendered verbatim.
    pub return_type: String,
    pub members: Vec<Member>,
}

/// A structure or union. Member order is declaration order and is
/// semantically significant.
#[derive(Debug, Clone)]
pub struct StructType {
    pub members: Vec<Member>,
    /// Output-only: populated by the callee.
    pub returned_only: bool,
    pub is_union: bool,
}

impl StructType {
    pub fn member(&self, name: &str) -> Option<&Member> {
        self.members.iter().find(|m| m.name == name)
    }

    /// Whether the struct declares the next-link + discriminant pair used
    /// for forward-compatible chaining.
    pub fn has_chain_tag(&self) -> bool {
        self.member(CHAIN_MEMBER).is_some() && self.member(TAG_MEMBER).is_some()
    }
}

/// An API command.
#[derive(Debug, Clone)]
pub struct Function {
    pub return_type: TypeRef,
    pub return_type_name: String,
    pub params: Vec<Member>,
    /// Name of the extension that pulled this function in, if any.
    pub extension: Option<String>,
}

impl Function {
    pub fn returns_void(&self) -> bool {
        matches!(self.return_type, TypeRef::Scalar(ScalarType::Void))
    }
}

/// Closed sum over every entity kind in the registry.
#[derive(Debug, Clone)]
pub enum EntityKind {
    Base(BaseType),
    Constant(Constant),
    Define(Define),
    Enum(EnumType),
    Bitmask(Bitmask),
    Handle(Handle),
    FuncPointer(FuncPointer),
    Struct(StructType),
    Function(Function),
}

/// A named API entity.
#[derive(Debug, Clone)]
pub struct Entity {
    pub name: String,
    pub kind: EntityKind,
}

impl Entity {
    pub fn as_struct(&self) -> Option<&StructType> {
        match &self.kind {
            EntityKind::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_handle(&self) -> Option<&Handle> {
        match &self.kind {
            EntityKind::Handle(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match &self.kind {
            EntityKind::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match &self.kind {
            EntityKind::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn is_struct(&self) -> bool {
        matches!(self.kind, EntityKind::Struct(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, EntityKind::Function(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::RawMember;

    fn raw_member(name: &str, ty: &str, pointer: u8, len: Option<&str>) -> RawMember {
        RawMember {
            name: name.to_string(),
            type_name: ty.to_string(),
            is_const: false,
            pointer,
            array: None,
            len: len.map(str::to_string),
            optional: false,
        }
    }

    #[test]
    fn unannotated_pointer_member_defaults_to_singleton_array() {
        let raw = raw_member("pInheritanceInfo", "VkFoo", 1, None);
        let m = Member::from_raw(&raw, TypeRef::Entity(EntityId(0)), MemberRole::StructMember);
        assert_eq!(m.dyn_len, Some(LengthSource::Literal(1)));
        assert!(m.is_dynamic_array());
    }

    #[test]
    fn unannotated_pointer_parameter_stays_scalar() {
        let raw = raw_member("pCreateInfo", "VkFoo", 1, None);
        let m = Member::from_raw(&raw, TypeRef::Entity(EntityId(0)), MemberRole::Parameter);
        assert_eq!(m.dyn_len, None);
        assert!(!m.is_dynamic_array());
    }

    #[test]
    fn declared_length_source_wins() {
        let raw = raw_member("pQueuePriorities", "float", 1, Some("queueCount"));
        let m = Member::from_raw(
            &raw,
            TypeRef::Scalar(ScalarType::Float),
            MemberRole::StructMember,
        );
        assert_eq!(
            m.dyn_len,
            Some(LengthSource::Member("queueCount".to_string()))
        );
    }

    #[test]
    fn non_pointer_member_has_no_length() {
        let raw = raw_member("width", "uint32_t", 0, None);
        let m = Member::from_raw(
            &raw,
            TypeRef::Scalar(ScalarType::Uint32),
            MemberRole::StructMember,
        );
        assert!(!m.is_dynamic_array());
        assert!(!m.is_pointer());
    }

    #[test]
    fn enum_value_formatting() {
        let plain = EnumValue {
            name: "VK_SUCCESS".to_string(),
            value: 0,
            hex: false,
        };
        assert_eq!(plain.to_string(), "VK_SUCCESS = 0");

        let hexed = EnumValue {
            name: "VK_RESULT_MAX_ENUM".to_string(),
            value: 0x7fff_ffff,
            hex: true,
        };
        assert_eq!(hexed.to_string(), "VK_RESULT_MAX_ENUM = 0x7FFFFFFF");
    }

    #[test]
    fn enum_sorted_by_value() {
        let mut e = EnumType {
            values: vec![
                EnumValue { name: "B".to_string(), value: 10, hex: false },
                EnumValue { name: "A".to_string(), value: -1, hex: false },
            ],
        };
        e.add(EnumValue { name: "C".to_string(), value: 3, hex: false });
        let names: Vec<&str> = e.sorted_values().iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, ["A", "C", "B"]);
    }

    #[test]
    fn chain_tag_detection() {
        let chained = StructType {
            members: vec![
                Member::from_raw(
                    &raw_member(TAG_MEMBER, "VkStructureType", 0, None),
                    TypeRef::Entity(EntityId(0)),
                    MemberRole::StructMember,
                ),
                Member::from_raw(
                    &raw_member(CHAIN_MEMBER, "void", 1, None),
                    TypeRef::Scalar(ScalarType::Void),
                    MemberRole::StructMember,
                ),
            ],
            returned_only: true,
            is_union: false,
        };
        assert!(chained.has_chain_tag());

        let plain = StructType {
            members: vec![Member::from_raw(
                &raw_member("width", "uint32_t", 0, None),
                TypeRef::Scalar(ScalarType::Uint32),
                MemberRole::StructMember,
            )],
            returned_only: false,
            is_union: false,
        };
        assert!(!plain.has_chain_tag());
    }
}
