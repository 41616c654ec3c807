//! Raw registry document model.
//!
//! The registry document declares every API entity, the core feature blocks
//! and the extension blocks. This module is the boundary to the external
//! document parser: everything downstream consumes these records, never the
//! document text. The shipped realization deserializes a TOML rendition of
//! the registry via serde.

use serde::{Deserialize, Serialize};

use crate::error::{RegistryError, Result};

/// A complete raw registry document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawRegistry {
    /// API constants (emitted as object-like macros).
    #[serde(default)]
    pub constants: Vec<RawConstant>,
    /// Scalar typedefs such as the 64-bit device-size type.
    #[serde(default, rename = "base-types")]
    pub base_types: Vec<RawBaseType>,
    /// Free-form macro definitions carried through to the header.
    #[serde(default)]
    pub defines: Vec<RawDefine>,
    /// Enumerations, including flag-bits enums.
    #[serde(default)]
    pub enums: Vec<RawEnum>,
    /// Bitmask typedefs with an optional companion flag-bits enum.
    #[serde(default)]
    pub bitmasks: Vec<RawBitmask>,
    /// Opaque handles, dispatchable or not.
    #[serde(default)]
    pub handles: Vec<RawHandle>,
    /// Function pointer typedefs.
    #[serde(default, rename = "func-pointers")]
    pub func_pointers: Vec<RawFuncPointer>,
    /// Structures and unions, in declaration order.
    #[serde(default)]
    pub structs: Vec<RawStruct>,
    /// API commands.
    #[serde(default)]
    pub commands: Vec<RawCommand>,
    /// Ordered core feature blocks.
    #[serde(default)]
    pub features: Vec<RawFeature>,
    /// Extension blocks.
    #[serde(default)]
    pub extensions: Vec<RawExtension>,
}

impl RawRegistry {
    /// Parse a registry document from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let raw: RawRegistry = toml::from_str(input)?;
        Ok(raw)
    }

    /// Parse a registry document from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }
}

/// An API constant: `name = value` where the value is emitted verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConstant {
    pub name: String,
    pub value: String,
}

/// A scalar typedef, e.g. a 64-bit size type over `uint64_t`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBaseType {
    pub name: String,
    /// Underlying C scalar spelling.
    pub underlying: String,
}

/// A free-form macro definition carried through to the generated header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawDefine {
    pub name: String,
    #[serde(default)]
    pub body: String,
}

/// An enumeration declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnum {
    pub name: String,
    #[serde(default)]
    pub values: Vec<RawEnumValue>,
}

/// A single enumerator. Exactly one of `value`/`bitpos` is expected; a
/// `bitpos` enumerator is always hex-formatted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnumValue {
    pub name: String,
    #[serde(default)]
    pub value: Option<i64>,
    #[serde(default)]
    pub bitpos: Option<u32>,
    #[serde(default)]
    pub hex: bool,
}

/// A bitmask typedef. `flag-bits` names the companion enum that carries the
/// actual bit values; the typedef itself is over a flags base type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBitmask {
    pub name: String,
    pub underlying: String,
    #[serde(default, rename = "flag-bits")]
    pub flag_bits: Option<String>,
}

/// An opaque handle declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawHandle {
    pub name: String,
    #[serde(default)]
    pub dispatchable: bool,
    #[serde(default)]
    pub parent: Option<String>,
}

/// A function pointer typedef.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFuncPointer {
    pub name: String,
    #[serde(rename = "return-type")]
    pub return_type: String,
    #[serde(default)]
    pub members: Vec<RawMember>,
}

/// A structure or union declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawStruct {
    pub name: String,
    /// True for unions; parsing and modeling are otherwise identical.
    #[serde(default)]
    pub union: bool,
    /// Output-only structure populated by the callee.
    #[serde(default, rename = "returned-only")]
    pub returned_only: bool,
    #[serde(default)]
    pub members: Vec<RawMember>,
}

/// Shared member/parameter shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawMember {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default, rename = "const")]
    pub is_const: bool,
    /// Pointer depth: 0 for by-value, 1 for `T*`, 2 for `T**`.
    #[serde(default)]
    pub pointer: u8,
    /// Fixed array length: a literal count or the name of an API constant.
    #[serde(default)]
    pub array: Option<String>,
    /// Dynamic array length source: the name of a sibling member holding
    /// the element count, or a literal count.
    #[serde(default)]
    pub len: Option<String>,
    #[serde(default)]
    pub optional: bool,
}

/// An API command declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCommand {
    pub name: String,
    #[serde(rename = "return-type")]
    pub return_type: String,
    #[serde(default)]
    pub params: Vec<RawMember>,
}

/// A core feature block naming required commands and types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawFeature {
    pub name: String,
    #[serde(default)]
    pub commands: Vec<String>,
    #[serde(default)]
    pub types: Vec<String>,
}

/// Whether an extension extends the instance or the device scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawExtensionKind {
    Instance,
    Device,
}

/// An extension block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExtension {
    pub name: String,
    /// 1-based registration ordinal, used by enum value numbering.
    pub number: i64,
    #[serde(rename = "type")]
    pub kind: RawExtensionKind,
    /// Support status; `"disabled"` marks reserved or retired numbers.
    #[serde(default = "default_supported")]
    pub supported: String,
    /// Names of extensions this one builds on.
    #[serde(default)]
    pub requires: Vec<String>,
    /// Commands pulled in by this extension.
    #[serde(default)]
    pub commands: Vec<String>,
    /// Enum value contributions.
    #[serde(default)]
    pub enums: Vec<RawEnumExtension>,
}

fn default_supported() -> String {
    "vulkan".to_string()
}

/// A single enum contribution from an extension block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnumExtension {
    pub name: String,
    /// The enum this value extends.
    pub extends: String,
    /// Within-extension offset for value numbering.
    #[serde(default)]
    pub offset: Option<i64>,
    /// Bit position for flag-bits contributions.
    #[serde(default)]
    pub bitpos: Option<u32>,
    /// Literal value contributions (extension name/version macros); these
    /// carry no enum value and are skipped by numbering.
    #[serde(default)]
    pub value: Option<String>,
    /// Subtractive alternative: the computed value is negated.
    #[serde(default)]
    pub negative: bool,
}

impl RawRegistry {
    /// Basic structural validation before catalog construction.
    pub fn validate(&self) -> Result<()> {
        for e in &self.enums {
            for v in &e.values {
                if v.value.is_none() && v.bitpos.is_none() {
                    return Err(RegistryError::InvalidDocument {
                        detail: format!("enumerator '{}' in '{}' has neither value nor bitpos", v.name, e.name),
                    });
                }
            }
        }
        for ext in &self.extensions {
            if ext.number < 1 {
                return Err(RegistryError::InvalidDocument {
                    detail: format!("extension '{}' has non-positive number {}", ext.name, ext.number),
                });
            }
        }
        Ok(())
    }
}
