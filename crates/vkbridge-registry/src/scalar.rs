//! C scalar types appearing in registry declarations.
//!
//! The registry mostly references its own named entities, but struct members
//! and parameters bottom out in plain C scalars. Only the scalars the API
//! family actually uses are modeled; anything else must be declared in the
//! document as a base type.

/// A plain C scalar type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Void,
    Char,
    Int,
    Float,
    Double,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int32,
    Int64,
    /// Pointer-width unsigned integer. Matches the target word size, so it
    /// never needs cross-ABI realignment.
    SizeT,
}

impl ScalarType {
    /// Parse a scalar from its C spelling. Returns `None` for names that
    /// must resolve through the entity catalog instead.
    pub fn from_name(name: &str) -> Option<ScalarType> {
        match name {
            "void" => Some(ScalarType::Void),
            "char" => Some(ScalarType::Char),
            "int" => Some(ScalarType::Int),
            "float" => Some(ScalarType::Float),
            "double" => Some(ScalarType::Double),
            "uint8_t" => Some(ScalarType::Uint8),
            "uint16_t" => Some(ScalarType::Uint16),
            "uint32_t" => Some(ScalarType::Uint32),
            "uint64_t" => Some(ScalarType::Uint64),
            "int32_t" => Some(ScalarType::Int32),
            "int64_t" => Some(ScalarType::Int64),
            "size_t" => Some(ScalarType::SizeT),
            _ => None,
        }
    }

    /// Whether this scalar occupies 8 bytes on both ABI targets and hence
    /// needs explicit alignment on the target without natural 8-byte
    /// alignment. `size_t` is excluded: it tracks the pointer width and
    /// already matches per target.
    pub fn needs_alignment(self) -> bool {
        matches!(
            self,
            ScalarType::Uint64 | ScalarType::Int64 | ScalarType::Double
        )
    }
}

impl std::fmt::Display for ScalarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ScalarType::Void => "void",
            ScalarType::Char => "char",
            ScalarType::Int => "int",
            ScalarType::Float => "float",
            ScalarType::Double => "double",
            ScalarType::Uint8 => "uint8_t",
            ScalarType::Uint16 => "uint16_t",
            ScalarType::Uint32 => "uint32_t",
            ScalarType::Uint64 => "uint64_t",
            ScalarType::Int32 => "int32_t",
            ScalarType::Int64 => "int64_t",
            ScalarType::SizeT => "size_t",
        };
        write!(f, "{name}")
    }
}
