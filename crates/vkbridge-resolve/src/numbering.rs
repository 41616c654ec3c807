//! Extension enumerator numbering.
//!
//! Extension enum values live above a reserved base, in per-extension
//! blocks indexed by the extension's 1-based registration ordinal:
//!
//! ```text
//! value = base + (number - 1) * block_size + offset
//! ```
//!
//! Flag-bit contributions use a bit position instead of an offset.

/// Compute the enumerator value contributed by an extension.
///
/// `negative` marks a subtractive alternative (used when an extension
/// redefines a value with the opposite sign convention, e.g. error codes).
pub fn extension_enum_value(
    base: i64,
    block_size: i64,
    extension_number: i64,
    offset: i64,
    negative: bool,
) -> i64 {
    let value = base + (extension_number - 1) * block_size + offset;
    if negative {
        -value
    } else {
        value
    }
}

/// Compute a flag-bits value from a bit position.
pub fn bit_value(bitpos: u32) -> i64 {
    1i64 << bitpos
}

#[cfg(test)]
mod tests {
    use super::*;
    use vkbridge_registry::{EXT_BASE, EXT_BLOCK_SIZE};

    #[test]
    fn block_arithmetic() {
        // Extension 3, offset 7.
        assert_eq!(
            extension_enum_value(EXT_BASE, EXT_BLOCK_SIZE, 3, 7, false),
            1_000_002_007
        );
        // First extension, first value.
        assert_eq!(
            extension_enum_value(EXT_BASE, EXT_BLOCK_SIZE, 1, 0, false),
            1_000_000_000
        );
    }

    #[test]
    fn subtractive_alternative_negates() {
        assert_eq!(
            extension_enum_value(EXT_BASE, EXT_BLOCK_SIZE, 1, 1, true),
            -1_000_000_001
        );
    }

    #[test]
    fn bit_positions() {
        assert_eq!(bit_value(0), 1);
        assert_eq!(bit_value(4), 16);
        assert_eq!(bit_value(31), 0x8000_0000);
    }
}
