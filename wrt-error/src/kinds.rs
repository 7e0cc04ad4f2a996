//! Trap reasons.
//!
//! The execution engine never returns a trap as a bare string: it picks one
//! of these variants so callers (and the conformance harness's substring
//! match against `assert_trap`'s expected reason) see a stable vocabulary.

use core::fmt;

/// Why an invocation trapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapKind {
    /// The `unreachable` instruction was executed.
    Unreachable,
    /// `div_s`, `div_u`, `rem_s`, or `rem_u` with a zero divisor.
    IntegerDivideByZero,
    /// `i32.div_s` / `i64.div_s` computing `INT_MIN / -1`.
    IntegerOverflow,
    /// A `trunc` conversion source was NaN or outside the target range.
    InvalidConversionToInteger,
    /// A memory load or store touched an out-of-bounds address.
    OutOfBoundsMemoryAccess,
    /// A table access index was out of bounds.
    OutOfBoundsTableAccess,
    /// `call_indirect` through an empty table slot.
    UninitializedElement,
    /// `call_indirect` where the callee's type did not match.
    IndirectCallTypeMismatch,
    /// An element or data segment did not fit at instantiation time.
    ElementSegmentOutOfBounds,
}

impl TrapKind {
    /// The stable, human-readable reason string.
    ///
    /// Matches the wording used by `assert_trap` test expectations closely
    /// enough for substring comparison.
    pub fn message(self) -> &'static str {
        match self {
            Self::Unreachable => "unreachable",
            Self::IntegerDivideByZero => "integer divide by zero",
            Self::IntegerOverflow => "integer overflow",
            Self::InvalidConversionToInteger => "invalid conversion to integer",
            Self::OutOfBoundsMemoryAccess => "out of bounds memory access",
            Self::OutOfBoundsTableAccess => "out of bounds table access",
            Self::UninitializedElement => "uninitialized element",
            Self::IndirectCallTypeMismatch => "indirect call type mismatch",
            Self::ElementSegmentOutOfBounds => "element or data segment does not fit",
        }
    }

    pub(crate) fn code(self) -> u16 {
        use crate::codes;
        match self {
            Self::Unreachable => codes::TRAP_UNREACHABLE,
            Self::IntegerDivideByZero => codes::TRAP_DIV_BY_ZERO,
            Self::IntegerOverflow => codes::TRAP_INT_OVERFLOW,
            Self::InvalidConversionToInteger => codes::TRAP_BAD_CONVERSION,
            Self::OutOfBoundsMemoryAccess => codes::TRAP_MEMORY_OOB,
            Self::OutOfBoundsTableAccess => codes::TRAP_TABLE_OOB,
            Self::UninitializedElement => codes::TRAP_UNINITIALIZED_ELEMENT,
            Self::IndirectCallTypeMismatch => codes::TRAP_INDIRECT_TYPE_MISMATCH,
            Self::ElementSegmentOutOfBounds => codes::TRAP_SEGMENT_OOB,
        }
    }
}

impl fmt::Display for TrapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
