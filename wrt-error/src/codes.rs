//! Numeric error codes for WRT.
//!
//! Codes are grouped by the pipeline stage that raises them, matching
//! [`crate::ErrorCategory`]. The ranges do not overlap so a code alone is
//! enough to identify which stage produced an error.

// Decode errors (1000-1999): malformed binary input.
/// The `\0asm` magic number was missing or wrong.
pub const BAD_MAGIC: u16 = 1000;
/// The binary format version was not `1`.
pub const BAD_VERSION: u16 = 1001;
/// A LEB128 integer was truncated, overflowed, or not in canonical form.
pub const BAD_LEB128: u16 = 1002;
/// A section appeared out of the fixed order, or a non-custom section id
/// repeated.
pub const BAD_SECTION_ORDER: u16 = 1003;
/// A section's declared length did not match the bytes actually consumed.
pub const BAD_SECTION_SIZE: u16 = 1004;
/// An opcode byte did not correspond to any known instruction.
pub const UNKNOWN_OPCODE: u16 = 1005;
/// A name (import, export, custom section) was not valid UTF-8.
pub const BAD_UTF8: u16 = 1006;
/// The function and code sections disagreed on count.
pub const FUNC_CODE_MISMATCH: u16 = 1007;
/// A constant expression was not `<const> end` or `<global.get> end`.
pub const BAD_CONST_EXPR: u16 = 1008;
/// Generic structural decode failure.
pub const DECODE_ERROR: u16 = 1099;

// Validation errors (2000-2999): well-formed but ill-typed.
/// An index (type, function, table, memory, global, local, label) was out
/// of range.
pub const INDEX_OUT_OF_RANGE: u16 = 2000;
/// The operand stack did not have the types an instruction required.
pub const TYPE_MISMATCH: u16 = 2001;
/// A `global.set` targeted an immutable global.
pub const IMMUTABLE_GLOBAL: u16 = 2002;
/// More than one table or memory was declared (Wasm 1.0 allows at most one
/// of each).
pub const MULTIPLE_MEMORIES_OR_TABLES: u16 = 2003;
/// A memory instruction's alignment exceeded the access's natural width.
pub const BAD_ALIGNMENT: u16 = 2004;
/// The start function did not have type `[] -> []`.
pub const BAD_START_TYPE: u16 = 2005;
/// Two exports shared the same name.
pub const DUPLICATE_EXPORT: u16 = 2006;
/// The value stack did not match the expected types at the end of a
/// function or block.
pub const STACK_MISMATCH: u16 = 2007;
/// Generic validation failure.
pub const VALIDATION_ERROR: u16 = 2099;

// Link errors (3000-3999): raised while instantiating.
/// An import had no matching entry in the supplied externs.
pub const MISSING_IMPORT: u16 = 3000;
/// An import was present but its type did not match the declaration.
pub const IMPORT_TYPE_MISMATCH: u16 = 3001;
/// A table or memory import's limits were not a subset of what was
/// required.
pub const LIMITS_NOT_SUBSUMED: u16 = 3002;
/// An embedder asked to invoke or read an export that does not exist, or
/// exists as the wrong kind of extern.
pub const MISSING_EXPORT: u16 = 3003;
/// Generic link failure.
pub const LINK_ERROR: u16 = 3099;

// Trap codes (4000-4999): raised during execution.
/// `unreachable` was executed.
pub const TRAP_UNREACHABLE: u16 = 4000;
/// Integer division or remainder by zero.
pub const TRAP_DIV_BY_ZERO: u16 = 4001;
/// Signed division overflow (`INT_MIN / -1`).
pub const TRAP_INT_OVERFLOW: u16 = 4002;
/// A float-to-integer truncation source was NaN or out of range.
pub const TRAP_BAD_CONVERSION: u16 = 4003;
/// A memory load or store touched a byte outside the memory.
pub const TRAP_MEMORY_OOB: u16 = 4004;
/// A table access (direct or through `call_indirect`) was out of bounds.
pub const TRAP_TABLE_OOB: u16 = 4005;
/// `call_indirect` found an empty table slot.
pub const TRAP_UNINITIALIZED_ELEMENT: u16 = 4006;
/// `call_indirect` found a function whose type did not match.
pub const TRAP_INDIRECT_TYPE_MISMATCH: u16 = 4007;
/// An element or data segment did not fit its destination at instantiation
/// time.
pub const TRAP_SEGMENT_OOB: u16 = 4008;
/// Generic trap.
pub const TRAP_ERROR: u16 = 4099;
