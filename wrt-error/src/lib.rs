// WRT - wrt-error
// Module: WRT Error Handling
//
// SPDX-License-Identifier: MIT

//! Error handling for the WRT WebAssembly runtime.
//!
//! The four pipeline stages described by the embedding API each fail in a
//! distinct, non-overlapping way: decoding a malformed binary, validating an
//! ill-typed module, linking unsatisfiable imports, and trapping during
//! execution. This crate models all four as one [`Error`] tagged with an
//! [`ErrorCategory`], rather than as separate error types per stage, so the
//! embedding API can return a single `Result<T>` throughout.
//!
//! ```
//! use wrt_error::{codes, Error};
//!
//! let err = Error::decode(codes::BAD_MAGIC, "bad magic number", 0);
//! assert!(err.to_string().contains("bad magic number"));
//! ```

use core::fmt;

pub mod codes;
pub mod kinds;

pub use kinds::TrapKind;

/// Which stage of the pipeline raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The binary decoder rejected malformed bytes.
    Decode,
    /// The validator rejected an ill-typed module.
    Validation,
    /// Instantiation could not satisfy an import.
    Link,
    /// Execution trapped.
    Trap,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Decode => "decode error",
            Self::Validation => "validation error",
            Self::Link => "link error",
            Self::Trap => "trap",
        };
        f.write_str(s)
    }
}

/// The error type shared by every stage of the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    /// Which stage raised this error.
    pub category: ErrorCategory,
    /// A numeric code from [`codes`], stable across versions.
    pub code: u16,
    /// A human-readable detail message.
    pub message: String,
    /// Byte offset into the input, set only for decode errors.
    pub offset: Option<usize>,
}

impl Error {
    /// A decode error at a specific byte offset.
    pub fn decode(code: u16, message: impl Into<String>, offset: usize) -> Self {
        Self { category: ErrorCategory::Decode, code, message: message.into(), offset: Some(offset) }
    }

    /// A validation error, reported per function or module.
    pub fn validation(code: u16, message: impl Into<String>) -> Self {
        Self { category: ErrorCategory::Validation, code, message: message.into(), offset: None }
    }

    /// A link error raised during instantiation.
    pub fn link(code: u16, message: impl Into<String>) -> Self {
        Self { category: ErrorCategory::Link, code, message: message.into(), offset: None }
    }

    /// A trap raised during execution.
    pub fn trap(kind: TrapKind) -> Self {
        Self {
            category: ErrorCategory::Trap,
            code: kind.code(),
            message: kind.message().to_string(),
            offset: None,
        }
    }

    /// The trap reason, if this error is a trap.
    pub fn trap_message(&self) -> Option<&str> {
        (self.category == ErrorCategory::Trap).then_some(self.message.as_str())
    }

    /// True if this is a decode-stage error.
    pub fn is_decode(&self) -> bool {
        self.category == ErrorCategory::Decode
    }

    /// True if this is a validation-stage error.
    pub fn is_validation(&self) -> bool {
        self.category == ErrorCategory::Validation
    }

    /// True if this is a link-stage error.
    pub fn is_link(&self) -> bool {
        self.category == ErrorCategory::Link
    }

    /// True if this is a trap.
    pub fn is_trap(&self) -> bool {
        self.category == ErrorCategory::Trap
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.offset {
            Some(offset) => write!(f, "{} at offset {}: {}", self.category, offset, self.message),
            None => write!(f, "{}: {}", self.category, self.message),
        }
    }
}

impl std::error::Error for Error {}

/// A specialized `Result` for WRT operations.
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn categories_are_distinguishable() {
        let d = Error::decode(codes::BAD_MAGIC, "bad magic", 0);
        let v = Error::validation(codes::TYPE_MISMATCH, "type mismatch");
        let l = Error::link(codes::MISSING_IMPORT, "missing import");
        let t = Error::trap(TrapKind::Unreachable);

        assert!(d.is_decode() && !d.is_trap());
        assert!(v.is_validation());
        assert!(l.is_link());
        assert!(t.is_trap());
        assert_eq!(t.trap_message(), Some("unreachable"));
    }

    #[test]
    fn decode_error_carries_offset() {
        let err = Error::decode(codes::BAD_LEB128, "truncated LEB128", 42);
        assert_eq!(err.offset, Some(42));
        assert!(err.to_string().contains("42"));
    }
}
