// WRT - wrt
// Module: WebAssembly 1.0 Runtime
//
// SPDX-License-Identifier: MIT

//! A pure-Rust WebAssembly 1.0 runtime: decode a binary module, validate it,
//! instantiate it against a set of host-supplied imports, and invoke its
//! exports.
//!
//! ```no_run
//! use wrt::{decode, validate, Engine};
//!
//! # fn main() -> Result<(), wrt::Error> {
//! let bytes = std::fs::read("module.wasm").unwrap();
//! let module = decode(&bytes)?;
//! validate(&module)?;
//!
//! let mut engine = Engine::new();
//! let instance = engine.instantiate(&module, &[])?;
//! let result = engine.invoke(&instance, "main", &[])?;
//! # let _ = result;
//! # Ok(())
//! # }
//! ```

mod conformance;
mod engine;

pub use conformance::{parse_script, Action, Command, Harness, JsonValue, Outcome};
pub use engine::{Engine, Instance};
pub use wrt_error::{codes, Error, ErrorCategory, TrapKind};
pub use wrt_format::Module;
pub use wrt_runtime::{ExternVal, FuncAddr, GlobalAddr, HostFunc, ImportValue, MemAddr, Store, TableAddr, Value};
pub use wrt_host::{HostBuilder, HostFunction, Registry};

/// Parse a binary module, checking only its structural well-formedness
/// (section order, LEB128 encoding, known opcodes). Does not check that the
/// module is well-typed — call [`validate`] afterward.
pub fn decode(bytes: &[u8]) -> Result<Module, Error> {
    wrt_decoder::decode(bytes)
}

/// Statically check a decoded module: every instruction sequence is well
/// typed, every index is in range, and every constant expression is
/// actually constant.
pub fn validate(module: &Module) -> Result<(), Error> {
    wrt_validator::validate(module)
}

/// Decode and validate in one step — the usual way to go from bytes on disk
/// to a [`Module`] ready for [`Engine::instantiate`].
pub fn load(bytes: &[u8]) -> Result<Module, Error> {
    let module = decode(bytes)?;
    validate(&module)?;
    Ok(module)
}
