// WRT - wrt-runtime
// Module: WebAssembly Store and Execution Engine
//
// SPDX-License-Identifier: MIT

//! The store, module instances, and the stack-based interpreter that
//! actually runs a validated module.
//!
//! This crate assumes its input has already passed [`wrt_validator`]: the
//! interpreter does not re-check operand types or branch arities, and will
//! panic (not trap) if handed an ill-typed program. What it does check at
//! runtime are the things validation cannot rule out ahead of time —
//! division by zero, out-of-bounds memory and table access, an
//! uninitialized table slot, a mismatched `call_indirect` signature — by
//! producing a [`wrt_error::TrapKind`].

mod exec;
mod instance;
mod instantiate;
mod store;
mod value;

pub use exec::invoke;
pub use instance::{ExternVal, ModuleInstance};
pub use instantiate::{instantiate, ImportValue};
pub use store::{FuncAddr, FuncInst, GlobalAddr, GlobalInst, HostFunc, MemAddr, MemInst, Store, TableAddr, TableInst};
pub use value::Value;
