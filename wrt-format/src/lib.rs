// WRT - wrt-format
// Module: WebAssembly Binary Format Definitions
//
// SPDX-License-Identifier: MIT

//! WebAssembly 1.0 binary format definitions.
//!
//! This crate defines the vocabulary shared by the decoder, validator, and
//! runtime: value and structural types ([`types`]), the instruction set
//! ([`instruction`]), the decoded module syntax tree ([`module`]), and the
//! LEB128 codec ([`leb128`]) the decoder builds on. It does not itself parse
//! bytes into a [`module::Module`] — that is `wrt-decoder`'s job — nor does
//! it assign any semantics to the tree it defines.

pub mod instruction;
pub mod leb128;
pub mod module;
pub mod types;

pub use instruction::{Instruction, MemArg};
pub use module::{
    ConstExpr, CustomSection, DataSegment, ElementSegment, Export, ExportDesc, Function, Global,
    Import, ImportDesc, Module,
};
pub use types::{BlockType, FuncType, GlobalType, Limits, MemType, TableType, ValueType};

/// The 65,536-byte unit in which Wasm memories grow.
pub const PAGE_SIZE: u32 = 65_536;
