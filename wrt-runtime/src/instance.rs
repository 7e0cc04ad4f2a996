//! A module instance: the binding from a module's index spaces (function
//! index 3, table index 0, ...) to concrete store addresses, produced once
//! at instantiation and immutable afterward.

use std::collections::HashMap;

use wrt_format::types::FuncType;

use crate::store::{FuncAddr, GlobalAddr, MemAddr, TableAddr};

/// An extern value: what an import is satisfied by, or an export resolves
/// to, named at the host boundary.
#[derive(Debug, Clone, Copy)]
pub enum ExternVal {
    Func(FuncAddr),
    Table(TableAddr),
    Memory(MemAddr),
    Global(GlobalAddr),
}

pub struct ModuleInstance {
    pub id: u32,
    pub types: Vec<FuncType>,
    pub func_addrs: Vec<FuncAddr>,
    pub table_addrs: Vec<TableAddr>,
    pub mem_addrs: Vec<MemAddr>,
    pub global_addrs: Vec<GlobalAddr>,
    pub exports: HashMap<String, ExternVal>,
}

impl ModuleInstance {
    pub fn export(&self, name: &str) -> Option<ExternVal> {
        self.exports.get(name).copied()
    }
}
