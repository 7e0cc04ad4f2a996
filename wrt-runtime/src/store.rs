//! The store: append-only pools of function, table, memory, and global
//! instances, addressed by position. Every module instantiated into a
//! store gets its own slice of each pool; addresses are never reused or
//! reclaimed, matching the Wasm spec's store model (a real embedder might
//! garbage-collect, but Wasm 1.0 itself never requires it).

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use wrt_error::{codes, Error};
use wrt_format::module::Function;
use wrt_format::types::{FuncType, GlobalType, TableType};
use wrt_format::PAGE_SIZE;

use crate::instance::ModuleInstance;
use crate::value::Value;

pub type FuncAddr = usize;
pub type TableAddr = usize;
pub type MemAddr = usize;
pub type GlobalAddr = usize;

/// A native function the embedder supplies at the host boundary. Invoked
/// with arguments already checked against `ty`'s parameter types; must
/// return results matching `ty`'s result types.
pub trait HostFunc {
    fn ty(&self) -> &FuncType;
    fn call(&self, args: &[Value]) -> Result<Vec<Value>, Error>;
}

pub enum FuncInst {
    Local { ty: FuncType, module: Rc<ModuleInstance>, code: Rc<Function> },
    Host(Rc<dyn HostFunc>),
}

impl FuncInst {
    pub fn ty(&self) -> &FuncType {
        match self {
            FuncInst::Local { ty, .. } => ty,
            FuncInst::Host(h) => h.ty(),
        }
    }
}

/// A table of (nullable) function references. Wasm 1.0 has exactly one
/// element type, `funcref`, so each slot is either empty or a function
/// address.
pub struct TableInst {
    pub ty: TableType,
    pub elems: Vec<Option<FuncAddr>>,
}

impl TableInst {
    pub fn new(ty: TableType) -> Self {
        let elems = vec![None; ty.limits.min as usize];
        Self { ty, elems }
    }
}

pub struct MemInst {
    pub ty_max: Option<u32>,
    pub data: Vec<u8>,
}

impl MemInst {
    pub fn new(min_pages: u32, max_pages: Option<u32>) -> Self {
        Self { ty_max: max_pages, data: vec![0; min_pages as usize * PAGE_SIZE as usize] }
    }

    pub fn size_pages(&self) -> u32 {
        (self.data.len() / PAGE_SIZE as usize) as u32
    }

    /// Grow by `delta` pages, returning the previous size in pages, or
    /// `None` if the growth would exceed the declared maximum (or `u32`
    /// page-count range) — per spec, a failed `memory.grow` returns `-1`
    /// rather than trapping.
    pub fn grow(&mut self, delta: u32) -> Option<u32> {
        let old = self.size_pages();
        let new = old.checked_add(delta)?;
        if let Some(max) = self.ty_max {
            if new > max {
                return None;
            }
        }
        if new > 65_536 {
            return None;
        }
        self.data.resize(new as usize * PAGE_SIZE as usize, 0);
        Some(old)
    }
}

pub struct GlobalInst {
    pub ty: GlobalType,
    pub value: Value,
}

#[derive(Default)]
pub struct Store {
    pub funcs: Vec<FuncInst>,
    pub tables: Vec<TableInst>,
    pub mems: Vec<MemInst>,
    pub globals: Vec<GlobalInst>,
}

static INSTANCE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A process-wide counter handed out to each [`ModuleInstance`], used only
/// for diagnostics (it has no bearing on store addressing).
pub(crate) fn next_instance_id() -> u32 {
    INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed)
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_func(&mut self, inst: FuncInst) -> FuncAddr {
        self.funcs.push(inst);
        self.funcs.len() - 1
    }

    pub fn alloc_table(&mut self, ty: TableType) -> TableAddr {
        self.tables.push(TableInst::new(ty));
        self.tables.len() - 1
    }

    pub fn alloc_mem(&mut self, min_pages: u32, max_pages: Option<u32>) -> MemAddr {
        self.mems.push(MemInst::new(min_pages, max_pages));
        self.mems.len() - 1
    }

    pub fn alloc_global(&mut self, ty: GlobalType, value: Value) -> GlobalAddr {
        self.globals.push(GlobalInst { ty, value });
        self.globals.len() - 1
    }

    pub fn func(&self, addr: FuncAddr) -> Result<&FuncInst, Error> {
        self.funcs.get(addr).ok_or_else(|| {
            Error::validation(codes::INDEX_OUT_OF_RANGE, "function address out of range")
        })
    }
}
