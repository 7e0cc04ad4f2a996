//! The decoded module syntax tree.
//!
//! This is the decoder's output and the validator's input: a direct,
//! structural transcription of the binary format with no semantic
//! resolution performed yet (index validity, type checking, and so on are
//! the validator's job).

use crate::instruction::Instruction;
use crate::types::{FuncType, GlobalType, MemType, TableType, ValueType};

/// A decoded WebAssembly module.
#[derive(Debug, Clone, Default)]
pub struct Module {
    /// All function types named by the type section.
    pub types: Vec<FuncType>,
    /// Imported externs, in declaration order.
    pub imports: Vec<Import>,
    /// Locally defined functions, in declaration order (index space starts
    /// after imported functions).
    pub functions: Vec<Function>,
    /// Locally defined tables (Wasm 1.0: at most one).
    pub tables: Vec<TableType>,
    /// Locally defined memories (Wasm 1.0: at most one).
    pub memories: Vec<MemType>,
    /// Locally defined globals, with their initializer expressions.
    pub globals: Vec<Global>,
    /// Exported externs.
    pub exports: Vec<Export>,
    /// The start function, if declared; must have type `[] -> []`.
    pub start: Option<u32>,
    /// Element segments, copied into a table at instantiation.
    pub elements: Vec<ElementSegment>,
    /// Data segments, copied into a memory at instantiation.
    pub data: Vec<DataSegment>,
    /// Opaque custom sections, preserved but not interpreted.
    pub custom_sections: Vec<CustomSection>,
}

impl Module {
    /// How many functions exist in total, imported plus locally defined.
    pub fn total_functions(&self) -> usize {
        self.imported_functions().count() + self.functions.len()
    }

    /// How many tables exist in total, imported plus locally defined.
    pub fn total_tables(&self) -> usize {
        self.imported_tables().count() + self.tables.len()
    }

    /// How many memories exist in total, imported plus locally defined.
    pub fn total_memories(&self) -> usize {
        self.imported_memories().count() + self.memories.len()
    }

    /// How many globals exist in total, imported plus locally defined.
    pub fn total_globals(&self) -> usize {
        self.imported_globals().count() + self.globals.len()
    }

    /// The type index of function `idx` in the combined (imports-first)
    /// function index space, or `None` if out of range.
    pub fn function_type_idx(&self, idx: u32) -> Option<u32> {
        let imported: Vec<u32> = self.imported_functions().collect();
        let idx = idx as usize;
        if idx < imported.len() {
            Some(imported[idx])
        } else {
            self.functions.get(idx - imported.len()).map(|f| f.type_idx)
        }
    }

    /// Global types in the combined (imports-first) global index space.
    pub fn global_type(&self, idx: u32) -> Option<GlobalType> {
        let imported: Vec<GlobalType> = self.imported_globals().collect();
        let idx = idx as usize;
        if idx < imported.len() {
            Some(imported[idx])
        } else {
            self.globals.get(idx - imported.len()).map(|g| g.global_type)
        }
    }

    fn imported_functions(&self) -> impl Iterator<Item = u32> + '_ {
        self.imports.iter().filter_map(|i| match i.desc {
            ImportDesc::Func(type_idx) => Some(type_idx),
            _ => None,
        })
    }

    fn imported_tables(&self) -> impl Iterator<Item = TableType> + '_ {
        self.imports.iter().filter_map(|i| match i.desc {
            ImportDesc::Table(t) => Some(t),
            _ => None,
        })
    }

    fn imported_memories(&self) -> impl Iterator<Item = MemType> + '_ {
        self.imports.iter().filter_map(|i| match i.desc {
            ImportDesc::Memory(m) => Some(m),
            _ => None,
        })
    }

    fn imported_globals(&self) -> impl Iterator<Item = GlobalType> + '_ {
        self.imports.iter().filter_map(|i| match i.desc {
            ImportDesc::Global(g) => Some(g),
            _ => None,
        })
    }
}

/// One imported extern.
#[derive(Debug, Clone)]
pub struct Import {
    /// The exporting module's name.
    pub module: String,
    /// The field name within that module.
    pub name: String,
    /// What kind of extern, and its declared type.
    pub desc: ImportDesc,
}

/// The typed descriptor of an import.
#[derive(Debug, Clone, Copy)]
pub enum ImportDesc {
    /// A function, identified by its type index.
    Func(u32),
    /// A table.
    Table(TableType),
    /// A memory.
    Memory(MemType),
    /// A global.
    Global(GlobalType),
}

/// A locally defined function: its signature (by index) plus body.
#[derive(Debug, Clone)]
pub struct Function {
    /// Index into the module's type section.
    pub type_idx: u32,
    /// Declared local variables, expanded to one entry per local (their
    /// binary encoding groups them by run, but nothing downstream cares).
    pub locals: Vec<ValueType>,
    /// The function body.
    pub body: Vec<Instruction>,
}

/// A locally defined global and its initializer.
#[derive(Debug, Clone)]
pub struct Global {
    /// The global's type.
    pub global_type: GlobalType,
    /// A constant expression evaluated once, at instantiation.
    pub init: ConstExpr,
}

/// One exported extern.
#[derive(Debug, Clone)]
pub struct Export {
    /// The externally visible name; unique within a module.
    pub name: String,
    /// What is exported, and its index in the relevant space.
    pub desc: ExportDesc,
}

/// The kind and index of an exported extern.
#[derive(Debug, Clone, Copy)]
pub enum ExportDesc {
    /// A function, by combined function index.
    Func(u32),
    /// A table, by combined table index.
    Table(u32),
    /// A memory, by combined memory index.
    Memory(u32),
    /// A global, by combined global index.
    Global(u32),
}

/// A constant expression: `t.const` or `global.get` of an imported
/// immutable global, followed by `end`.
#[derive(Debug, Clone, Copy)]
pub enum ConstExpr {
    I32Const(i32),
    I64Const(i64),
    F32Const(f32),
    F64Const(f64),
    GlobalGet(u32),
}

/// A table initializer: a sequence of function indices copied into a table
/// starting at a constant offset.
#[derive(Debug, Clone)]
pub struct ElementSegment {
    /// The destination table (always 0 in Wasm 1.0).
    pub table_idx: u32,
    /// The i32 constant offset expression.
    pub offset: ConstExpr,
    /// Function indices to place consecutively from `offset`.
    pub func_indices: Vec<u32>,
}

/// A memory initializer: raw bytes copied into a memory starting at a
/// constant offset.
#[derive(Debug, Clone)]
pub struct DataSegment {
    /// The destination memory (always 0 in Wasm 1.0).
    pub memory_idx: u32,
    /// The i32 constant offset expression.
    pub offset: ConstExpr,
    /// The bytes to copy.
    pub bytes: Vec<u8>,
}

/// An opaque custom section, preserved verbatim.
#[derive(Debug, Clone)]
pub struct CustomSection {
    /// The custom section's name.
    pub name: String,
    /// The custom section's raw payload.
    pub data: Vec<u8>,
}
