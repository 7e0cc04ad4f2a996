//! Turning a decoded [`Module`] plus a set of imports into a live
//! [`ModuleInstance`]: matching imports against what the embedder supplied,
//! allocating store entries for everything the module declares, evaluating
//! global initializers, copying element and data segments into place, and
//! finally running the start function.

use std::collections::HashMap;
use std::rc::Rc;

use wrt_error::{codes, Error, TrapKind};
use wrt_format::module::{ConstExpr, ExportDesc, ImportDesc, Module};
use wrt_format::types::{GlobalType, Limits};

use crate::instance::{ExternVal, ModuleInstance};
use crate::store::{self, FuncInst, GlobalAddr, Store};
use crate::value::Value;
use crate::exec;

/// One extern the embedder supplies to satisfy an import, named the same
/// way the module names its import: `(module, name, value)`.
pub type ImportValue<'a> = (&'a str, &'a str, ExternVal);

pub fn instantiate(
    store: &mut Store,
    module: &Module,
    imports: &[ImportValue<'_>],
) -> Result<Rc<ModuleInstance>, Error> {
    let mut func_addrs = Vec::new();
    let mut table_addrs = Vec::new();
    let mut mem_addrs = Vec::new();
    let mut global_addrs = Vec::new();

    for import in &module.imports {
        let found = imports
            .iter()
            .find(|(m, n, _)| *m == import.module && *n == import.name)
            .map(|(_, _, v)| *v)
            .ok_or_else(|| {
                Error::link(
                    codes::MISSING_IMPORT,
                    format!("missing import `{}.{}`", import.module, import.name),
                )
            })?;

        match (&import.desc, found) {
            (ImportDesc::Func(type_idx), ExternVal::Func(addr)) => {
                let expected = &module.types[*type_idx as usize];
                let actual = store.func(addr)?.ty();
                if actual != expected {
                    return Err(Error::link(
                        codes::IMPORT_TYPE_MISMATCH,
                        format!("import `{}.{}` has the wrong function type", import.module, import.name),
                    ));
                }
                func_addrs.push(addr);
            }
            (ImportDesc::Table(expected), ExternVal::Table(addr)) => {
                let actual = &store.tables[addr].ty;
                if !expected.limits.subsumes(&actual.limits) {
                    return Err(Error::link(
                        codes::LIMITS_NOT_SUBSUMED,
                        format!("import `{}.{}` table limits do not fit", import.module, import.name),
                    ));
                }
                table_addrs.push(addr);
            }
            (ImportDesc::Memory(expected), ExternVal::Memory(addr)) => {
                let actual_limits = Limits {
                    min: store.mems[addr].size_pages(),
                    max: store.mems[addr].ty_max,
                };
                if !expected.limits.subsumes(&actual_limits) {
                    return Err(Error::link(
                        codes::LIMITS_NOT_SUBSUMED,
                        format!("import `{}.{}` memory limits do not fit", import.module, import.name),
                    ));
                }
                mem_addrs.push(addr);
            }
            (ImportDesc::Global(expected), ExternVal::Global(addr)) => {
                let actual = &store.globals[addr].ty;
                if *actual != *expected {
                    return Err(Error::link(
                        codes::IMPORT_TYPE_MISMATCH,
                        format!("import `{}.{}` has the wrong global type", import.module, import.name),
                    ));
                }
                global_addrs.push(addr);
            }
            _ => {
                return Err(Error::link(
                    codes::IMPORT_TYPE_MISMATCH,
                    format!("import `{}.{}` is the wrong kind of extern", import.module, import.name),
                ))
            }
        }
    }

    // Local functions are allocated after everything else in this function,
    // but their addresses are predictable now: nothing else pushes onto
    // `store.funcs` in between.
    let first_local_func = store.funcs.len();
    for (i, function) in module.functions.iter().enumerate() {
        let _ = function;
        func_addrs.push(first_local_func + i);
    }

    for table in &module.tables {
        table_addrs.push(store.alloc_table(*table));
    }
    for mem in &module.memories {
        mem_addrs.push(store.alloc_mem(mem.limits.min, mem.limits.max));
    }
    for global in &module.globals {
        let value = eval_const_expr(store, &global_addrs, &global.init, global.global_type)?;
        global_addrs.push(store.alloc_global(global.global_type, value));
    }

    let mut exports = HashMap::new();
    for export in &module.exports {
        let value = match export.desc {
            ExportDesc::Func(idx) => ExternVal::Func(func_addrs[idx as usize]),
            ExportDesc::Table(idx) => ExternVal::Table(table_addrs[idx as usize]),
            ExportDesc::Memory(idx) => ExternVal::Memory(mem_addrs[idx as usize]),
            ExportDesc::Global(idx) => ExternVal::Global(global_addrs[idx as usize]),
        };
        exports.insert(export.name.clone(), value);
    }

    let instance = Rc::new(ModuleInstance {
        id: store::next_instance_id(),
        types: module.types.clone(),
        func_addrs,
        table_addrs,
        mem_addrs,
        global_addrs,
        exports,
    });

    debug_assert_eq!(store.funcs.len(), first_local_func);
    for function in &module.functions {
        let ty = instance.types[function.type_idx as usize].clone();
        store.alloc_func(FuncInst::Local { ty, module: Rc::clone(&instance), code: Rc::new(function.clone()) });
    }

    // Every element and data offset is resolved and bounds-checked before any
    // segment is copied, so a later out-of-range segment can't leave earlier
    // ones half-written into the table or memory.
    let mut element_writes = Vec::with_capacity(module.elements.len());
    for element in &module.elements {
        let offset = eval_const_expr(
            store,
            &instance.global_addrs,
            &element.offset,
            GlobalType { value_type: wrt_format::types::ValueType::I32, mutable: false },
        )?
        .as_i32()
        .expect("validated as i32") as usize;

        let table_addr = instance.table_addrs[element.table_idx as usize];
        if offset + element.func_indices.len() > store.tables[table_addr].elems.len() {
            return Err(Error::trap(TrapKind::ElementSegmentOutOfBounds));
        }
        element_writes.push((table_addr, offset, element));
    }

    let mut data_writes = Vec::with_capacity(module.data.len());
    for data in &module.data {
        let offset = eval_const_expr(
            store,
            &instance.global_addrs,
            &data.offset,
            GlobalType { value_type: wrt_format::types::ValueType::I32, mutable: false },
        )?
        .as_i32()
        .expect("validated as i32") as usize;

        let mem_addr = instance.mem_addrs[data.memory_idx as usize];
        if offset + data.bytes.len() > store.mems[mem_addr].data.len() {
            return Err(Error::trap(TrapKind::ElementSegmentOutOfBounds));
        }
        data_writes.push((mem_addr, offset, data));
    }

    for (table_addr, offset, element) in element_writes {
        let table = &mut store.tables[table_addr];
        for (i, &func_idx) in element.func_indices.iter().enumerate() {
            table.elems[offset + i] = Some(instance.func_addrs[func_idx as usize]);
        }
    }

    for (mem_addr, offset, data) in data_writes {
        let mem = &mut store.mems[mem_addr];
        mem.data[offset..offset + data.bytes.len()].copy_from_slice(&data.bytes);
    }

    if let Some(start) = module.start {
        let addr = instance.func_addrs[start as usize];
        exec::invoke(store, addr, &[])?;
    }

    Ok(instance)
}

fn eval_const_expr(
    store: &Store,
    global_addrs: &[GlobalAddr],
    expr: &ConstExpr,
    expected: GlobalType,
) -> Result<Value, Error> {
    let value = match expr {
        ConstExpr::I32Const(v) => Value::I32(*v),
        ConstExpr::I64Const(v) => Value::I64(*v),
        ConstExpr::F32Const(v) => Value::F32(*v),
        ConstExpr::F64Const(v) => Value::F64(*v),
        ConstExpr::GlobalGet(idx) => store.globals[global_addrs[*idx as usize]].value,
    };
    debug_assert_eq!(value.value_type(), expected.value_type);
    Ok(value)
}
