// WRT - wrt-validator
// Module: WebAssembly Module Validator
//
// SPDX-License-Identifier: MIT

//! Static validation of a decoded WebAssembly 1.0 module.
//!
//! Decoding ([`wrt_decoder`]) only checks that the byte stream has the
//! right shape; it does not check that indices are in range, that
//! instructions are used at types the stack actually has, or any of the
//! other well-formedness rules the execution engine relies on to never
//! observe an ill-typed program. This crate is that check, run once after
//! decoding and before a module is ever instantiated.

mod control;
mod numeric;

use std::collections::HashSet;

use wrt_error::{codes, Error};
use wrt_format::module::{ConstExpr, ExportDesc, Function, Module};
use wrt_format::types::{FuncType, ValueType};
use wrt_format::Instruction;

use control::{Ctx, StackVal};

/// Validate every function body, the start function's signature, export
/// uniqueness, the single-memory/single-table rule, and every static index
/// used throughout the module.
#[tracing::instrument(skip(module), fields(functions = module.functions.len()))]
pub fn validate(module: &Module) -> Result<(), Error> {
    if module.total_tables() > 1 {
        return Err(Error::validation(
            codes::MULTIPLE_MEMORIES_OR_TABLES,
            "a module may declare at most one table",
        ));
    }
    if module.total_memories() > 1 {
        return Err(Error::validation(
            codes::MULTIPLE_MEMORIES_OR_TABLES,
            "a module may declare at most one memory",
        ));
    }

    validate_exports(module)?;

    if let Some(start) = module.start {
        let type_idx = module
            .function_type_idx(start)
            .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "start function index out of range"))?;
        let ty = function_type(module, type_idx)?;
        if !ty.params.is_empty() || !ty.results.is_empty() {
            return Err(Error::validation(codes::BAD_START_TYPE, "start function must be `[] -> []`"));
        }
    }

    for element in &module.elements {
        if element.table_idx >= module.total_tables() as u32 {
            return Err(Error::validation(codes::INDEX_OUT_OF_RANGE, "element segment table index out of range"));
        }
        validate_const_expr_type(module, &element.offset, ValueType::I32)?;
        for &f in &element.func_indices {
            if module.function_type_idx(f).is_none() {
                return Err(Error::validation(codes::INDEX_OUT_OF_RANGE, "element segment function index out of range"));
            }
        }
    }

    for data in &module.data {
        if data.memory_idx >= module.total_memories() as u32 {
            return Err(Error::validation(codes::INDEX_OUT_OF_RANGE, "data segment memory index out of range"));
        }
        validate_const_expr_type(module, &data.offset, ValueType::I32)?;
    }

    for global in &module.globals {
        validate_const_expr_type(module, &global.init, global.global_type.value_type)?;
        if let ConstExpr::GlobalGet(idx) = global.init {
            let referenced = module
                .global_type(idx)
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "global initializer index out of range"))?;
            if referenced.mutable {
                return Err(Error::validation(
                    codes::VALIDATION_ERROR,
                    "global initializers may only reference imported immutable globals",
                ));
            }
        }
    }

    for function in &module.functions {
        validate_function(module, function)?;
    }

    Ok(())
}

fn validate_exports(module: &Module) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for export in &module.exports {
        if !seen.insert(export.name.as_str()) {
            return Err(Error::validation(codes::DUPLICATE_EXPORT, format!("duplicate export name `{}`", export.name)));
        }
        let in_range = match export.desc {
            ExportDesc::Func(idx) => (idx as usize) < module.total_functions(),
            ExportDesc::Table(idx) => (idx as usize) < module.total_tables(),
            ExportDesc::Memory(idx) => (idx as usize) < module.total_memories(),
            ExportDesc::Global(idx) => (idx as usize) < module.total_globals(),
        };
        if !in_range {
            return Err(Error::validation(codes::INDEX_OUT_OF_RANGE, format!("export `{}` index out of range", export.name)));
        }
    }
    Ok(())
}

fn function_type<'a>(module: &'a Module, type_idx: u32) -> Result<&'a FuncType, Error> {
    module
        .types
        .get(type_idx as usize)
        .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "type index out of range"))
}

fn const_expr_value_type(module: &Module, expr: &ConstExpr) -> Result<ValueType, Error> {
    Ok(match expr {
        ConstExpr::I32Const(_) => ValueType::I32,
        ConstExpr::I64Const(_) => ValueType::I64,
        ConstExpr::F32Const(_) => ValueType::F32,
        ConstExpr::F64Const(_) => ValueType::F64,
        ConstExpr::GlobalGet(idx) => {
            module
                .global_type(*idx)
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "global index out of range"))?
                .value_type
        }
    })
}

fn validate_const_expr_type(module: &Module, expr: &ConstExpr, want: ValueType) -> Result<(), Error> {
    let got = const_expr_value_type(module, expr)?;
    if got != want {
        return Err(Error::validation(
            codes::TYPE_MISMATCH,
            format!("constant expression has type {got:?}, expected {want:?}"),
        ));
    }
    Ok(())
}

fn validate_function(module: &Module, function: &Function) -> Result<(), Error> {
    let ty = function_type(module, function.type_idx)?;
    let mut locals = ty.params.clone();
    locals.extend(function.locals.iter().copied());

    let mut ctx = Ctx::new();
    ctx.push_ctrl(ty.results.clone(), ty.results.clone());
    validate_seq(module, &mut ctx, &locals, ty, &function.body)?;
    ctx.pop_ctrl()?;
    Ok(())
}

fn validate_seq(
    module: &Module,
    ctx: &mut Ctx,
    locals: &[ValueType],
    func_ty: &FuncType,
    body: &[Instruction],
) -> Result<(), Error> {
    for instr in body {
        validate_one(module, ctx, locals, func_ty, instr)?;
    }
    Ok(())
}

fn require_table(module: &Module) -> Result<(), Error> {
    if module.total_tables() == 0 {
        return Err(Error::validation(codes::INDEX_OUT_OF_RANGE, "no table declared"));
    }
    Ok(())
}

fn require_memory(module: &Module) -> Result<(), Error> {
    if module.total_memories() == 0 {
        return Err(Error::validation(codes::INDEX_OUT_OF_RANGE, "no memory declared"));
    }
    Ok(())
}

fn check_alignment(instr: &Instruction, mem_arg: &wrt_format::MemArg) -> Result<(), Error> {
    if let Some(natural) = instr.natural_alignment_bits() {
        if mem_arg.align > natural {
            return Err(Error::validation(
                codes::BAD_ALIGNMENT,
                format!("alignment 2^{} exceeds natural alignment 2^{natural}", mem_arg.align),
            ));
        }
    }
    Ok(())
}

fn validate_one(
    module: &Module,
    ctx: &mut Ctx,
    locals: &[ValueType],
    func_ty: &FuncType,
    instr: &Instruction,
) -> Result<(), Error> {
    use Instruction::*;

    if let Some((operands, result)) = numeric::signature(instr) {
        ctx.pop_vals(operands)?;
        if let Some(t) = result {
            ctx.push_val(StackVal::Known(t));
        }
        return Ok(());
    }

    match instr {
        Unreachable => ctx.mark_unreachable(),
        Nop => {}

        Block { block_type, body } => {
            ctx.push_ctrl(block_type.results(), block_type.results());
            validate_seq(module, ctx, locals, func_ty, body)?;
            let results = ctx.pop_ctrl()?;
            ctx.push_vals(&results);
        }
        Loop { block_type, body } => {
            ctx.push_ctrl(Vec::new(), block_type.results());
            validate_seq(module, ctx, locals, func_ty, body)?;
            let results = ctx.pop_ctrl()?;
            ctx.push_vals(&results);
        }
        If { block_type, then_body, else_body } => {
            ctx.pop_expect(ValueType::I32)?;
            ctx.push_ctrl(block_type.results(), block_type.results());
            validate_seq(module, ctx, locals, func_ty, then_body)?;
            match else_body {
                Some(else_body) => {
                    ctx.pop_ctrl()?;
                    ctx.push_ctrl(block_type.results(), block_type.results());
                    validate_seq(module, ctx, locals, func_ty, else_body)?;
                    let results = ctx.pop_ctrl()?;
                    ctx.push_vals(&results);
                }
                None => {
                    if !block_type.results().is_empty() {
                        return Err(Error::validation(
                            codes::TYPE_MISMATCH,
                            "`if` without `else` cannot produce a result",
                        ));
                    }
                    let results = ctx.pop_ctrl()?;
                    ctx.push_vals(&results);
                }
            }
        }

        Br(label) => {
            let types = ctx.label_types(*label)?;
            ctx.pop_vals(&types)?;
            ctx.mark_unreachable();
        }
        BrIf(label) => {
            ctx.pop_expect(ValueType::I32)?;
            let types = ctx.label_types(*label)?;
            ctx.pop_vals(&types)?;
            ctx.push_vals(&types);
        }
        BrTable { labels, default } => {
            ctx.pop_expect(ValueType::I32)?;
            let default_types = ctx.label_types(*default)?;
            for &label in labels {
                let types = ctx.label_types(label)?;
                if types != default_types {
                    return Err(Error::validation(
                        codes::TYPE_MISMATCH,
                        "br_table labels must all share the default label's type",
                    ));
                }
            }
            ctx.pop_vals(&default_types)?;
            ctx.mark_unreachable();
        }
        Return => {
            let types = func_ty.results.clone();
            ctx.pop_vals(&types)?;
            ctx.mark_unreachable();
        }
        Call(idx) => {
            let type_idx = module
                .function_type_idx(*idx)
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "call target index out of range"))?;
            let callee = function_type(module, type_idx)?;
            ctx.pop_vals(&callee.params)?;
            ctx.push_vals(&callee.results);
        }
        CallIndirect { type_idx } => {
            require_table(module)?;
            let callee = function_type(module, *type_idx)?;
            ctx.pop_expect(ValueType::I32)?;
            ctx.pop_vals(&callee.params)?;
            ctx.push_vals(&callee.results);
        }

        Drop => {
            ctx.pop_val()?;
        }
        Select => {
            let t = ctx.pop_same()?;
            ctx.pop_expect(ValueType::I32)?;
            ctx.push_val(t);
        }

        LocalGet(idx) => {
            let t = *locals
                .get(*idx as usize)
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "local index out of range"))?;
            ctx.push_val(StackVal::Known(t));
        }
        LocalSet(idx) => {
            let t = *locals
                .get(*idx as usize)
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "local index out of range"))?;
            ctx.pop_expect(t)?;
        }
        LocalTee(idx) => {
            let t = *locals
                .get(*idx as usize)
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "local index out of range"))?;
            ctx.pop_expect(t)?;
            ctx.push_val(StackVal::Known(t));
        }
        GlobalGet(idx) => {
            let global = module
                .global_type(*idx)
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "global index out of range"))?;
            ctx.push_val(StackVal::Known(global.value_type));
        }
        GlobalSet(idx) => {
            let global = module
                .global_type(*idx)
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "global index out of range"))?;
            if !global.mutable {
                return Err(Error::validation(codes::IMMUTABLE_GLOBAL, "global.set on an immutable global"));
            }
            ctx.pop_expect(global.value_type)?;
        }

        I32Load(m) | I32Load8S(m) | I32Load8U(m) | I32Load16S(m) | I32Load16U(m) => {
            require_memory(module)?;
            check_alignment(instr, m)?;
            ctx.pop_expect(ValueType::I32)?;
            ctx.push_val(StackVal::Known(ValueType::I32));
        }
        I64Load(m) | I64Load8S(m) | I64Load8U(m) | I64Load16S(m) | I64Load16U(m) | I64Load32S(m)
        | I64Load32U(m) => {
            require_memory(module)?;
            check_alignment(instr, m)?;
            ctx.pop_expect(ValueType::I32)?;
            ctx.push_val(StackVal::Known(ValueType::I64));
        }
        F32Load(m) => {
            require_memory(module)?;
            check_alignment(instr, m)?;
            ctx.pop_expect(ValueType::I32)?;
            ctx.push_val(StackVal::Known(ValueType::F32));
        }
        F64Load(m) => {
            require_memory(module)?;
            check_alignment(instr, m)?;
            ctx.pop_expect(ValueType::I32)?;
            ctx.push_val(StackVal::Known(ValueType::F64));
        }
        I32Store(m) | I32Store8(m) | I32Store16(m) => {
            require_memory(module)?;
            check_alignment(instr, m)?;
            ctx.pop_expect(ValueType::I32)?;
            ctx.pop_expect(ValueType::I32)?;
        }
        I64Store(m) | I64Store8(m) | I64Store16(m) | I64Store32(m) => {
            require_memory(module)?;
            check_alignment(instr, m)?;
            ctx.pop_expect(ValueType::I64)?;
            ctx.pop_expect(ValueType::I32)?;
        }
        F32Store(m) => {
            require_memory(module)?;
            check_alignment(instr, m)?;
            ctx.pop_expect(ValueType::F32)?;
            ctx.pop_expect(ValueType::I32)?;
        }
        F64Store(m) => {
            require_memory(module)?;
            check_alignment(instr, m)?;
            ctx.pop_expect(ValueType::F64)?;
            ctx.pop_expect(ValueType::I32)?;
        }
        MemorySize => {
            require_memory(module)?;
            ctx.push_val(StackVal::Known(ValueType::I32));
        }
        MemoryGrow => {
            require_memory(module)?;
            ctx.pop_expect(ValueType::I32)?;
            ctx.push_val(StackVal::Known(ValueType::I32));
        }

        // Constants and the whole arithmetic/comparison/conversion set are
        // handled by `numeric::signature` above.
        _ => unreachable!("instruction {instr:?} should have matched a numeric signature"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wrt_format::module::{Export, ExportDesc, Global};
    use wrt_format::types::{GlobalType, Limits, MemType};

    fn func_type(params: Vec<ValueType>, results: Vec<ValueType>) -> FuncType {
        FuncType { params, results }
    }

    #[test]
    fn accepts_well_typed_add_function() {
        let mut module = Module::default();
        module.types.push(func_type(vec![ValueType::I32, ValueType::I32], vec![ValueType::I32]));
        module.functions.push(Function {
            type_idx: 0,
            locals: vec![],
            body: vec![Instruction::LocalGet(0), Instruction::LocalGet(1), Instruction::I32Add],
        });
        assert!(validate(&module).is_ok());
    }

    #[test]
    fn rejects_stack_type_mismatch() {
        let mut module = Module::default();
        module.types.push(func_type(vec![], vec![ValueType::I32]));
        module.functions.push(Function {
            type_idx: 0,
            locals: vec![],
            body: vec![Instruction::F32Const(1.0)],
        });
        let err = validate(&module).unwrap_err();
        assert_eq!(err.code, codes::TYPE_MISMATCH);
    }

    #[test]
    fn unreachable_code_is_polymorphic() {
        // unreachable, followed by an otherwise-inconsistent i32.add with
        // nothing on the stack, is legal since the block is dead.
        let mut module = Module::default();
        module.types.push(func_type(vec![], vec![ValueType::I32]));
        module.functions.push(Function {
            type_idx: 0,
            locals: vec![],
            body: vec![Instruction::Unreachable, Instruction::I32Add],
        });
        assert!(validate(&module).is_ok());
    }

    #[test]
    fn rejects_set_on_immutable_global() {
        let mut module = Module::default();
        module.types.push(func_type(vec![], vec![]));
        module.globals.push(Global {
            global_type: GlobalType { value_type: ValueType::I32, mutable: false },
            init: ConstExpr::I32Const(0),
        });
        module.functions.push(Function {
            type_idx: 0,
            locals: vec![],
            body: vec![Instruction::I32Const(1), Instruction::GlobalSet(0)],
        });
        let err = validate(&module).unwrap_err();
        assert_eq!(err.code, codes::IMMUTABLE_GLOBAL);
    }

    #[test]
    fn rejects_misaligned_memory_access() {
        let mut module = Module::default();
        module.types.push(func_type(vec![], vec![]));
        module.memories.push(MemType { limits: Limits { min: 1, max: None } });
        module.functions.push(Function {
            type_idx: 0,
            locals: vec![],
            body: vec![
                Instruction::I32Const(0),
                Instruction::I32Load(wrt_format::MemArg { align: 4, offset: 0 }),
                Instruction::Drop,
            ],
        });
        let err = validate(&module).unwrap_err();
        assert_eq!(err.code, codes::BAD_ALIGNMENT);
    }

    #[test]
    fn rejects_duplicate_export_names() {
        let mut module = Module::default();
        module.types.push(func_type(vec![], vec![]));
        module.functions.push(Function { type_idx: 0, locals: vec![], body: vec![] });
        module.exports.push(Export { name: "f".into(), desc: ExportDesc::Func(0) });
        module.exports.push(Export { name: "f".into(), desc: ExportDesc::Func(0) });
        let err = validate(&module).unwrap_err();
        assert_eq!(err.code, codes::DUPLICATE_EXPORT);
    }

    #[test]
    fn rejects_if_without_else_producing_a_result() {
        let mut module = Module::default();
        module.types.push(func_type(vec![], vec![ValueType::I32]));
        module.functions.push(Function {
            type_idx: 0,
            locals: vec![],
            body: vec![Instruction::I32Const(1), Instruction::If {
                block_type: wrt_format::types::BlockType::Value(ValueType::I32),
                then_body: vec![Instruction::I32Const(2)],
                else_body: None,
            }],
        });
        let err = validate(&module).unwrap_err();
        assert_eq!(err.code, codes::TYPE_MISMATCH);
    }
}
