//! The stack-based execution engine.
//!
//! Control flow is a tree (see [`wrt_format::Instruction`]), not a flat
//! instruction stream, so branching is modeled as a signal propagated back
//! up through the recursive evaluator rather than an instruction-pointer
//! jump: [`Flow::Branch(n)`] means "unwind `n` more enclosing blocks",
//! consumed by a `block`/`if` (which turns `Branch(0)` into falling off its
//! end) or re-entered by a `loop` (which turns `Branch(0)` into repeating).
//! The operand stack itself is flat and shared across an entire function
//! activation; blocks never get their own stack, since validation already
//! guarantees every block's entry and exit heights line up.

use std::rc::Rc;

use wrt_error::{codes, Error, TrapKind};
use wrt_format::{Instruction, MemArg};
use wrt_math::{conv, f32_ops, f64_ops, i32_ops, i64_ops};

use crate::instance::ModuleInstance;
use crate::store::{FuncAddr, FuncInst, MemAddr, Store};
use crate::value::Value;

/// How a nested instruction sequence exited.
enum Flow {
    /// Ran off the end normally.
    Normal,
    /// Unwinding `n` enclosing blocks before being consumed.
    Branch(u32),
    /// `return` was executed; unwinds all the way to the function call.
    Return,
}

struct Frame {
    locals: Vec<Value>,
    module: Rc<ModuleInstance>,
}

/// Invoke a function by store address, already-validated against its
/// parameter types.
pub fn invoke(store: &mut Store, addr: FuncAddr, args: &[Value]) -> Result<Vec<Value>, Error> {
    let (ty_results_len, module, code) = match store.func(addr)? {
        FuncInst::Host(host) => return host.call(args),
        FuncInst::Local { ty, module, code } => (ty.results.len(), Rc::clone(module), Rc::clone(code)),
    };

    let mut locals = args.to_vec();
    locals.extend(code.locals.iter().map(|t| Value::zero(*t)));

    let mut frame = Frame { locals, module };
    let mut stack = Vec::new();
    let flow = exec_seq(store, &mut frame, &mut stack, &code.body)?;
    debug_assert!(matches!(flow, Flow::Normal | Flow::Return));

    let results = stack.split_off(stack.len() - ty_results_len);
    Ok(results)
}

fn exec_seq(store: &mut Store, frame: &mut Frame, stack: &mut Vec<Value>, body: &[Instruction]) -> Result<Flow, Error> {
    for instr in body {
        match exec_one(store, frame, stack, instr)? {
            Flow::Normal => continue,
            other => return Ok(other),
        }
    }
    Ok(Flow::Normal)
}

fn descend(flow: Flow) -> Result<Flow, Error> {
    Ok(match flow {
        Flow::Branch(0) => Flow::Normal,
        Flow::Branch(n) => Flow::Branch(n - 1),
        other => other,
    })
}

/// Reset the operand stack to a label's entry height, keeping only the
/// `arity` branch values on top. A `br` that targets this label left those
/// values at the very top of the stack and nothing ran since, so what sits
/// between `height` and the top is exactly the garbage the branch skips.
fn truncate_to_label(stack: &mut Vec<Value>, height: usize, arity: usize) {
    let keep_from = stack.len() - arity;
    debug_assert!(keep_from >= height);
    stack.drain(height..keep_from);
}

fn pop_i32(stack: &mut Vec<Value>) -> i32 {
    stack.pop().expect("validated operand stack").as_i32().expect("validated i32 operand")
}
fn pop_i64(stack: &mut Vec<Value>) -> i64 {
    stack.pop().expect("validated operand stack").as_i64().expect("validated i64 operand")
}
fn pop_f32(stack: &mut Vec<Value>) -> f32 {
    stack.pop().expect("validated operand stack").as_f32().expect("validated f32 operand")
}
fn pop_f64(stack: &mut Vec<Value>) -> f64 {
    stack.pop().expect("validated operand stack").as_f64().expect("validated f64 operand")
}
fn pop_u32(stack: &mut Vec<Value>) -> u32 {
    pop_i32(stack) as u32
}
fn pop_u64(stack: &mut Vec<Value>) -> u64 {
    pop_i64(stack) as u64
}

fn effective_addr(store: &Store, mem: MemAddr, base: u32, mem_arg: &MemArg, width: u32) -> Result<usize, Error> {
    let mem_inst = &store.mems[mem];
    let ea = u64::from(base) + u64::from(mem_arg.offset);
    let end = ea.checked_add(u64::from(width)).ok_or_else(|| Error::trap(TrapKind::OutOfBoundsMemoryAccess))?;
    if end > mem_inst.data.len() as u64 {
        return Err(Error::trap(TrapKind::OutOfBoundsMemoryAccess));
    }
    Ok(ea as usize)
}

fn exec_one(store: &mut Store, frame: &mut Frame, stack: &mut Vec<Value>, instr: &Instruction) -> Result<Flow, Error> {
    use Instruction::*;

    match instr {
        Unreachable => return Err(Error::trap(TrapKind::Unreachable)),
        Nop => {}

        Block { block_type, body } => {
            let height = stack.len();
            let flow = exec_seq(store, frame, stack, body)?;
            if let Flow::Branch(0) = &flow {
                truncate_to_label(stack, height, block_type.results().len());
            }
            return descend(flow);
        }
        Loop { body, .. } => {
            let height = stack.len();
            loop {
                match exec_seq(store, frame, stack, body)? {
                    Flow::Branch(0) => {
                        stack.truncate(height);
                        continue;
                    }
                    other => return descend(other),
                }
            }
        }
        If { block_type, then_body, else_body } => {
            let cond = pop_i32(stack);
            let body: &[Instruction] = if cond != 0 { then_body } else { else_body.as_deref().unwrap_or(&[]) };
            let height = stack.len();
            let flow = exec_seq(store, frame, stack, body)?;
            if let Flow::Branch(0) = &flow {
                truncate_to_label(stack, height, block_type.results().len());
            }
            return descend(flow);
        }

        Br(label) => return Ok(Flow::Branch(*label)),
        BrIf(label) => {
            if pop_i32(stack) != 0 {
                return Ok(Flow::Branch(*label));
            }
        }
        BrTable { labels, default } => {
            let idx = pop_i32(stack) as u32 as usize;
            let label = labels.get(idx).copied().unwrap_or(*default);
            return Ok(Flow::Branch(label));
        }
        Return => return Ok(Flow::Return),

        Call(idx) => {
            let addr = frame.module.func_addrs[*idx as usize];
            let n = store.func(addr)?.ty().params.len();
            let args = stack.split_off(stack.len() - n);
            let results = invoke(store, addr, &args)?;
            stack.extend(results);
        }
        CallIndirect { type_idx } => {
            let table_addr = *frame
                .module
                .table_addrs
                .first()
                .ok_or_else(|| Error::validation(codes::INDEX_OUT_OF_RANGE, "call_indirect with no table"))?;
            let idx = pop_i32(stack) as u32 as usize;
            let func_addr = {
                let table = &store.tables[table_addr];
                let slot = table.elems.get(idx).ok_or_else(|| Error::trap(TrapKind::OutOfBoundsTableAccess))?;
                slot.ok_or_else(|| Error::trap(TrapKind::UninitializedElement))?
            };
            let expected = &frame.module.types[*type_idx as usize];
            if store.func(func_addr)?.ty() != expected {
                return Err(Error::trap(TrapKind::IndirectCallTypeMismatch));
            }
            let n = expected.params.len();
            let args = stack.split_off(stack.len() - n);
            let results = invoke(store, func_addr, &args)?;
            stack.extend(results);
        }

        Drop => {
            stack.pop().expect("validated operand stack");
        }
        Select => {
            let cond = pop_i32(stack);
            let b = stack.pop().expect("validated operand stack");
            let a = stack.pop().expect("validated operand stack");
            stack.push(if cond != 0 { a } else { b });
        }

        LocalGet(idx) => stack.push(frame.locals[*idx as usize]),
        LocalSet(idx) => frame.locals[*idx as usize] = stack.pop().expect("validated operand stack"),
        LocalTee(idx) => frame.locals[*idx as usize] = *stack.last().expect("validated operand stack"),
        GlobalGet(idx) => {
            let addr = frame.module.global_addrs[*idx as usize];
            stack.push(store.globals[addr].value);
        }
        GlobalSet(idx) => {
            let addr = frame.module.global_addrs[*idx as usize];
            store.globals[addr].value = stack.pop().expect("validated operand stack");
        }

        I32Load(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 4)?;
            let bytes: [u8; 4] = store.mems[mem].data[addr..addr + 4].try_into().unwrap();
            stack.push(Value::I32(i32::from_le_bytes(bytes)));
        }
        I32Load8S(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 1)?;
            stack.push(Value::I32(store.mems[mem].data[addr] as i8 as i32));
        }
        I32Load8U(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 1)?;
            stack.push(Value::I32(store.mems[mem].data[addr] as i32));
        }
        I32Load16S(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 2)?;
            let bytes: [u8; 2] = store.mems[mem].data[addr..addr + 2].try_into().unwrap();
            stack.push(Value::I32(i16::from_le_bytes(bytes) as i32));
        }
        I32Load16U(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 2)?;
            let bytes: [u8; 2] = store.mems[mem].data[addr..addr + 2].try_into().unwrap();
            stack.push(Value::I32(u16::from_le_bytes(bytes) as i32));
        }
        I64Load(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 8)?;
            let bytes: [u8; 8] = store.mems[mem].data[addr..addr + 8].try_into().unwrap();
            stack.push(Value::I64(i64::from_le_bytes(bytes)));
        }
        I64Load8S(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 1)?;
            stack.push(Value::I64(store.mems[mem].data[addr] as i8 as i64));
        }
        I64Load8U(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 1)?;
            stack.push(Value::I64(store.mems[mem].data[addr] as i64));
        }
        I64Load16S(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 2)?;
            let bytes: [u8; 2] = store.mems[mem].data[addr..addr + 2].try_into().unwrap();
            stack.push(Value::I64(i16::from_le_bytes(bytes) as i64));
        }
        I64Load16U(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 2)?;
            let bytes: [u8; 2] = store.mems[mem].data[addr..addr + 2].try_into().unwrap();
            stack.push(Value::I64(u16::from_le_bytes(bytes) as i64));
        }
        I64Load32S(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 4)?;
            let bytes: [u8; 4] = store.mems[mem].data[addr..addr + 4].try_into().unwrap();
            stack.push(Value::I64(i32::from_le_bytes(bytes) as i64));
        }
        I64Load32U(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 4)?;
            let bytes: [u8; 4] = store.mems[mem].data[addr..addr + 4].try_into().unwrap();
            stack.push(Value::I64(u32::from_le_bytes(bytes) as i64));
        }
        F32Load(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 4)?;
            let bytes: [u8; 4] = store.mems[mem].data[addr..addr + 4].try_into().unwrap();
            stack.push(Value::F32(f32::from_le_bytes(bytes)));
        }
        F64Load(m) => {
            let mem = frame.module.mem_addrs[0];
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 8)?;
            let bytes: [u8; 8] = store.mems[mem].data[addr..addr + 8].try_into().unwrap();
            stack.push(Value::F64(f64::from_le_bytes(bytes)));
        }

        I32Store(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_i32(stack);
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 4)?;
            store.mems[mem].data[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
        }
        I32Store8(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_i32(stack) as u8;
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 1)?;
            store.mems[mem].data[addr] = value;
        }
        I32Store16(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_i32(stack) as u16;
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 2)?;
            store.mems[mem].data[addr..addr + 2].copy_from_slice(&value.to_le_bytes());
        }
        I64Store(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_i64(stack);
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 8)?;
            store.mems[mem].data[addr..addr + 8].copy_from_slice(&value.to_le_bytes());
        }
        I64Store8(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_i64(stack) as u8;
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 1)?;
            store.mems[mem].data[addr] = value;
        }
        I64Store16(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_i64(stack) as u16;
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 2)?;
            store.mems[mem].data[addr..addr + 2].copy_from_slice(&value.to_le_bytes());
        }
        I64Store32(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_i64(stack) as u32;
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 4)?;
            store.mems[mem].data[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
        }
        F32Store(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_f32(stack);
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 4)?;
            store.mems[mem].data[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
        }
        F64Store(m) => {
            let mem = frame.module.mem_addrs[0];
            let value = pop_f64(stack);
            let base = pop_u32(stack);
            let addr = effective_addr(store, mem, base, m, 8)?;
            store.mems[mem].data[addr..addr + 8].copy_from_slice(&value.to_le_bytes());
        }
        MemorySize => {
            let mem = frame.module.mem_addrs[0];
            stack.push(Value::I32(store.mems[mem].size_pages() as i32));
        }
        MemoryGrow => {
            let mem = frame.module.mem_addrs[0];
            let delta = pop_u32(stack);
            let result = store.mems[mem].grow(delta).map(|old| old as i32).unwrap_or(-1);
            stack.push(Value::I32(result));
        }

        I32Const(v) => stack.push(Value::I32(*v)),
        I64Const(v) => stack.push(Value::I64(*v)),
        F32Const(v) => stack.push(Value::F32(*v)),
        F64Const(v) => stack.push(Value::F64(*v)),

        I32Eqz => {
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::eqz(a)));
        }
        I32Eq => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::eq(a, b)));
        }
        I32Ne => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::ne(a, b)));
        }
        I32LtS => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::lt_s(a, b)));
        }
        I32LtU => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::lt_u(a, b)));
        }
        I32GtS => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::gt_s(a, b)));
        }
        I32GtU => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::gt_u(a, b)));
        }
        I32LeS => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::le_s(a, b)));
        }
        I32LeU => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::le_u(a, b)));
        }
        I32GeS => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::ge_s(a, b)));
        }
        I32GeU => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::ge_u(a, b)));
        }

        I64Eqz => stack.push(Value::I32(i64_ops::eqz(pop_u64(stack)))),
        I64Eq => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::eq(a, b)));
        }
        I64Ne => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::ne(a, b)));
        }
        I64LtS => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::lt_s(a, b)));
        }
        I64LtU => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::lt_u(a, b)));
        }
        I64GtS => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::gt_s(a, b)));
        }
        I64GtU => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::gt_u(a, b)));
        }
        I64LeS => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::le_s(a, b)));
        }
        I64LeU => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::le_u(a, b)));
        }
        I64GeS => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::ge_s(a, b)));
        }
        I64GeU => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I32(i64_ops::ge_u(a, b)));
        }

        F32Eq => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::I32(f32_ops::eq(a, b)));
        }
        F32Ne => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::I32(f32_ops::ne(a, b)));
        }
        F32Lt => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::I32(f32_ops::lt(a, b)));
        }
        F32Gt => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::I32(f32_ops::gt(a, b)));
        }
        F32Le => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::I32(f32_ops::le(a, b)));
        }
        F32Ge => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::I32(f32_ops::ge(a, b)));
        }
        F64Eq => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::I32(f64_ops::eq(a, b)));
        }
        F64Ne => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::I32(f64_ops::ne(a, b)));
        }
        F64Lt => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::I32(f64_ops::lt(a, b)));
        }
        F64Gt => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::I32(f64_ops::gt(a, b)));
        }
        F64Le => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::I32(f64_ops::le(a, b)));
        }
        F64Ge => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::I32(f64_ops::ge(a, b)));
        }

        I32Clz => stack.push(Value::I32(i32_ops::clz(pop_u32(stack)) as i32)),
        I32Ctz => stack.push(Value::I32(i32_ops::ctz(pop_u32(stack)) as i32)),
        I32Popcnt => stack.push(Value::I32(i32_ops::popcnt(pop_u32(stack)) as i32)),
        I32Add => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::add(a, b) as i32));
        }
        I32Sub => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::sub(a, b) as i32));
        }
        I32Mul => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::mul(a, b) as i32));
        }
        I32DivS => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::div_s(a, b)? as i32));
        }
        I32DivU => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::div_u(a, b)? as i32));
        }
        I32RemS => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::rem_s(a, b)? as i32));
        }
        I32RemU => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::rem_u(a, b)? as i32));
        }
        I32And => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::and(a, b) as i32));
        }
        I32Or => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::or(a, b) as i32));
        }
        I32Xor => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::xor(a, b) as i32));
        }
        I32Shl => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::shl(a, b) as i32));
        }
        I32ShrS => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::shr_s(a, b) as i32));
        }
        I32ShrU => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::shr_u(a, b) as i32));
        }
        I32Rotl => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::rotl(a, b) as i32));
        }
        I32Rotr => {
            let b = pop_u32(stack);
            let a = pop_u32(stack);
            stack.push(Value::I32(i32_ops::rotr(a, b) as i32));
        }

        I64Clz => stack.push(Value::I64(i64_ops::clz(pop_u64(stack)) as i64)),
        I64Ctz => stack.push(Value::I64(i64_ops::ctz(pop_u64(stack)) as i64)),
        I64Popcnt => stack.push(Value::I64(i64_ops::popcnt(pop_u64(stack)) as i64)),
        I64Add => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::add(a, b) as i64));
        }
        I64Sub => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::sub(a, b) as i64));
        }
        I64Mul => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::mul(a, b) as i64));
        }
        I64DivS => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::div_s(a, b)? as i64));
        }
        I64DivU => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::div_u(a, b)? as i64));
        }
        I64RemS => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::rem_s(a, b)? as i64));
        }
        I64RemU => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::rem_u(a, b)? as i64));
        }
        I64And => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::and(a, b) as i64));
        }
        I64Or => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::or(a, b) as i64));
        }
        I64Xor => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::xor(a, b) as i64));
        }
        I64Shl => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::shl(a, b) as i64));
        }
        I64ShrS => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::shr_s(a, b) as i64));
        }
        I64ShrU => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::shr_u(a, b) as i64));
        }
        I64Rotl => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::rotl(a, b) as i64));
        }
        I64Rotr => {
            let b = pop_u64(stack);
            let a = pop_u64(stack);
            stack.push(Value::I64(i64_ops::rotr(a, b) as i64));
        }

        F32Abs => stack.push(Value::F32(f32_ops::abs(pop_f32(stack)))),
        F32Neg => stack.push(Value::F32(f32_ops::neg(pop_f32(stack)))),
        F32Ceil => stack.push(Value::F32(f32_ops::ceil(pop_f32(stack)))),
        F32Floor => stack.push(Value::F32(f32_ops::floor(pop_f32(stack)))),
        F32Trunc => stack.push(Value::F32(f32_ops::trunc(pop_f32(stack)))),
        F32Nearest => stack.push(Value::F32(f32_ops::nearest(pop_f32(stack)))),
        F32Sqrt => stack.push(Value::F32(f32_ops::sqrt(pop_f32(stack)))),
        F32Add => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::F32(f32_ops::add(a, b)));
        }
        F32Sub => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::F32(f32_ops::sub(a, b)));
        }
        F32Mul => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::F32(f32_ops::mul(a, b)));
        }
        F32Div => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::F32(f32_ops::div(a, b)));
        }
        F32Min => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::F32(f32_ops::min(a, b)));
        }
        F32Max => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::F32(f32_ops::max(a, b)));
        }
        F32Copysign => {
            let b = pop_f32(stack);
            let a = pop_f32(stack);
            stack.push(Value::F32(f32_ops::copysign(a, b)));
        }

        F64Abs => stack.push(Value::F64(f64_ops::abs(pop_f64(stack)))),
        F64Neg => stack.push(Value::F64(f64_ops::neg(pop_f64(stack)))),
        F64Ceil => stack.push(Value::F64(f64_ops::ceil(pop_f64(stack)))),
        F64Floor => stack.push(Value::F64(f64_ops::floor(pop_f64(stack)))),
        F64Trunc => stack.push(Value::F64(f64_ops::trunc(pop_f64(stack)))),
        F64Nearest => stack.push(Value::F64(f64_ops::nearest(pop_f64(stack)))),
        F64Sqrt => stack.push(Value::F64(f64_ops::sqrt(pop_f64(stack)))),
        F64Add => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::F64(f64_ops::add(a, b)));
        }
        F64Sub => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::F64(f64_ops::sub(a, b)));
        }
        F64Mul => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::F64(f64_ops::mul(a, b)));
        }
        F64Div => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::F64(f64_ops::div(a, b)));
        }
        F64Min => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::F64(f64_ops::min(a, b)));
        }
        F64Max => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::F64(f64_ops::max(a, b)));
        }
        F64Copysign => {
            let b = pop_f64(stack);
            let a = pop_f64(stack);
            stack.push(Value::F64(f64_ops::copysign(a, b)));
        }

        I32WrapI64 => stack.push(Value::I32(conv::wrap_i64_to_i32(pop_u64(stack)) as i32)),
        I32TruncF32S => stack.push(Value::I32(conv::trunc_f32_s_to_i32(pop_f32(stack))? as i32)),
        I32TruncF32U => stack.push(Value::I32(conv::trunc_f32_u_to_i32(pop_f32(stack))? as i32)),
        I32TruncF64S => stack.push(Value::I32(conv::trunc_f64_s_to_i32(pop_f64(stack))? as i32)),
        I32TruncF64U => stack.push(Value::I32(conv::trunc_f64_u_to_i32(pop_f64(stack))? as i32)),
        I64ExtendI32S => stack.push(Value::I64(conv::extend_i32_s_to_i64(pop_u32(stack)) as i64)),
        I64ExtendI32U => stack.push(Value::I64(conv::extend_i32_u_to_i64(pop_u32(stack)) as i64)),
        I64TruncF32S => stack.push(Value::I64(conv::trunc_f32_s_to_i64(pop_f32(stack))? as i64)),
        I64TruncF32U => stack.push(Value::I64(conv::trunc_f32_u_to_i64(pop_f32(stack))? as i64)),
        I64TruncF64S => stack.push(Value::I64(conv::trunc_f64_s_to_i64(pop_f64(stack))? as i64)),
        I64TruncF64U => stack.push(Value::I64(conv::trunc_f64_u_to_i64(pop_f64(stack))? as i64)),
        F32ConvertI32S => stack.push(Value::F32(conv::convert_i32_s_to_f32(pop_u32(stack)))),
        F32ConvertI32U => stack.push(Value::F32(conv::convert_i32_u_to_f32(pop_u32(stack)))),
        F32ConvertI64S => stack.push(Value::F32(conv::convert_i64_s_to_f32(pop_u64(stack)))),
        F32ConvertI64U => stack.push(Value::F32(conv::convert_i64_u_to_f32(pop_u64(stack)))),
        F32DemoteF64 => stack.push(Value::F32(conv::demote_f64_to_f32(pop_f64(stack)))),
        F64ConvertI32S => stack.push(Value::F64(conv::convert_i32_s_to_f64(pop_u32(stack)))),
        F64ConvertI32U => stack.push(Value::F64(conv::convert_i32_u_to_f64(pop_u32(stack)))),
        F64ConvertI64S => stack.push(Value::F64(conv::convert_i64_s_to_f64(pop_u64(stack)))),
        F64ConvertI64U => stack.push(Value::F64(conv::convert_i64_u_to_f64(pop_u64(stack)))),
        F64PromoteF32 => stack.push(Value::F64(conv::promote_f32_to_f64(pop_f32(stack)))),
        I32ReinterpretF32 => stack.push(Value::I32(conv::reinterpret_f32_to_i32(pop_f32(stack)) as i32)),
        I64ReinterpretF64 => stack.push(Value::I64(conv::reinterpret_f64_to_i64(pop_f64(stack)) as i64)),
        F32ReinterpretI32 => stack.push(Value::F32(conv::reinterpret_i32_to_f32(pop_u32(stack)))),
        F64ReinterpretI64 => stack.push(Value::F64(conv::reinterpret_i64_to_f64(pop_u64(stack)))),
    }
    Ok(Flow::Normal)
}
