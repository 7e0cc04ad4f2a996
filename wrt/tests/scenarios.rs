//! End-to-end scenarios built directly from `wrt_format::module::Module`
//! trees, skipping the binary encoder: the decoder already has its own
//! round-trip tests, so these exercise validation and execution, which is
//! where the interesting behavior lives.

use wrt_format::instruction::Instruction;
use wrt_format::instruction::MemArg;
use wrt_format::module::{ConstExpr, ElementSegment, Export, ExportDesc, Function, Global, Import, ImportDesc, Module};
use wrt_format::types::{BlockType, FuncType, GlobalType, Limits, MemType, TableType, ValueType};
use wrt::{validate, Engine, Value};

fn export(module: &mut Module, name: &str, func_idx: u32) {
    module.exports.push(Export { name: name.to_string(), desc: ExportDesc::Func(func_idx) });
}

#[test]
fn trivial_add() {
    let mut module = Module::default();
    module.types.push(FuncType { params: vec![ValueType::I32, ValueType::I32], results: vec![ValueType::I32] });
    module.functions.push(Function {
        type_idx: 0,
        locals: vec![],
        body: vec![Instruction::LocalGet(0), Instruction::LocalGet(1), Instruction::I32Add],
    });
    export(&mut module, "add", 0);

    validate(&module).expect("module is well typed");
    let mut engine = Engine::new();
    let instance = engine.instantiate(&module, &[]).expect("no imports to satisfy");

    assert_eq!(engine.invoke(&instance, "add", &[Value::I32(7), Value::I32(35)]).unwrap(), vec![Value::I32(42)]);
    assert_eq!(
        engine.invoke(&instance, "add", &[Value::I32(-1), Value::I32(1)]).unwrap(),
        vec![Value::I32(0)],
        "wraps on overflow instead of panicking"
    );
}

#[test]
fn loop_thunk_calls_a_nested_function_n_times() {
    let mut module = Module::default();
    // type 0: () -> (), type 1: (i32) -> ()
    module.types.push(FuncType { params: vec![], results: vec![] });
    module.types.push(FuncType { params: vec![ValueType::I32], results: vec![] });

    // func 0: thunk, a no-op.
    module.functions.push(Function { type_idx: 0, locals: vec![], body: vec![] });

    // func 1: call_thunk(n) { loop { if n == 0 { return } call thunk; n -= 1; br loop } }
    // Expressed with a `loop` that branches back to itself while the
    // counter local is nonzero, falling through once it reaches zero.
    let body = vec![Instruction::Loop {
        block_type: BlockType::Empty,
        body: vec![
            Instruction::LocalGet(0),
            Instruction::I32Eqz,
            Instruction::If { block_type: BlockType::Empty, then_body: vec![], else_body: Some(vec![
                Instruction::Call(0),
                Instruction::LocalGet(0),
                Instruction::I32Const(1),
                Instruction::I32Sub,
                Instruction::LocalSet(0),
                Instruction::Br(1),
            ]) },
        ],
    }];
    module.functions.push(Function { type_idx: 1, locals: vec![], body });
    export(&mut module, "call_thunk", 1);

    validate(&module).expect("module is well typed");
    let mut engine = Engine::new();
    let instance = engine.instantiate(&module, &[]).unwrap();

    assert_eq!(engine.invoke(&instance, "call_thunk", &[Value::I32(1000)]).unwrap(), Vec::<Value>::new());
    assert_eq!(engine.invoke(&instance, "call_thunk", &[Value::I32(0)]).unwrap(), Vec::<Value>::new());
}

#[test]
fn unreachable_traps() {
    let mut module = Module::default();
    module.types.push(FuncType { params: vec![], results: vec![] });
    module.functions.push(Function { type_idx: 0, locals: vec![], body: vec![Instruction::Unreachable] });
    export(&mut module, "boom", 0);

    validate(&module).unwrap();
    let mut engine = Engine::new();
    let instance = engine.instantiate(&module, &[]).unwrap();

    let err = engine.invoke(&instance, "boom", &[]).unwrap_err();
    assert_eq!(err.message, "unreachable");
}

#[test]
fn division_traps() {
    let mut module = Module::default();
    module.types.push(FuncType { params: vec![ValueType::I32, ValueType::I32], results: vec![ValueType::I32] });
    module.functions.push(Function {
        type_idx: 0,
        locals: vec![],
        body: vec![Instruction::LocalGet(0), Instruction::LocalGet(1), Instruction::I32DivS],
    });
    export(&mut module, "div_s", 0);

    validate(&module).unwrap();
    let mut engine = Engine::new();
    let instance = engine.instantiate(&module, &[]).unwrap();

    let overflow = engine.invoke(&instance, "div_s", &[Value::I32(i32::MIN), Value::I32(-1)]).unwrap_err();
    assert_eq!(overflow.message, "integer overflow");

    let div_by_zero = engine.invoke(&instance, "div_s", &[Value::I32(10), Value::I32(0)]).unwrap_err();
    assert_eq!(div_by_zero.message, "integer divide by zero");
}

#[test]
fn memory_growth_and_bounds() {
    let mut module = Module::default();
    module.types.push(FuncType { params: vec![ValueType::I32], results: vec![ValueType::I32] });
    module.types.push(FuncType { params: vec![], results: vec![ValueType::I32] });
    module.types.push(FuncType { params: vec![ValueType::I32, ValueType::I32], results: vec![] });
    module.memories.push(MemType { limits: Limits { min: 1, max: None } });

    module.functions.push(Function { type_idx: 0, locals: vec![], body: vec![Instruction::LocalGet(0), Instruction::MemoryGrow] });
    module.functions.push(Function { type_idx: 1, locals: vec![], body: vec![Instruction::MemorySize] });
    module.functions.push(Function {
        type_idx: 2,
        locals: vec![],
        body: vec![
            Instruction::LocalGet(0),
            Instruction::LocalGet(1),
            Instruction::I32Store8(MemArg { align: 0, offset: 0 }),
        ],
    });
    export(&mut module, "grow", 0);
    export(&mut module, "size", 1);
    export(&mut module, "store8", 2);

    validate(&module).unwrap();
    let mut engine = Engine::new();
    let instance = engine.instantiate(&module, &[]).unwrap();

    assert_eq!(engine.invoke(&instance, "grow", &[Value::I32(2)]).unwrap(), vec![Value::I32(1)]);
    assert_eq!(engine.invoke(&instance, "size", &[]).unwrap(), vec![Value::I32(3)]);
    assert_eq!(engine.memory_size(&instance, "store8").unwrap_err().message.contains("not a memory"), true);

    let last_byte = 3 * 65536 - 4;
    engine.invoke(&instance, "store8", &[Value::I32(last_byte as i32), Value::I32(0xAB)]).unwrap();

    let one_past = 3 * 65536 - 3;
    let trap = engine.invoke(&instance, "store8", &[Value::I32(one_past as i32), Value::I32(0xAB)]).unwrap_err();
    assert_eq!(trap.message, "out of bounds memory access");
}

#[test]
fn call_indirect_dispatches_and_traps() {
    let mut module = Module::default();
    module.types.push(FuncType { params: vec![], results: vec![ValueType::I32] }); // type 0: () -> i32
    module.types.push(FuncType { params: vec![ValueType::I32], results: vec![ValueType::I32] }); // type 1: (i32) -> i32
    module.tables.push(TableType { limits: Limits { min: 4, max: Some(4) } });

    module.functions.push(Function { type_idx: 0, locals: vec![], body: vec![Instruction::I32Const(99)] });
    module.functions.push(Function {
        type_idx: 1,
        locals: vec![],
        body: vec![Instruction::LocalGet(0), Instruction::CallIndirect { type_idx: 0 }],
    });
    export(&mut module, "dispatch", 1);

    module.elements.push(ElementSegment { table_idx: 0, offset: ConstExpr::I32Const(0), func_indices: vec![0] });

    validate(&module).unwrap();
    let mut engine = Engine::new();
    let instance = engine.instantiate(&module, &[]).unwrap();

    assert_eq!(engine.invoke(&instance, "dispatch", &[Value::I32(0)]).unwrap(), vec![Value::I32(99)]);

    let uninit = engine.invoke(&instance, "dispatch", &[Value::I32(1)]).unwrap_err();
    assert_eq!(uninit.message, "uninitialized element");

    let oob = engine.invoke(&instance, "dispatch", &[Value::I32(4)]).unwrap_err();
    assert_eq!(oob.message, "out of bounds table access");
}

#[test]
fn mutable_global_round_trips_through_set_and_get() {
    let mut module = Module::default();
    module.types.push(FuncType { params: vec![ValueType::I32], results: vec![] });
    module.types.push(FuncType { params: vec![], results: vec![ValueType::I32] });
    module.globals.push(Global { global_type: GlobalType { value_type: ValueType::I32, mutable: true }, init: ConstExpr::I32Const(10) });

    module.functions.push(Function { type_idx: 0, locals: vec![], body: vec![Instruction::LocalGet(0), Instruction::GlobalSet(0)] });
    module.functions.push(Function { type_idx: 1, locals: vec![], body: vec![Instruction::GlobalGet(0)] });
    export(&mut module, "set", 0);
    export(&mut module, "get", 1);

    validate(&module).unwrap();
    let mut engine = Engine::new();
    let instance = engine.instantiate(&module, &[]).unwrap();

    assert_eq!(engine.invoke(&instance, "get", &[]).unwrap(), vec![Value::I32(10)]);
    engine.invoke(&instance, "set", &[Value::I32(77)]).unwrap();
    assert_eq!(engine.invoke(&instance, "get", &[]).unwrap(), vec![Value::I32(77)]);
}

#[test]
fn registered_module_satisfies_a_later_modules_import() {
    let mut provider = Module::default();
    provider.types.push(FuncType { params: vec![ValueType::I32], results: vec![ValueType::I32] });
    provider.functions.push(Function {
        type_idx: 0,
        locals: vec![],
        body: vec![Instruction::LocalGet(0), Instruction::I32Const(1), Instruction::I32Add],
    });
    export(&mut provider, "inc", 0);

    let mut consumer = Module::default();
    consumer.types.push(FuncType { params: vec![ValueType::I32], results: vec![ValueType::I32] });
    consumer.imports.push(Import { module: "env".into(), name: "inc".into(), desc: ImportDesc::Func(0) });
    consumer.functions.push(Function {
        type_idx: 0,
        locals: vec![],
        body: vec![Instruction::LocalGet(0), Instruction::Call(0)],
    });
    export(&mut consumer, "twice_inc_once", 1);

    validate(&provider).unwrap();
    validate(&consumer).unwrap();

    let mut engine = Engine::new();
    let provider_instance = engine.instantiate(&provider, &[]).unwrap();
    engine.register("env", &provider_instance);

    let consumer_instance = engine.instantiate(&consumer, &[]).expect("import resolved via register");
    assert_eq!(engine.invoke(&consumer_instance, "twice_inc_once", &[Value::I32(41)]).unwrap(), vec![Value::I32(42)]);
}
