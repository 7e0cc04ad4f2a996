//! Stack signatures for instructions whose type-checking is "pop these,
//! push that" with no control-flow or index-resolution involved: constants,
//! comparisons, and the arithmetic/conversion operator sets.
//!
//! Everything else (control flow, locals, globals, memory, calls,
//! `drop`/`select`) needs context the signature alone can't express and is
//! handled directly in [`crate::validate_function`].

use wrt_format::types::ValueType::{self, F32, F64, I32, I64};
use wrt_format::Instruction::{self, *};

/// `(operands, result)` for a "simple" instruction, or `None` if the
/// instruction needs special-cased handling.
pub fn signature(instr: &Instruction) -> Option<(&'static [ValueType], Option<ValueType>)> {
    const fn one(a: ValueType, r: ValueType) -> (&'static [ValueType], Option<ValueType>) {
        (match a {
            I32 => &[I32],
            I64 => &[I64],
            F32 => &[F32],
            F64 => &[F64],
        }, Some(r))
    }
    const fn two(a: ValueType, r: ValueType) -> (&'static [ValueType], Option<ValueType>) {
        (match a {
            I32 => &[I32, I32],
            I64 => &[I64, I64],
            F32 => &[F32, F32],
            F64 => &[F64, F64],
        }, Some(r))
    }

    Some(match instr {
        I32Const(_) => (&[], Some(I32)),
        I64Const(_) => (&[], Some(I64)),
        F32Const(_) => (&[], Some(F32)),
        F64Const(_) => (&[], Some(F64)),

        I32Eqz => one(I32, I32),
        I32Eq | I32Ne | I32LtS | I32LtU | I32GtS | I32GtU | I32LeS | I32LeU | I32GeS | I32GeU => {
            two(I32, I32)
        }
        I64Eqz => (&[I64], Some(I32)),
        I64Eq | I64Ne | I64LtS | I64LtU | I64GtS | I64GtU | I64LeS | I64LeU | I64GeS | I64GeU => {
            (&[I64, I64], Some(I32))
        }
        F32Eq | F32Ne | F32Lt | F32Gt | F32Le | F32Ge => (&[F32, F32], Some(I32)),
        F64Eq | F64Ne | F64Lt | F64Gt | F64Le | F64Ge => (&[F64, F64], Some(I32)),

        I32Clz | I32Ctz | I32Popcnt => one(I32, I32),
        I32Add | I32Sub | I32Mul | I32DivS | I32DivU | I32RemS | I32RemU | I32And | I32Or
        | I32Xor | I32Shl | I32ShrS | I32ShrU | I32Rotl | I32Rotr => two(I32, I32),

        I64Clz | I64Ctz | I64Popcnt => one(I64, I64),
        I64Add | I64Sub | I64Mul | I64DivS | I64DivU | I64RemS | I64RemU | I64And | I64Or
        | I64Xor | I64Shl | I64ShrS | I64ShrU | I64Rotl | I64Rotr => two(I64, I64),

        F32Abs | F32Neg | F32Ceil | F32Floor | F32Trunc | F32Nearest | F32Sqrt => one(F32, F32),
        F32Add | F32Sub | F32Mul | F32Div | F32Min | F32Max | F32Copysign => two(F32, F32),

        F64Abs | F64Neg | F64Ceil | F64Floor | F64Trunc | F64Nearest | F64Sqrt => one(F64, F64),
        F64Add | F64Sub | F64Mul | F64Div | F64Min | F64Max | F64Copysign => two(F64, F64),

        I32WrapI64 => (&[I64], Some(I32)),
        I32TruncF32S | I32TruncF32U => (&[F32], Some(I32)),
        I32TruncF64S | I32TruncF64U => (&[F64], Some(I32)),
        I64ExtendI32S | I64ExtendI32U => (&[I32], Some(I64)),
        I64TruncF32S | I64TruncF32U => (&[F32], Some(I64)),
        I64TruncF64S | I64TruncF64U => (&[F64], Some(I64)),
        F32ConvertI32S | F32ConvertI32U => (&[I32], Some(F32)),
        F32ConvertI64S | F32ConvertI64U => (&[I64], Some(F32)),
        F32DemoteF64 => (&[F64], Some(F32)),
        F64ConvertI32S | F64ConvertI32U => (&[I32], Some(F64)),
        F64ConvertI64S | F64ConvertI64U => (&[I64], Some(F64)),
        F64PromoteF32 => (&[F32], Some(F64)),
        I32ReinterpretF32 => (&[F32], Some(I32)),
        I64ReinterpretF64 => (&[F64], Some(I64)),
        F32ReinterpretI32 => (&[I32], Some(F32)),
        F64ReinterpretI64 => (&[I64], Some(F64)),

        _ => return None,
    })
}
