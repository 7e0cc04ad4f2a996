//! Instruction decoding.
//!
//! `block`/`loop`/`if` are structured: each owns the nested instruction
//! sequence it delimits, so decoding is a recursive descent rather than a
//! flat scan with jump targets. `end` (0x0B) always terminates the
//! innermost construct; `else` (0x05) additionally terminates an `if`'s
//! "then" arm.

use wrt_error::{codes, Error};
use wrt_format::{Instruction, MemArg};

use crate::reader::Reader;

const OP_ELSE: u8 = 0x05;
const OP_END: u8 = 0x0B;

/// Decode a function body: instructions up to and including the closing
/// `end`, which is consumed but not represented in the result.
pub fn parse_expr(r: &mut Reader) -> Result<Vec<Instruction>, Error> {
    let (body, _stop) = parse_until(r, &[OP_END])?;
    Ok(body)
}

fn parse_until(r: &mut Reader, stop_on: &[u8]) -> Result<(Vec<Instruction>, u8), Error> {
    let mut out = Vec::new();
    loop {
        let pos = r.pos();
        let opcode = r.byte()?;
        if stop_on.contains(&opcode) {
            return Ok((out, opcode));
        }
        if opcode == OP_ELSE || opcode == OP_END {
            return Err(Error::decode(
                codes::DECODE_ERROR,
                "unexpected else/end outside its construct",
                pos,
            ));
        }
        out.push(parse_one(r, pos, opcode)?);
    }
}

fn mem_arg(r: &mut Reader) -> Result<MemArg, Error> {
    let align = r.u32()?;
    let offset = r.u32()?;
    Ok(MemArg { align, offset })
}

fn parse_one(r: &mut Reader, pos: usize, opcode: u8) -> Result<Instruction, Error> {
    use Instruction::*;

    Ok(match opcode {
        0x00 => Unreachable,
        0x01 => Nop,
        0x02 => {
            let block_type = r.block_type()?;
            let body = parse_expr(r)?;
            Block { block_type, body }
        }
        0x03 => {
            let block_type = r.block_type()?;
            let body = parse_expr(r)?;
            Loop { block_type, body }
        }
        0x04 => {
            let block_type = r.block_type()?;
            let (then_body, stop) = parse_until(r, &[OP_END, OP_ELSE])?;
            let else_body = if stop == OP_ELSE { Some(parse_expr(r)?) } else { None };
            If { block_type, then_body, else_body }
        }
        0x0C => Br(r.u32()?),
        0x0D => BrIf(r.u32()?),
        0x0E => {
            let count = r.u32()?;
            let mut labels = Vec::with_capacity(count as usize);
            for _ in 0..count {
                labels.push(r.u32()?);
            }
            let default = r.u32()?;
            BrTable { labels, default }
        }
        0x0F => Return,
        0x10 => Call(r.u32()?),
        0x11 => {
            let type_idx = r.u32()?;
            r.reserved_zero_byte()?;
            CallIndirect { type_idx }
        }

        0x1A => Drop,
        0x1B => Select,

        0x20 => LocalGet(r.u32()?),
        0x21 => LocalSet(r.u32()?),
        0x22 => LocalTee(r.u32()?),
        0x23 => GlobalGet(r.u32()?),
        0x24 => GlobalSet(r.u32()?),

        0x28 => I32Load(mem_arg(r)?),
        0x29 => I64Load(mem_arg(r)?),
        0x2A => F32Load(mem_arg(r)?),
        0x2B => F64Load(mem_arg(r)?),
        0x2C => I32Load8S(mem_arg(r)?),
        0x2D => I32Load8U(mem_arg(r)?),
        0x2E => I32Load16S(mem_arg(r)?),
        0x2F => I32Load16U(mem_arg(r)?),
        0x30 => I64Load8S(mem_arg(r)?),
        0x31 => I64Load8U(mem_arg(r)?),
        0x32 => I64Load16S(mem_arg(r)?),
        0x33 => I64Load16U(mem_arg(r)?),
        0x34 => I64Load32S(mem_arg(r)?),
        0x35 => I64Load32U(mem_arg(r)?),
        0x36 => I32Store(mem_arg(r)?),
        0x37 => I64Store(mem_arg(r)?),
        0x38 => F32Store(mem_arg(r)?),
        0x39 => F64Store(mem_arg(r)?),
        0x3A => I32Store8(mem_arg(r)?),
        0x3B => I32Store16(mem_arg(r)?),
        0x3C => I64Store8(mem_arg(r)?),
        0x3D => I64Store16(mem_arg(r)?),
        0x3E => I64Store32(mem_arg(r)?),
        0x3F => {
            r.reserved_zero_byte()?;
            MemorySize
        }
        0x40 => {
            r.reserved_zero_byte()?;
            MemoryGrow
        }

        0x41 => I32Const(r.i32()?),
        0x42 => I64Const(r.i64()?),
        0x43 => F32Const(r.f32()?),
        0x44 => F64Const(r.f64()?),

        0x45 => I32Eqz,
        0x46 => I32Eq,
        0x47 => I32Ne,
        0x48 => I32LtS,
        0x49 => I32LtU,
        0x4A => I32GtS,
        0x4B => I32GtU,
        0x4C => I32LeS,
        0x4D => I32LeU,
        0x4E => I32GeS,
        0x4F => I32GeU,
        0x50 => I64Eqz,
        0x51 => I64Eq,
        0x52 => I64Ne,
        0x53 => I64LtS,
        0x54 => I64LtU,
        0x55 => I64GtS,
        0x56 => I64GtU,
        0x57 => I64LeS,
        0x58 => I64LeU,
        0x59 => I64GeS,
        0x5A => I64GeU,
        0x5B => F32Eq,
        0x5C => F32Ne,
        0x5D => F32Lt,
        0x5E => F32Gt,
        0x5F => F32Le,
        0x60 => F32Ge,
        0x61 => F64Eq,
        0x62 => F64Ne,
        0x63 => F64Lt,
        0x64 => F64Gt,
        0x65 => F64Le,
        0x66 => F64Ge,

        0x67 => I32Clz,
        0x68 => I32Ctz,
        0x69 => I32Popcnt,
        0x6A => I32Add,
        0x6B => I32Sub,
        0x6C => I32Mul,
        0x6D => I32DivS,
        0x6E => I32DivU,
        0x6F => I32RemS,
        0x70 => I32RemU,
        0x71 => I32And,
        0x72 => I32Or,
        0x73 => I32Xor,
        0x74 => I32Shl,
        0x75 => I32ShrS,
        0x76 => I32ShrU,
        0x77 => I32Rotl,
        0x78 => I32Rotr,

        0x79 => I64Clz,
        0x7A => I64Ctz,
        0x7B => I64Popcnt,
        0x7C => I64Add,
        0x7D => I64Sub,
        0x7E => I64Mul,
        0x7F => I64DivS,
        0x80 => I64DivU,
        0x81 => I64RemS,
        0x82 => I64RemU,
        0x83 => I64And,
        0x84 => I64Or,
        0x85 => I64Xor,
        0x86 => I64Shl,
        0x87 => I64ShrS,
        0x88 => I64ShrU,
        0x89 => I64Rotl,
        0x8A => I64Rotr,

        0x8B => F32Abs,
        0x8C => F32Neg,
        0x8D => F32Ceil,
        0x8E => F32Floor,
        0x8F => F32Trunc,
        0x90 => F32Nearest,
        0x91 => F32Sqrt,
        0x92 => F32Add,
        0x93 => F32Sub,
        0x94 => F32Mul,
        0x95 => F32Div,
        0x96 => F32Min,
        0x97 => F32Max,
        0x98 => F32Copysign,

        0x99 => F64Abs,
        0x9A => F64Neg,
        0x9B => F64Ceil,
        0x9C => F64Floor,
        0x9D => F64Trunc,
        0x9E => F64Nearest,
        0x9F => F64Sqrt,
        0xA0 => F64Add,
        0xA1 => F64Sub,
        0xA2 => F64Mul,
        0xA3 => F64Div,
        0xA4 => F64Min,
        0xA5 => F64Max,
        0xA6 => F64Copysign,

        0xA7 => I32WrapI64,
        0xA8 => I32TruncF32S,
        0xA9 => I32TruncF32U,
        0xAA => I32TruncF64S,
        0xAB => I32TruncF64U,
        0xAC => I64ExtendI32S,
        0xAD => I64ExtendI32U,
        0xAE => I64TruncF32S,
        0xAF => I64TruncF32U,
        0xB0 => I64TruncF64S,
        0xB1 => I64TruncF64U,
        0xB2 => F32ConvertI32S,
        0xB3 => F32ConvertI32U,
        0xB4 => F32ConvertI64S,
        0xB5 => F32ConvertI64U,
        0xB6 => F32DemoteF64,
        0xB7 => F64ConvertI32S,
        0xB8 => F64ConvertI32U,
        0xB9 => F64ConvertI64S,
        0xBA => F64ConvertI64U,
        0xBB => F64PromoteF32,
        0xBC => I32ReinterpretF32,
        0xBD => I64ReinterpretF64,
        0xBE => F32ReinterpretI32,
        0xBF => F64ReinterpretI64,

        _ => {
            return Err(Error::decode(
                codes::UNKNOWN_OPCODE,
                format!("unknown opcode 0x{opcode:02x}"),
                pos,
            ))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_flat_sequence() {
        // i32.const 1, i32.const 2, i32.add, end
        let bytes = [0x41, 0x01, 0x41, 0x02, 0x6A, OP_END];
        let mut r = Reader::new(&bytes);
        let body = parse_expr(&mut r).unwrap();
        assert_eq!(body, vec![Instruction::I32Const(1), Instruction::I32Const(2), Instruction::I32Add]);
    }

    #[test]
    fn decodes_nested_if_else() {
        // i32.const 1, if (empty) i32.const 2 else i32.const 3 end, end
        let bytes = [
            0x41, 0x01, 0x04, 0x40, 0x41, 0x02, OP_ELSE, 0x41, 0x03, OP_END, OP_END,
        ];
        let mut r = Reader::new(&bytes);
        let body = parse_expr(&mut r).unwrap();
        assert_eq!(body.len(), 2);
        match &body[1] {
            Instruction::If { then_body, else_body, .. } => {
                assert_eq!(then_body, &vec![Instruction::I32Const(2)]);
                assert_eq!(else_body, &Some(vec![Instruction::I32Const(3)]));
            }
            other => panic!("expected If, got {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_opcode() {
        let bytes = [0xFC, OP_END];
        let mut r = Reader::new(&bytes);
        let err = parse_expr(&mut r).unwrap_err();
        assert_eq!(err.code, codes::UNKNOWN_OPCODE);
    }

    #[test]
    fn call_indirect_requires_zero_reserved_byte() {
        let bytes = [0x11, 0x00, 0x01, OP_END];
        let mut r = Reader::new(&bytes);
        assert!(parse_expr(&mut r).is_err());
    }
}
