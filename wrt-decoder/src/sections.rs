//! Per-section payload decoding.
//!
//! Each function here is handed a [`Reader`] scoped to exactly one section's
//! payload bytes (the caller has already consumed the section id and
//! length); the caller also checks that the reader is fully drained
//! afterwards, since a short or long payload is a `BAD_SECTION_SIZE` error,
//! not this module's concern.

use wrt_error::{codes, Error};
use wrt_format::module::{
    ConstExpr, CustomSection, DataSegment, ElementSegment, Export, ExportDesc, Global, Import,
    ImportDesc,
};
use wrt_format::types::{FuncType, GlobalType, Limits, MemType, TableType, ValueType};

use crate::instructions::parse_expr;
use crate::reader::Reader;

fn vector<T>(r: &mut Reader, mut one: impl FnMut(&mut Reader) -> Result<T, Error>) -> Result<Vec<T>, Error> {
    let count = r.u32()?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(one(r)?);
    }
    Ok(out)
}

fn limits(r: &mut Reader) -> Result<Limits, Error> {
    let pos = r.pos();
    let flag = r.byte()?;
    match flag {
        0x00 => Ok(Limits { min: r.u32()?, max: None }),
        0x01 => {
            let min = r.u32()?;
            let max = r.u32()?;
            Ok(Limits { min, max: Some(max) })
        }
        _ => Err(Error::decode(codes::DECODE_ERROR, "invalid limits flag", pos)),
    }
}

fn table_type(r: &mut Reader) -> Result<TableType, Error> {
    let pos = r.pos();
    let elem_type = r.byte()?;
    if elem_type != 0x70 {
        return Err(Error::decode(codes::DECODE_ERROR, "only funcref tables are supported", pos));
    }
    Ok(TableType { limits: limits(r)? })
}

fn global_type(r: &mut Reader) -> Result<GlobalType, Error> {
    let value_type = r.value_type()?;
    let pos = r.pos();
    let mutable = match r.byte()? {
        0x00 => false,
        0x01 => true,
        _ => return Err(Error::decode(codes::DECODE_ERROR, "invalid global mutability flag", pos)),
    };
    Ok(GlobalType { value_type, mutable })
}

/// `<const> end` or `global.get x, end`: the only expressions legal in
/// initializer position.
pub fn parse_const_expr(r: &mut Reader) -> Result<ConstExpr, Error> {
    let pos = r.pos();
    let opcode = r.byte()?;
    let expr = match opcode {
        0x41 => ConstExpr::I32Const(r.i32()?),
        0x42 => ConstExpr::I64Const(r.i64()?),
        0x43 => ConstExpr::F32Const(r.f32()?),
        0x44 => ConstExpr::F64Const(r.f64()?),
        0x23 => ConstExpr::GlobalGet(r.u32()?),
        _ => return Err(Error::decode(codes::BAD_CONST_EXPR, "invalid constant expression", pos)),
    };
    let end_pos = r.pos();
    if r.byte()? != 0x0B {
        return Err(Error::decode(codes::BAD_CONST_EXPR, "constant expression missing `end`", end_pos));
    }
    Ok(expr)
}

pub fn parse_type_section(r: &mut Reader) -> Result<Vec<FuncType>, Error> {
    vector(r, |r| {
        let pos = r.pos();
        if r.byte()? != 0x60 {
            return Err(Error::decode(codes::DECODE_ERROR, "function type must start with 0x60", pos));
        }
        let params = vector(r, Reader::value_type)?;
        let results = vector(r, Reader::value_type)?;
        if results.len() > 1 {
            return Err(Error::decode(
                codes::DECODE_ERROR,
                "function types may have at most one result",
                pos,
            ));
        }
        Ok(FuncType { params, results })
    })
}

pub fn parse_import_section(r: &mut Reader) -> Result<Vec<Import>, Error> {
    vector(r, |r| {
        let module = r.name()?;
        let name = r.name()?;
        let pos = r.pos();
        let desc = match r.byte()? {
            0x00 => ImportDesc::Func(r.u32()?),
            0x01 => ImportDesc::Table(table_type(r)?),
            0x02 => ImportDesc::Memory(MemType { limits: limits(r)? }),
            0x03 => ImportDesc::Global(global_type(r)?),
            _ => return Err(Error::decode(codes::DECODE_ERROR, "invalid import kind", pos)),
        };
        Ok(Import { module, name, desc })
    })
}

pub fn parse_function_section(r: &mut Reader) -> Result<Vec<u32>, Error> {
    vector(r, Reader::u32)
}

pub fn parse_table_section(r: &mut Reader) -> Result<Vec<TableType>, Error> {
    vector(r, table_type)
}

pub fn parse_memory_section(r: &mut Reader) -> Result<Vec<MemType>, Error> {
    vector(r, |r| Ok(MemType { limits: limits(r)? }))
}

pub fn parse_global_section(r: &mut Reader) -> Result<Vec<Global>, Error> {
    vector(r, |r| {
        let global_type = global_type(r)?;
        let init = parse_const_expr(r)?;
        Ok(Global { global_type, init })
    })
}

pub fn parse_export_section(r: &mut Reader) -> Result<Vec<Export>, Error> {
    vector(r, |r| {
        let name = r.name()?;
        let pos = r.pos();
        let desc = match r.byte()? {
            0x00 => ExportDesc::Func(r.u32()?),
            0x01 => ExportDesc::Table(r.u32()?),
            0x02 => ExportDesc::Memory(r.u32()?),
            0x03 => ExportDesc::Global(r.u32()?),
            _ => return Err(Error::decode(codes::DECODE_ERROR, "invalid export kind", pos)),
        };
        Ok(Export { name, desc })
    })
}

pub fn parse_start_section(r: &mut Reader) -> Result<u32, Error> {
    r.u32()
}

pub fn parse_element_section(r: &mut Reader) -> Result<Vec<ElementSegment>, Error> {
    vector(r, |r| {
        let table_idx = r.u32()?;
        let offset = parse_const_expr(r)?;
        let func_indices = vector(r, Reader::u32)?;
        Ok(ElementSegment { table_idx, offset, func_indices })
    })
}

pub fn parse_code_section(r: &mut Reader) -> Result<Vec<(Vec<ValueType>, Vec<wrt_format::Instruction>)>, Error> {
    vector(r, |r| {
        let body_size = r.u32()? as usize;
        let start = r.pos();
        let locals = vector(r, |r| {
            let run_count = r.u32()?;
            let value_type = r.value_type()?;
            Ok((run_count, value_type))
        })?;
        let mut expanded_locals = Vec::new();
        for (count, vt) in locals {
            for _ in 0..count {
                expanded_locals.push(vt);
            }
        }
        let body = parse_expr(r)?;
        let consumed = r.pos() - start;
        if consumed != body_size {
            return Err(Error::decode(
                codes::BAD_SECTION_SIZE,
                "code entry body size did not match bytes consumed",
                start,
            ));
        }
        Ok((expanded_locals, body))
    })
}

pub fn parse_data_section(r: &mut Reader) -> Result<Vec<DataSegment>, Error> {
    vector(r, |r| {
        let memory_idx = r.u32()?;
        let offset = parse_const_expr(r)?;
        let len = r.u32()? as usize;
        let bytes = r.take(len)?.to_vec();
        Ok(DataSegment { memory_idx, offset, bytes })
    })
}

pub fn parse_custom_section(r: &mut Reader, payload_len: usize) -> Result<CustomSection, Error> {
    let start = r.pos();
    let name = r.name()?;
    let consumed = r.pos() - start;
    let data = r.take(payload_len - consumed)?.to_vec();
    Ok(CustomSection { name, data })
}
