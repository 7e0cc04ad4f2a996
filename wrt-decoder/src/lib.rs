// WRT - wrt-decoder
// Module: WebAssembly Binary Decoder
//
// SPDX-License-Identifier: MIT

//! Decodes a WebAssembly 1.0 binary module into a [`wrt_format::Module`].
//!
//! This crate performs no type checking beyond what is needed to parse the
//! byte stream (arities implied by the binary encoding itself); whether the
//! resulting module is well-typed is `wrt-validator`'s job.

mod instructions;
mod reader;
mod sections;

use wrt_error::{codes, Error};
use wrt_format::module::{CustomSection, Function, Module};
use reader::Reader;

const MAGIC: [u8; 4] = *b"\0asm";
const VERSION: [u8; 4] = [1, 0, 0, 0];

/// Section ids in their required order; `0` (custom) may appear any number
/// of times between or around the others and is exempt from the ordering
/// check.
const SECTION_ORDER: [u8; 11] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Decode a complete binary module.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn decode(bytes: &[u8]) -> Result<Module, Error> {
    let mut r = Reader::new(bytes);

    let magic = r.take(4)?;
    if magic != MAGIC.as_slice() {
        return Err(Error::decode(codes::BAD_MAGIC, "missing `\\0asm` magic number", 0));
    }
    let version = r.take(4)?;
    if version != VERSION.as_slice() {
        return Err(Error::decode(codes::BAD_VERSION, "unsupported binary version", 4));
    }

    let mut module = Module::default();
    let mut function_type_indices: Vec<u32> = Vec::new();
    let mut code_entries: Vec<(Vec<wrt_format::types::ValueType>, Vec<wrt_format::Instruction>)> =
        Vec::new();
    let mut last_section_idx: Option<usize> = None;

    while !r.is_empty() {
        let section_pos = r.pos();
        let id = r.byte()?;
        let len = r.u32()? as usize;
        let payload_start = r.pos();
        let payload = r.take(len)?;
        let mut sr = Reader::new(payload);

        if id == 0 {
            let custom = sections::parse_custom_section(&mut sr, len)?;
            module.custom_sections.push(custom);
            continue;
        }

        let order_idx = SECTION_ORDER
            .iter()
            .position(|&s| s == id)
            .ok_or_else(|| Error::decode(codes::DECODE_ERROR, "unknown section id", section_pos))?;
        if let Some(last) = last_section_idx {
            if order_idx <= last {
                return Err(Error::decode(
                    codes::BAD_SECTION_ORDER,
                    "section appeared out of order",
                    section_pos,
                ));
            }
        }
        last_section_idx = Some(order_idx);

        match id {
            1 => module.types = sections::parse_type_section(&mut sr)?,
            2 => module.imports = sections::parse_import_section(&mut sr)?,
            3 => function_type_indices = sections::parse_function_section(&mut sr)?,
            4 => module.tables = sections::parse_table_section(&mut sr)?,
            5 => module.memories = sections::parse_memory_section(&mut sr)?,
            6 => module.globals = sections::parse_global_section(&mut sr)?,
            7 => module.exports = sections::parse_export_section(&mut sr)?,
            8 => module.start = Some(sections::parse_start_section(&mut sr)?),
            9 => module.elements = sections::parse_element_section(&mut sr)?,
            10 => code_entries = sections::parse_code_section(&mut sr)?,
            11 => module.data = sections::parse_data_section(&mut sr)?,
            _ => unreachable!("checked above"),
        }

        if !sr.is_empty() {
            return Err(Error::decode(
                codes::BAD_SECTION_SIZE,
                "section payload had trailing bytes",
                payload_start + sr.pos(),
            ));
        }
    }

    if function_type_indices.len() != code_entries.len() {
        return Err(Error::decode(
            codes::FUNC_CODE_MISMATCH,
            "function and code sections disagree on count",
            r.pos(),
        ));
    }
    module.functions = function_type_indices
        .into_iter()
        .zip(code_entries)
        .map(|(type_idx, (locals, body))| Function { type_idx, locals, body })
        .collect();

    Ok(module)
}

/// Find a custom section by name, if present.
pub fn custom_section<'a>(module: &'a Module, name: &str) -> Option<&'a CustomSection> {
    module.custom_sections.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(id: u8, payload: &[u8]) -> Vec<u8> {
        let mut out = vec![id];
        out.extend(wrt_format::leb128::write_u32(payload.len() as u32));
        out.extend_from_slice(payload);
        out
    }

    fn minimal_module(sections: &[Vec<u8>]) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&MAGIC);
        out.extend_from_slice(&VERSION);
        for s in sections {
            out.extend_from_slice(s);
        }
        out
    }

    #[test]
    fn decodes_empty_module() {
        let bytes = minimal_module(&[]);
        let module = decode(&bytes).unwrap();
        assert_eq!(module.types.len(), 0);
        assert_eq!(module.functions.len(), 0);
    }

    #[test]
    fn rejects_bad_magic() {
        let bytes = [0, 0, 0, 0, 1, 0, 0, 0];
        let err = decode(&bytes).unwrap_err();
        assert_eq!(err.code, codes::BAD_MAGIC);
    }

    #[test]
    fn rejects_bad_version() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&[2, 0, 0, 0]);
        let err = decode(&bytes).unwrap_err();
        assert_eq!(err.code, codes::BAD_VERSION);
    }

    #[test]
    fn decodes_function_returning_constant() {
        // (type (func (result i32))) (func (export "answer") (result i32) i32.const 42)
        let type_section = section(1, &[0x01, 0x60, 0x00, 0x01, 0x7F]);
        let func_section = section(3, &[0x01, 0x00]);
        let export_section = section(7, &[0x01, 0x06, b'a', b'n', b's', b'w', b'e', b'r', 0x00, 0x00]);
        let body = [0x41, 42, 0x0B]; // i32.const 42, end
        let mut code_payload = vec![0x01];
        code_payload.extend(wrt_format::leb128::write_u32(body.len() as u32 + 1));
        code_payload.push(0x00); // zero local-decl runs
        code_payload.extend_from_slice(&body);
        let code_section = section(10, &code_payload);

        let bytes = minimal_module(&[type_section, func_section, export_section, code_section]);
        let module = decode(&bytes).unwrap();

        assert_eq!(module.functions.len(), 1);
        assert_eq!(module.functions[0].type_idx, 0);
        assert_eq!(module.functions[0].body, vec![wrt_format::Instruction::I32Const(42)]);
        assert_eq!(module.exports[0].name, "answer");
    }

    #[test]
    fn rejects_out_of_order_sections() {
        let export_section = section(7, &[0x00]);
        let type_section = section(1, &[0x00]);
        let bytes = minimal_module(&[export_section, type_section]);
        let err = decode(&bytes).unwrap_err();
        assert_eq!(err.code, codes::BAD_SECTION_ORDER);
    }

    #[test]
    fn rejects_mismatched_function_code_counts() {
        let func_section = section(3, &[0x01, 0x00]);
        let bytes = minimal_module(&[func_section]);
        let err = decode(&bytes).unwrap_err();
        assert_eq!(err.code, codes::FUNC_CODE_MISMATCH);
    }

    #[test]
    fn custom_sections_may_interleave_without_affecting_order() {
        let custom1 = section(0, &[0x01, b'a', 1, 2, 3]);
        let type_section = section(1, &[0x00]);
        let custom2 = section(0, &[0x01, b'b', 4, 5]);
        let bytes = minimal_module(&[custom1, type_section, custom2]);
        let module = decode(&bytes).unwrap();
        assert_eq!(module.custom_sections.len(), 2);
        assert_eq!(module.custom_sections[0].name, "a");
        assert_eq!(module.custom_sections[1].name, "b");
    }
}
