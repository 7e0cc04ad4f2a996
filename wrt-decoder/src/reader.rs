//! A cursor over a byte slice with the primitive reads the binary format
//! needs: raw bytes, LEB128 integers, names, and the fixed-width encodings
//! used by floating-point constants.

use wrt_error::{codes, Error};
use wrt_format::leb128;
use wrt_format::types::{BlockType, ValueType};

pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn byte(&mut self) -> Result<u8, Error> {
        let b = *self
            .bytes
            .get(self.pos)
            .ok_or_else(|| Error::decode(codes::DECODE_ERROR, "unexpected end of input", self.pos))?;
        self.pos += 1;
        Ok(b)
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], Error> {
        if self.remaining() < n {
            return Err(Error::decode(codes::DECODE_ERROR, "unexpected end of input", self.pos));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn u32(&mut self) -> Result<u32, Error> {
        let (v, n) = leb128::read_u32(self.bytes, self.pos)?;
        self.pos += n;
        Ok(v)
    }

    pub fn u64(&mut self) -> Result<u64, Error> {
        let (v, n) = leb128::read_u64(self.bytes, self.pos)?;
        self.pos += n;
        Ok(v)
    }

    pub fn i32(&mut self) -> Result<i32, Error> {
        let (v, n) = leb128::read_i32(self.bytes, self.pos)?;
        self.pos += n;
        Ok(v)
    }

    pub fn i64(&mut self) -> Result<i64, Error> {
        let (v, n) = leb128::read_i64(self.bytes, self.pos)?;
        self.pos += n;
        Ok(v)
    }

    pub fn f32(&mut self) -> Result<f32, Error> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn f64(&mut self) -> Result<f64, Error> {
        let bytes = self.take(8)?;
        Ok(f64::from_le_bytes(bytes.try_into().unwrap()))
    }

    pub fn name(&mut self) -> Result<String, Error> {
        let len = self.u32()? as usize;
        let start = self.pos;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| Error::decode(codes::BAD_UTF8, "name is not valid UTF-8", start))
    }

    pub fn value_type(&mut self) -> Result<ValueType, Error> {
        let pos = self.pos;
        let byte = self.byte()?;
        ValueType::from_byte(byte)
            .ok_or_else(|| Error::decode(codes::DECODE_ERROR, "invalid value type", pos))
    }

    /// Wasm 1.0 block types are a single byte: `0x40` for empty, or a value
    /// type byte for a single result. The multi-value proposal's signed
    /// 33-bit type-index encoding is out of scope.
    pub fn block_type(&mut self) -> Result<BlockType, Error> {
        let pos = self.pos;
        let byte = self.byte()?;
        if byte == 0x40 {
            return Ok(BlockType::Empty);
        }
        let vt = ValueType::from_byte(byte)
            .ok_or_else(|| Error::decode(codes::DECODE_ERROR, "invalid block type", pos))?;
        Ok(BlockType::Value(vt))
    }

    /// Read the fixed `0x00` byte reserved for future table/memory indices
    /// in `memory.size`, `memory.grow`, and `call_indirect`.
    pub fn reserved_zero_byte(&mut self) -> Result<(), Error> {
        let pos = self.pos;
        let byte = self.byte()?;
        if byte != 0x00 {
            return Err(Error::decode(codes::DECODE_ERROR, "reserved byte must be zero", pos));
        }
        Ok(())
    }
}
