//! LEB128 (Little-Endian Base 128) variable-length integer codec.
//!
//! Decoders are strict about the destination width: a value that would not
//! fit in the requested number of bits is rejected rather than silently
//! truncated, and a byte stream that runs past the maximum byte count for
//! that width is rejected as "too long". Encoders always produce the
//! shortest (canonical) form, so decoding is not required to reproduce the
//! exact input bytes for non-canonical encodings, only the same value.

use wrt_error::{codes, Error};

fn max_bytes(bits: u32) -> usize {
    ((bits + 6) / 7) as usize
}

fn read_unsigned(bytes: &[u8], pos: usize, bits: u32) -> Result<(u64, usize), Error> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    let mut offset = 0usize;
    let limit = max_bytes(bits);

    loop {
        let idx = pos + offset;
        let byte = *bytes
            .get(idx)
            .ok_or_else(|| Error::decode(codes::BAD_LEB128, "truncated LEB128 integer", idx))?;
        offset += 1;
        let low7 = byte & 0x7f;

        if shift < bits {
            result |= u64::from(low7) << shift;
        }

        if byte & 0x80 == 0 {
            let valid_in_byte = bits.saturating_sub(shift);
            let bad = if valid_in_byte == 0 {
                low7 != 0
            } else if valid_in_byte < 7 {
                (low7 >> valid_in_byte) != 0
            } else {
                false
            };
            if bad {
                return Err(Error::decode(
                    codes::BAD_LEB128,
                    "LEB128 value exceeds destination width",
                    idx,
                ));
            }
            return Ok((result, offset));
        }

        if shift >= bits && low7 != 0 {
            return Err(Error::decode(
                codes::BAD_LEB128,
                "LEB128 value exceeds destination width",
                idx,
            ));
        }
        shift += 7;
        if offset >= limit {
            return Err(Error::decode(codes::BAD_LEB128, "LEB128 integer too long", idx));
        }
    }
}

fn read_signed(bytes: &[u8], pos: usize, bits: u32) -> Result<(i64, usize), Error> {
    let mut result: i64 = 0;
    let mut shift: u32 = 0;
    let mut offset = 0usize;
    let limit = max_bytes(bits);

    loop {
        let idx = pos + offset;
        let byte = *bytes
            .get(idx)
            .ok_or_else(|| Error::decode(codes::BAD_LEB128, "truncated LEB128 integer", idx))?;
        offset += 1;
        let low7 = byte & 0x7f;
        let sign_bit_set = byte & 0x40 != 0;

        if shift < bits {
            result |= i64::from(low7) << shift;
        }

        if byte & 0x80 == 0 {
            let valid_in_byte = bits.saturating_sub(shift);
            if valid_in_byte == 0 {
                let expected = if sign_bit_set { 0x7f } else { 0x00 };
                if low7 != expected {
                    return Err(Error::decode(
                        codes::BAD_LEB128,
                        "LEB128 value exceeds destination width",
                        idx,
                    ));
                }
            } else {
                if shift + 7 < 64 && sign_bit_set {
                    result |= -1i64 << (shift + 7);
                }
                if valid_in_byte < 7 {
                    let mask = (!0u8 << valid_in_byte) & 0x7f;
                    let expected = if sign_bit_set { mask } else { 0 };
                    if low7 & mask != expected {
                        return Err(Error::decode(
                            codes::BAD_LEB128,
                            "LEB128 value exceeds destination width",
                            idx,
                        ));
                    }
                }
            }
            return Ok((result, offset));
        }
        shift += 7;
        if offset >= limit {
            return Err(Error::decode(codes::BAD_LEB128, "LEB128 integer too long", idx));
        }
    }
}

/// Decode an unsigned LEB128 value of at most 32 bits.
pub fn read_u32(bytes: &[u8], pos: usize) -> Result<(u32, usize), Error> {
    let (v, n) = read_unsigned(bytes, pos, 32)?;
    Ok((v as u32, n))
}

/// Decode an unsigned LEB128 value of at most 64 bits.
pub fn read_u64(bytes: &[u8], pos: usize) -> Result<(u64, usize), Error> {
    read_unsigned(bytes, pos, 64)
}

/// Decode a signed LEB128 value of at most 32 bits.
pub fn read_i32(bytes: &[u8], pos: usize) -> Result<(i32, usize), Error> {
    let (v, n) = read_signed(bytes, pos, 32)?;
    Ok((v as i32, n))
}

/// Decode a signed LEB128 value of at most 33 bits (used by block types).
pub fn read_i33(bytes: &[u8], pos: usize) -> Result<(i64, usize), Error> {
    read_signed(bytes, pos, 33)
}

/// Decode a signed LEB128 value of at most 64 bits.
pub fn read_i64(bytes: &[u8], pos: usize) -> Result<(i64, usize), Error> {
    read_signed(bytes, pos, 64)
}

/// Encode an unsigned value in the shortest (canonical) LEB128 form.
pub fn write_u64(value: u64) -> Vec<u8> {
    let mut out = Vec::new();
    let mut value = value;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// As [`write_u64`], for a 32-bit value.
pub fn write_u32(value: u32) -> Vec<u8> {
    write_u64(u64::from(value))
}

/// Encode a signed value in the shortest (canonical) LEB128 form.
pub fn write_i64(value: i64) -> Vec<u8> {
    let mut out = Vec::new();
    let mut value = value;
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        let sign_bit_set = byte & 0x40 != 0;
        if (value == 0 && !sign_bit_set) || (value == -1 && sign_bit_set) {
            out.push(byte);
            return out;
        }
        out.push(byte | 0x80);
    }
}

/// As [`write_i64`], for a 32-bit value.
pub fn write_i32(value: i32) -> Vec<u8> {
    write_i64(i64::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_u32() {
        for v in [0u32, 1, 127, 128, 300, u32::MAX] {
            let bytes = write_u32(v);
            let (decoded, used) = read_u32(&bytes, 0).unwrap();
            assert_eq!(decoded, v);
            assert_eq!(used, bytes.len());
        }
    }

    #[test]
    fn roundtrip_i32() {
        for v in [0i32, -1, 63, -64, 64, -65, i32::MIN, i32::MAX] {
            let bytes = write_i32(v);
            let (decoded, used) = read_i32(&bytes, 0).unwrap();
            assert_eq!(decoded, v);
            assert_eq!(used, bytes.len());
        }
    }

    #[test]
    fn non_canonical_encoding_still_decodes() {
        // 0x80 0x80 0x00 is a non-minimal 3-byte encoding of 0.
        let (v, n) = read_u32(&[0x80, 0x80, 0x00], 0).unwrap();
        assert_eq!(v, 0);
        assert_eq!(n, 3);
    }

    #[test]
    fn truncated_continuation_fails() {
        let err = read_u32(&[0x80], 0).unwrap_err();
        assert_eq!(err.code, codes::BAD_LEB128);
    }

    #[test]
    fn value_exceeding_width_fails() {
        // 5 bytes, all with continuation and high bits set: encodes a value
        // that needs more than 32 bits.
        let err = read_u32(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01], 0).unwrap_err();
        assert_eq!(err.code, codes::BAD_LEB128);
    }

    #[test]
    fn signed_sign_extends_correctly() {
        // -1 encoded as a single byte 0x7f.
        let (v, n) = read_i32(&[0x7f], 0).unwrap();
        assert_eq!(v, -1);
        assert_eq!(n, 1);
    }

    proptest::proptest! {
        #[test]
        fn u32_roundtrips_for_any_value(v: u32) {
            let bytes = write_u32(v);
            let (decoded, used) = read_u32(&bytes, 0).unwrap();
            proptest::prop_assert_eq!(decoded, v);
            proptest::prop_assert_eq!(used, bytes.len());
        }

        #[test]
        fn i32_roundtrips_for_any_value(v: i32) {
            let bytes = write_i32(v);
            let (decoded, used) = read_i32(&bytes, 0).unwrap();
            proptest::prop_assert_eq!(decoded, v);
            proptest::prop_assert_eq!(used, bytes.len());
        }

        #[test]
        fn u64_roundtrips_for_any_value(v: u64) {
            let bytes = write_u64(v);
            let (decoded, used) = read_u64(&bytes, 0).unwrap();
            proptest::prop_assert_eq!(decoded, v);
            proptest::prop_assert_eq!(used, bytes.len());
        }

        #[test]
        fn i64_roundtrips_for_any_value(v: i64) {
            let bytes = write_i64(v);
            let (decoded, used) = read_i64(&bytes, 0).unwrap();
            proptest::prop_assert_eq!(decoded, v);
            proptest::prop_assert_eq!(used, bytes.len());
        }
    }
}
