//! Conversions between the four value types: wrapping, extension,
//! truncation, convert-to-float, demote/promote, and bit reinterpretation.

use wrt_error::{Error, TrapKind};

/// `i64` to `i32`, keeping the low 32 bits.
pub fn wrap_i64_to_i32(a: u64) -> u32 {
    a as u32
}

/// `i32` to `i64`, sign-extending.
pub fn extend_i32_s_to_i64(a: u32) -> u64 {
    (a as i32) as i64 as u64
}

/// `i32` to `i64`, zero-extending.
pub fn extend_i32_u_to_i64(a: u32) -> u64 {
    a as u64
}

fn trap_on_nan(v: f64) -> Result<(), Error> {
    if v.is_nan() {
        return Err(Error::trap(TrapKind::InvalidConversionToInteger));
    }
    Ok(())
}

/// Truncate a float toward zero into a signed 32-bit integer; traps on
/// NaN, infinity, or a magnitude that doesn't fit.
///
/// The low bound is checked one past `i32::MIN` (exclusive, via `<=`):
/// trunc-toward-zero of anything in `(-2147483649.0, -2147483648.0]`
/// still lands on `i32::MIN`, which is in range.
pub fn trunc_f64_s_to_i32(a: f64) -> Result<u32, Error> {
    trap_on_nan(a)?;
    if a <= -2_147_483_649.0 || a >= 2_147_483_648.0 {
        return Err(Error::trap(TrapKind::IntegerOverflow));
    }
    Ok(a as i32 as u32)
}

/// As [`trunc_f64_s_to_i32`] but for the unsigned destination range: the
/// low bound is `0`, so anything at or below `-1.0` is out of range.
pub fn trunc_f64_u_to_i32(a: f64) -> Result<u32, Error> {
    trap_on_nan(a)?;
    if a <= -1.0 || a >= 4_294_967_296.0 {
        return Err(Error::trap(TrapKind::IntegerOverflow));
    }
    Ok(a as u32)
}

/// As [`trunc_f64_s_to_i32`] but for an `i64` destination. `f64`'s
/// precision at this magnitude (one ULP = 2^11) is coarser than the
/// signed-i32 case's off-by-one gap, so the plain `<` here already
/// excludes everything below `i64::MIN`.
pub fn trunc_f64_s_to_i64(a: f64) -> Result<u64, Error> {
    trap_on_nan(a)?;
    if a < -9_223_372_036_854_775_808.0 || a >= 9_223_372_036_854_775_808.0 {
        return Err(Error::trap(TrapKind::IntegerOverflow));
    }
    Ok(a as i64 as u64)
}

/// As [`trunc_f64_u_to_i32`] but for an `i64` destination.
pub fn trunc_f64_u_to_i64(a: f64) -> Result<u64, Error> {
    trap_on_nan(a)?;
    if a <= -1.0 || a >= 18_446_744_073_709_551_616.0 {
        return Err(Error::trap(TrapKind::IntegerOverflow));
    }
    Ok(a as u64)
}

/// `trunc_f32_s_to_i32` widens to `f64` first: the widening is exact, so
/// the bound checks above are reused without duplicating them per source
/// width.
pub fn trunc_f32_s_to_i32(a: f32) -> Result<u32, Error> {
    trunc_f64_s_to_i32(a as f64)
}

/// See [`trunc_f32_s_to_i32`].
pub fn trunc_f32_u_to_i32(a: f32) -> Result<u32, Error> {
    trunc_f64_u_to_i32(a as f64)
}

/// See [`trunc_f32_s_to_i32`].
pub fn trunc_f32_s_to_i64(a: f32) -> Result<u64, Error> {
    trunc_f64_s_to_i64(a as f64)
}

/// See [`trunc_f32_s_to_i32`].
pub fn trunc_f32_u_to_i64(a: f32) -> Result<u64, Error> {
    trunc_f64_u_to_i64(a as f64)
}

/// Signed `i32` to `f32`; may round.
pub fn convert_i32_s_to_f32(a: u32) -> f32 {
    (a as i32) as f32
}
/// Unsigned `i32` to `f32`; may round.
pub fn convert_i32_u_to_f32(a: u32) -> f32 {
    a as f32
}
/// Signed `i32` to `f64`; exact.
pub fn convert_i32_s_to_f64(a: u32) -> f64 {
    (a as i32) as f64
}
/// Unsigned `i32` to `f64`; exact.
pub fn convert_i32_u_to_f64(a: u32) -> f64 {
    a as f64
}
/// Signed `i64` to `f32`; may round.
pub fn convert_i64_s_to_f32(a: u64) -> f32 {
    (a as i64) as f32
}
/// Unsigned `i64` to `f32`; may round.
pub fn convert_i64_u_to_f32(a: u64) -> f32 {
    a as f32
}
/// Signed `i64` to `f64`; may round.
pub fn convert_i64_s_to_f64(a: u64) -> f64 {
    (a as i64) as f64
}
/// Unsigned `i64` to `f64`; may round.
pub fn convert_i64_u_to_f64(a: u64) -> f64 {
    a as f64
}

/// `f64` to `f32`, rounding to the nearest representable value.
pub fn demote_f64_to_f32(a: f64) -> f32 {
    a as f32
}

/// `f32` to `f64`; always exact.
pub fn promote_f32_to_f64(a: f32) -> f64 {
    a as f64
}

/// Reinterpret the bits of an `i32` as an `f32`.
pub fn reinterpret_i32_to_f32(a: u32) -> f32 {
    f32::from_bits(a)
}
/// Reinterpret the bits of an `f32` as an `i32`.
pub fn reinterpret_f32_to_i32(a: f32) -> u32 {
    a.to_bits()
}
/// Reinterpret the bits of an `i64` as an `f64`.
pub fn reinterpret_i64_to_f64(a: u64) -> f64 {
    f64::from_bits(a)
}
/// Reinterpret the bits of an `f64` as an `i64`.
pub fn reinterpret_f64_to_i64(a: f64) -> u64 {
    a.to_bits()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trunc_traps_on_nan_and_overflow() {
        assert_eq!(
            trunc_f32_s_to_i32(f32::NAN).unwrap_err().trap_message(),
            Some("invalid conversion to integer")
        );
        assert_eq!(
            trunc_f64_s_to_i32(1e10).unwrap_err().trap_message(),
            Some("integer overflow")
        );
    }

    #[test]
    fn trunc_accepts_boundary_values() {
        assert_eq!(trunc_f64_s_to_i32(-2_147_483_648.0).unwrap() as i32, i32::MIN);
        assert_eq!(trunc_f64_u_to_i32(4_294_967_295.0).unwrap(), u32::MAX);
    }

    #[test]
    fn trunc_rounds_toward_zero_past_the_signed_boundary() {
        // -2147483648.9 truncates to i32::MIN, which still fits.
        assert_eq!(trunc_f64_s_to_i32(-2_147_483_648.9).unwrap() as i32, i32::MIN);
        // -2147483649.0 truncates to one less than i32::MIN: out of range.
        assert!(trunc_f64_s_to_i32(-2_147_483_649.0).is_err());
    }

    #[test]
    fn trunc_unsigned_traps_at_minus_one() {
        assert!(trunc_f64_u_to_i32(-1.0).is_err());
        assert!(trunc_f64_u_to_i64(-1.0).is_err());
        assert_eq!(trunc_f64_u_to_i32(-0.9).unwrap(), 0);
    }

    #[test]
    fn wrap_and_extend_roundtrip() {
        let x: u64 = 0xFFFF_FFFF_0000_0001;
        assert_eq!(wrap_i64_to_i32(x), 1);
        assert_eq!(extend_i32_s_to_i64(0xFFFF_FFFF), 0xFFFF_FFFF_FFFF_FFFF);
        assert_eq!(extend_i32_u_to_i64(0xFFFF_FFFF), 0x0000_0000_FFFF_FFFF);
    }

    #[test]
    fn reinterpret_roundtrips() {
        assert_eq!(reinterpret_f32_to_i32(reinterpret_i32_to_f32(0x3f80_0000)), 0x3f80_0000);
    }
}
