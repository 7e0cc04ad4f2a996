//! Fixed-width integer arithmetic, bitwise, and comparison operators.
//!
//! One module is generated per width via [`int_ops!`] rather than hand
//! duplicated: the 23 operators are identical in shape for i32 and i64,
//! differing only in the underlying unsigned/signed pair and bit width.

use wrt_error::{Error, TrapKind};

macro_rules! int_ops {
    ($mod_name:ident, $uty:ty, $ity:ty, $bits:expr) => {
        #[doc = concat!("Operators over ", stringify!($bits), "-bit integers.")]
        pub mod $mod_name {
            use super::*;

            /// Wrapping addition modulo 2^N.
            pub fn add(a: $uty, b: $uty) -> $uty {
                a.wrapping_add(b)
            }

            /// Wrapping subtraction modulo 2^N.
            pub fn sub(a: $uty, b: $uty) -> $uty {
                a.wrapping_sub(b)
            }

            /// Wrapping multiplication modulo 2^N.
            pub fn mul(a: $uty, b: $uty) -> $uty {
                a.wrapping_mul(b)
            }

            /// Unsigned division; traps on division by zero.
            pub fn div_u(a: $uty, b: $uty) -> Result<$uty, Error> {
                if b == 0 {
                    return Err(Error::trap(TrapKind::IntegerDivideByZero));
                }
                Ok(a / b)
            }

            /// Unsigned remainder; traps on division by zero.
            pub fn rem_u(a: $uty, b: $uty) -> Result<$uty, Error> {
                if b == 0 {
                    return Err(Error::trap(TrapKind::IntegerDivideByZero));
                }
                Ok(a % b)
            }

            /// Signed division; traps on division by zero and on
            /// `INT_MIN / -1` overflow.
            pub fn div_s(a: $uty, b: $uty) -> Result<$uty, Error> {
                let (a, b) = (a as $ity, b as $ity);
                if b == 0 {
                    return Err(Error::trap(TrapKind::IntegerDivideByZero));
                }
                if a == <$ity>::MIN && b == -1 {
                    return Err(Error::trap(TrapKind::IntegerOverflow));
                }
                Ok((a / b) as $uty)
            }

            /// Signed remainder; traps on division by zero. Unlike
            /// `div_s`, `INT_MIN % -1` does not trap and yields 0.
            pub fn rem_s(a: $uty, b: $uty) -> Result<$uty, Error> {
                let (a, b) = (a as $ity, b as $ity);
                if b == 0 {
                    return Err(Error::trap(TrapKind::IntegerDivideByZero));
                }
                if a == <$ity>::MIN && b == -1 {
                    return Ok(0);
                }
                Ok((a % b) as $uty)
            }

            /// Bitwise AND.
            pub fn and(a: $uty, b: $uty) -> $uty {
                a & b
            }

            /// Bitwise OR.
            pub fn or(a: $uty, b: $uty) -> $uty {
                a | b
            }

            /// Bitwise XOR.
            pub fn xor(a: $uty, b: $uty) -> $uty {
                a ^ b
            }

            /// Left shift; the count is taken modulo N.
            pub fn shl(a: $uty, b: $uty) -> $uty {
                a.wrapping_shl((b % $bits) as u32)
            }

            /// Logical (unsigned) right shift; the count is taken modulo N.
            pub fn shr_u(a: $uty, b: $uty) -> $uty {
                a.wrapping_shr((b % $bits) as u32)
            }

            /// Arithmetic (signed) right shift; the count is taken modulo N.
            pub fn shr_s(a: $uty, b: $uty) -> $uty {
                (a as $ity).wrapping_shr((b % $bits) as u32) as $uty
            }

            /// Rotate left by a count taken modulo N.
            pub fn rotl(a: $uty, b: $uty) -> $uty {
                a.rotate_left((b % $bits) as u32)
            }

            /// Rotate right by a count taken modulo N.
            pub fn rotr(a: $uty, b: $uty) -> $uty {
                a.rotate_right((b % $bits) as u32)
            }

            /// Count leading zero bits (N for an all-zero input).
            pub fn clz(a: $uty) -> $uty {
                a.leading_zeros() as $uty
            }

            /// Count trailing zero bits (N for an all-zero input).
            pub fn ctz(a: $uty) -> $uty {
                a.trailing_zeros() as $uty
            }

            /// Count set bits.
            pub fn popcnt(a: $uty) -> $uty {
                a.count_ones() as $uty
            }

            /// 1 if `a` is zero, else 0.
            pub fn eqz(a: $uty) -> i32 {
                i32::from(a == 0)
            }

            /// 1 if `a == b`, else 0.
            pub fn eq(a: $uty, b: $uty) -> i32 {
                i32::from(a == b)
            }

            /// 1 if `a != b`, else 0.
            pub fn ne(a: $uty, b: $uty) -> i32 {
                i32::from(a != b)
            }

            /// Unsigned `<`.
            pub fn lt_u(a: $uty, b: $uty) -> i32 {
                i32::from(a < b)
            }

            /// Signed `<`.
            pub fn lt_s(a: $uty, b: $uty) -> i32 {
                i32::from((a as $ity) < (b as $ity))
            }

            /// Unsigned `>`.
            pub fn gt_u(a: $uty, b: $uty) -> i32 {
                i32::from(a > b)
            }

            /// Signed `>`.
            pub fn gt_s(a: $uty, b: $uty) -> i32 {
                i32::from((a as $ity) > (b as $ity))
            }

            /// Unsigned `<=`.
            pub fn le_u(a: $uty, b: $uty) -> i32 {
                i32::from(a <= b)
            }

            /// Signed `<=`.
            pub fn le_s(a: $uty, b: $uty) -> i32 {
                i32::from((a as $ity) <= (b as $ity))
            }

            /// Unsigned `>=`.
            pub fn ge_u(a: $uty, b: $uty) -> i32 {
                i32::from(a >= b)
            }

            /// Signed `>=`.
            pub fn ge_s(a: $uty, b: $uty) -> i32 {
                i32::from((a as $ity) >= (b as $ity))
            }
        }
    };
}

int_ops!(i32_ops, u32, i32, 32);
int_ops!(i64_ops, u64, i64, 64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraparound_add() {
        assert_eq!(i32_ops::add(0xFFFF_FFFF, 1), 0);
    }

    #[test]
    fn div_s_overflow_traps() {
        let err = i32_ops::div_s(0x8000_0000, 0xFFFF_FFFF).unwrap_err();
        assert_eq!(err.trap_message(), Some("integer overflow"));
    }

    #[test]
    fn rem_s_int_min_by_neg_one_is_zero() {
        assert_eq!(i32_ops::rem_s(0x8000_0000, 0xFFFF_FFFF).unwrap(), 0);
    }

    #[test]
    fn div_by_zero_traps() {
        let err = i64_ops::div_u(10, 0).unwrap_err();
        assert_eq!(err.trap_message(), Some("integer divide by zero"));
    }

    #[test]
    fn shift_count_is_taken_modulo_width() {
        assert_eq!(i32_ops::shr_u(1, 32), 1);
        assert_eq!(i32_ops::shr_u(1, 0), 1);
    }

    #[test]
    fn popcnt_and_clz_of_all_zero() {
        assert_eq!(i32_ops::popcnt(0), 0);
        assert_eq!(i32_ops::clz(0), 32);
        assert_eq!(i64_ops::clz(0), 64);
    }
}
