// Copyright 2026 the Marshal Codec Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arbitrary-precision integers in wire digit form.
//!
//! [`BigInt`] stores its magnitude exactly as the `l` payload does: base-2^15 digits, least
//! significant first. Encoding and decoding are therefore a straight copy of the digit vector; only
//! conversions to and from machine integers do arithmetic.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use crate::wire::{DIGIT_BITS, DIGIT_MAX, SMALL_INT_MAX, SMALL_INT_MIN};

const DIGIT_MASK: u128 = DIGIT_MAX as u128;

/// A signed arbitrary-precision integer.
///
/// Invariants: no most-significant zero digits, and zero is never negative. Structural equality is
/// numeric equality.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BigInt {
    negative: bool,
    digits: Vec<u16>,
}

impl BigInt {
    /// Returns zero.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            negative: false,
            digits: Vec::new(),
        }
    }

    /// Builds an integer from a sign and base-2^15 digits, least significant first.
    ///
    /// Returns `None` if any digit exceeds [`DIGIT_MAX`]. Most-significant zero digits are dropped.
    #[must_use]
    pub fn from_digits(negative: bool, digits: Vec<u16>) -> Option<Self> {
        if digits.iter().any(|&d| d > DIGIT_MAX) {
            return None;
        }
        Some(Self::from_checked_digits(negative, digits))
    }

    /// Like [`BigInt::from_digits`], for digits already known to be in range.
    pub(crate) fn from_checked_digits(negative: bool, mut digits: Vec<u16>) -> Self {
        while digits.last() == Some(&0) {
            digits.pop();
        }
        Self {
            negative: negative && !digits.is_empty(),
            digits,
        }
    }

    fn from_magnitude(negative: bool, mut magnitude: u128) -> Self {
        let mut digits = Vec::new();
        while magnitude != 0 {
            // Masked to 15 bits, so the narrowing is lossless.
            digits.push((magnitude & DIGIT_MASK) as u16);
            magnitude >>= DIGIT_BITS;
        }
        Self {
            negative: negative && !digits.is_empty(),
            digits,
        }
    }

    /// Returns `true` if the value is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Returns `true` if the value is below zero.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Returns the magnitude digits, least significant first.
    #[must_use]
    pub fn digits(&self) -> &[u16] {
        &self.digits
    }

    /// Returns the value as `i128` if it fits.
    #[must_use]
    pub fn to_i128(&self) -> Option<i128> {
        let mut magnitude: u128 = 0;
        for &d in self.digits.iter().rev() {
            if magnitude.leading_zeros() < DIGIT_BITS {
                return None;
            }
            magnitude = (magnitude << DIGIT_BITS) | u128::from(d);
        }
        if self.negative {
            if magnitude == i128::MIN.unsigned_abs() {
                Some(i128::MIN)
            } else {
                i128::try_from(magnitude).ok().map(|m| -m)
            }
        } else {
            i128::try_from(magnitude).ok()
        }
    }

    /// Returns the value as `i64` if it fits.
    #[must_use]
    pub fn to_i64(&self) -> Option<i64> {
        self.to_i128().and_then(|v| i64::try_from(v).ok())
    }

    /// Returns `true` if the value lies in the fixed-width `i` range `[-2^31, 2^31 - 1]`.
    #[must_use]
    pub fn fits_i32(&self) -> bool {
        self.to_i64()
            .is_some_and(|v| (SMALL_INT_MIN..=SMALL_INT_MAX).contains(&v))
    }

    fn to_decimal(&self) -> String {
        if self.digits.is_empty() {
            return String::from("0");
        }

        // Repeated division by 10^4 over the base-2^15 digits, most significant first.
        const CHUNK: u32 = 10_000;
        let mut work: Vec<u32> = self.digits.iter().rev().map(|&d| u32::from(d)).collect();
        let mut chunks: Vec<u32> = Vec::new();
        while !work.is_empty() {
            let mut rem: u32 = 0;
            for d in work.iter_mut() {
                let cur = (rem << DIGIT_BITS) | *d;
                *d = cur / CHUNK;
                rem = cur % CHUNK;
            }
            chunks.push(rem);
            let leading = work.iter().take_while(|&&d| d == 0).count();
            work.drain(..leading);
        }

        let mut out = String::new();
        if self.negative {
            out.push('-');
        }
        let mut iter = chunks.iter().rev();
        if let Some(first) = iter.next() {
            out.push_str(&alloc::format!("{first}"));
        }
        for chunk in iter {
            out.push_str(&alloc::format!("{chunk:04}"));
        }
        out
    }
}

impl From<i128> for BigInt {
    fn from(v: i128) -> Self {
        Self::from_magnitude(v < 0, v.unsigned_abs())
    }
}

impl From<i64> for BigInt {
    fn from(v: i64) -> Self {
        Self::from(i128::from(v))
    }
}

impl From<i32> for BigInt {
    fn from(v: i32) -> Self {
        Self::from(i128::from(v))
    }
}

impl From<u64> for BigInt {
    fn from(v: u64) -> Self {
        Self::from_magnitude(false, u128::from(v))
    }
}

impl From<u128> for BigInt {
    fn from(v: u128) -> Self {
        Self::from_magnitude(false, v)
    }
}

impl fmt::Display for BigInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_decimal())
    }
}

#[cfg(test)]
mod tests {
    use super::BigInt;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn digits_are_base_2_15_little_endian() {
        let v = BigInt::from(0x8000_0000_i64);
        assert_eq!(v.digits(), &[0, 0, 2]);
        assert!(!v.is_negative());

        let v = BigInt::from(-(1_i128 << 70));
        assert_eq!(v.digits(), &[0, 0, 0, 0, 0x0400]);
        assert!(v.is_negative());
    }

    #[test]
    fn zero_is_empty_and_non_negative() {
        let z = BigInt::from(0_i64);
        assert!(z.is_zero());
        assert!(!z.is_negative());
        assert_eq!(z, BigInt::zero());
        assert_eq!(BigInt::from_digits(true, vec![0, 0]), Some(BigInt::zero()));
    }

    #[test]
    fn from_digits_normalizes_and_validates() {
        let v = BigInt::from_digits(false, vec![5, 0, 0]).unwrap();
        assert_eq!(v.digits(), &[5]);
        assert_eq!(v, BigInt::from(5_i64));
        assert_eq!(BigInt::from_digits(false, vec![0x8000]), None);
    }

    #[test]
    fn i128_roundtrip_at_extremes() {
        for v in [
            0_i128,
            1,
            -1,
            i128::from(i32::MAX),
            i128::from(i32::MIN),
            i128::from(i64::MIN),
            i128::MAX,
            i128::MIN,
        ] {
            assert_eq!(BigInt::from(v).to_i128(), Some(v), "value {v}");
        }
        let too_big = BigInt::from(u128::MAX);
        assert_eq!(too_big.to_i128(), None);
    }

    #[test]
    fn fits_i32_boundaries() {
        assert!(BigInt::from(i64::from(i32::MAX)).fits_i32());
        assert!(BigInt::from(i64::from(i32::MIN)).fits_i32());
        assert!(!BigInt::from(i64::from(i32::MAX) + 1).fits_i32());
        assert!(!BigInt::from(i64::from(i32::MIN) - 1).fits_i32());
    }

    #[test]
    fn display_is_decimal() {
        assert_eq!(BigInt::zero().to_string(), "0");
        assert_eq!(BigInt::from(-1234_i64).to_string(), "-1234");
        assert_eq!(BigInt::from(100_000_007_i64).to_string(), "100000007");
        assert_eq!(
            BigInt::from(u128::MAX).to_string(),
            "340282366920938463463374607431768211455"
        );
        assert_eq!(
            BigInt::from(-(1_i128 << 70)).to_string(),
            "-1180591620717411303424"
        );
    }
}
