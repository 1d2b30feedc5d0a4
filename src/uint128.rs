//! 128-bit unsigned integer made of two 64-bit halves
//!
//! All arithmetic is performed over the ring of integers modulo 2^128, i.e. every operator wraps
//! exactly like a native fixed-width unsigned integer. Methods prefixed with `checked_` or
//! `overflowing_` are provided for callers which need to detect that wraparound.

use core::{fmt, ops, str};

use num_bigint::BigUint;

const LOW32_MASK: u64 = 0xffff_ffff;

//Field order defines ordering: `high` is compared first
#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
///Unsigned 128-bit integer
pub struct Uint128 {
    high: u64,
    low: u64,
}

impl Uint128 {
    ///Number of bits within integer
    pub const BITS: u32 = 128;
    ///Zero
    pub const ZERO: Self = Self::new(0, 0);
    ///Smallest possible value, which is zero
    pub const MIN: Self = Self::ZERO;
    ///One
    pub const ONE: Self = Self::new(0, 1);
    ///Largest possible value, `2^128 - 1`
    pub const MAX: Self = Self::new(u64::MAX, u64::MAX);

    #[inline(always)]
    ///Creates new integer from upper and lower 64 bits
    pub const fn new(high: u64, low: u64) -> Self {
        Self {
            high,
            low,
        }
    }

    #[inline(always)]
    ///Creates integer from native `u128`
    pub const fn from_u128(value: u128) -> Self {
        Self::new((value >> 64) as u64, value as u64)
    }

    #[inline(always)]
    ///Converts into native `u128`
    pub const fn to_u128(self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }

    #[inline(always)]
    ///Returns upper 64 bits
    pub const fn high(self) -> u64 {
        self.high
    }

    #[inline(always)]
    ///Returns lower 64 bits
    pub const fn low(self) -> u64 {
        self.low
    }

    #[inline(always)]
    ///Narrows integer to its lower 64 bits.
    ///
    ///Upper half is discarded without any error.
    pub const fn as_u64(self) -> u64 {
        self.low
    }

    #[inline(always)]
    ///Returns `true` if value is zero
    pub const fn is_zero(self) -> bool {
        self.high == 0 && self.low == 0
    }

    #[inline]
    ///Returns `2^exp` or `None` if it doesn't fit 128 bits
    pub const fn power_of_two(exp: u32) -> Option<Self> {
        Self::ONE.checked_shl(exp)
    }

    #[inline]
    ///Adds one, wrapping `MAX` to `ZERO`
    pub const fn increment(self) -> Self {
        let low = self.low.wrapping_add(1);
        //top bit goes from 1 to 0 only when low half wraps
        let carry = ((self.low ^ low) & self.low) >> 63;
        Self::new(self.high.wrapping_add(carry), low)
    }

    #[inline]
    ///Subtracts one, wrapping `ZERO` to `MAX`
    pub const fn decrement(self) -> Self {
        let low = self.low.wrapping_sub(1);
        //top bit goes from 0 to 1 only when low half wraps
        let borrow = ((self.low ^ low) & low) >> 63;
        Self::new(self.high.wrapping_sub(borrow), low)
    }

    #[inline]
    ///Calculates `self + rhs`, returning wrapped result and whether overflow happened
    pub const fn overflowing_add(self, rhs: Self) -> (Self, bool) {
        let low = self.low.wrapping_add(rhs.low);
        let carry = (low < self.low) as u64;
        let (high, overflow) = self.high.overflowing_add(rhs.high);
        let (high, carry_overflow) = high.overflowing_add(carry);
        (Self::new(high, low), overflow | carry_overflow)
    }

    #[inline]
    ///Calculates `self - rhs`, returning wrapped result and whether underflow happened
    pub const fn overflowing_sub(self, rhs: Self) -> (Self, bool) {
        let low = self.low.wrapping_sub(rhs.low);
        let borrow = (rhs.low > self.low) as u64;
        let (high, underflow) = self.high.overflowing_sub(rhs.high);
        let (high, borrow_underflow) = high.overflowing_sub(borrow);
        (Self::new(high, low), underflow | borrow_underflow)
    }

    #[inline(always)]
    ///Calculates `self + rhs` modulo 2^128
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        self.overflowing_add(rhs).0
    }

    #[inline(always)]
    ///Calculates `self - rhs` modulo 2^128
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        self.overflowing_sub(rhs).0
    }

    #[inline]
    ///Calculates `self + rhs`, returning `None` on overflow
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.overflowing_add(rhs) {
            (result, false) => Some(result),
            (_, true) => None,
        }
    }

    #[inline]
    ///Calculates `self - rhs`, returning `None` on underflow
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.overflowing_sub(rhs) {
            (result, false) => Some(result),
            (_, true) => None,
        }
    }

    ///Computes exact 128-bit product of two 64-bit integers
    ///
    ///Each operand is split into 32-bit halves and four partial products are summed with carry.
    pub const fn mul_high_low(lhs: u64, rhs: u64) -> Self {
        let (lhs_high, lhs_low) = (lhs >> 32, lhs & LOW32_MASK);
        let (rhs_high, rhs_low) = (rhs >> 32, rhs & LOW32_MASK);

        let low_low = lhs_low * rhs_low;
        let high_low = lhs_high * rhs_low;
        let low_high = lhs_low * rhs_high;
        let high_high = lhs_high * rhs_high;

        //cannot overflow: sum is at most 2^64 - 2
        let middle = (low_low >> 32) + (high_low & LOW32_MASK) + low_high;

        let low = (middle << 32) | (low_low & LOW32_MASK);
        let high = high_high + (high_low >> 32) + (middle >> 32);
        Self::new(high, low)
    }

    ///Calculates `self * rhs`, returning product modulo 2^128 and whether the true product overflowed
    ///
    ///Cross terms `high * low` only contribute to the upper half, anything above 128 bits is
    ///dropped, which is exactly multiplication modulo 2^128.
    pub const fn overflowing_mul(self, rhs: Self) -> (Self, bool) {
        let product = Self::mul_high_low(self.low, rhs.low);
        let (cross_lhs, cross_lhs_overflow) = self.high.overflowing_mul(rhs.low);
        let (cross_rhs, cross_rhs_overflow) = self.low.overflowing_mul(rhs.high);
        let (high, sum_overflow) = product.high.overflowing_add(cross_lhs);
        let (high, sum_rhs_overflow) = high.overflowing_add(cross_rhs);

        let overflow = (self.high != 0 && rhs.high != 0) | cross_lhs_overflow | cross_rhs_overflow | sum_overflow | sum_rhs_overflow;
        (Self::new(high, product.low), overflow)
    }

    #[inline(always)]
    ///Calculates `self * rhs` modulo 2^128
    pub const fn wrapping_mul(self, rhs: Self) -> Self {
        self.overflowing_mul(rhs).0
    }

    #[inline]
    ///Calculates `self * rhs`, returning `None` if product doesn't fit 128 bits
    pub const fn checked_mul(self, rhs: Self) -> Option<Self> {
        match self.overflowing_mul(rhs) {
            (result, false) => Some(result),
            (_, true) => None,
        }
    }

    ///Shifts left by `offset` modulo 128
    pub const fn wrapping_shl(self, offset: u32) -> Self {
        let offset = offset % Self::BITS;
        if offset == 0 {
            self
        } else if offset >= 64 {
            Self::new(self.low << (offset - 64), 0)
        } else {
            Self::new((self.high << offset) | (self.low >> (64 - offset)), self.low << offset)
        }
    }

    #[inline]
    ///Shifts left by `offset`, returning `None` if `offset` is 128 or more
    pub const fn checked_shl(self, offset: u32) -> Option<Self> {
        if offset >= Self::BITS {
            None
        } else {
            Some(self.wrapping_shl(offset))
        }
    }

    ///Shifts right by `offset`, with every offset of 128 or more producing zero
    pub const fn zero_fill_shr(self, offset: u32) -> Self {
        if offset >= Self::BITS {
            Self::ZERO
        } else if offset >= 64 {
            Self::new(0, self.high >> (offset - 64))
        } else if offset == 0 {
            self
        } else {
            Self::new(self.high >> offset, (self.low >> offset) | (self.high << (64 - offset)))
        }
    }

    #[inline]
    ///Shifts right by `offset`, returning `None` if `offset` is 128 or more
    pub const fn checked_shr(self, offset: u32) -> Option<Self> {
        if offset >= Self::BITS {
            None
        } else {
            Some(self.zero_fill_shr(offset))
        }
    }

    #[inline]
    ///Returns number of leading zero bits
    pub const fn leading_zeros(self) -> u32 {
        if self.high != 0 {
            self.high.leading_zeros()
        } else {
            64 + self.low.leading_zeros()
        }
    }

    #[inline]
    ///Returns number of trailing zero bits
    pub const fn trailing_zeros(self) -> u32 {
        if self.low != 0 {
            self.low.trailing_zeros()
        } else {
            64 + self.high.trailing_zeros()
        }
    }

    #[inline(always)]
    ///Returns number of set bits
    pub const fn count_ones(self) -> u32 {
        self.high.count_ones() + self.low.count_ones()
    }

    //Long division over four 32-bit limbs, `divisor` must not be zero
    const fn div_rem_u32(self, divisor: u32) -> (Self, u32) {
        let divisor = divisor as u64;
        let mut limbs = [self.high >> 32, self.high & LOW32_MASK, self.low >> 32, self.low & LOW32_MASK];
        let mut remainder = 0u64;
        let mut idx = 0;
        while idx < limbs.len() {
            let current = (remainder << 32) | limbs[idx];
            limbs[idx] = current / divisor;
            remainder = current % divisor;
            idx += 1;
        }

        (Self::new((limbs[0] << 32) | limbs[1], (limbs[2] << 32) | limbs[3]), remainder as u32)
    }

    ///Parses integer from `text` in the specified `radix`
    pub fn from_str_radix(text: &str, radix: u32) -> Result<Self, ParseUint128Error> {
        if !(2..=36).contains(&radix) {
            return Err(ParseUint128Error::InvalidRadix(radix));
        }
        if text.is_empty() {
            return Err(ParseUint128Error::Empty);
        }

        let radix_value = Self::from(radix);
        let mut value = Self::ZERO;
        for (pos, ch) in text.char_indices() {
            let digit = match ch.to_digit(radix) {
                Some(digit) => digit,
                None => return Err(ParseUint128Error::InvalidDigit(ch, pos)),
            };
            value = match value.checked_mul(radix_value) {
                Some(value) => match value.checked_add(Self::from(digit)) {
                    Some(value) => value,
                    None => return Err(ParseUint128Error::Overflow),
                },
                None => return Err(ParseUint128Error::Overflow),
            };
        }

        Ok(value)
    }

    fn fmt_radix(self, radix: u32, digits: &[u8; 16], prefix: &str, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        //Enough for binary representation
        let mut buffer = [0u8; 128];
        let mut pos = buffer.len();
        let mut value = self;
        loop {
            let (quotient, digit) = value.div_rem_u32(radix);
            pos -= 1;
            buffer[pos] = digits[digit as usize];
            value = quotient;
            if value.is_zero() {
                break;
            }
        }

        let text = str::from_utf8(&buffer[pos..]).map_err(|_| fmt::Error)?;
        fmt.pad_integral(true, prefix, text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
///Possible errors parsing [Uint128](struct.Uint128.html) from text
pub enum ParseUint128Error {
    ///Input is empty
    #[error("Cannot parse integer from empty string")]
    Empty,
    ///Radix outside of `2..=36`
    #[error("Radix '{0}' is not within 2..=36")]
    InvalidRadix(u32),
    ///Character is not a digit of the radix, with position where it is encountered at
    #[error("Encountered invalid digit '{0}' at idx={1}")]
    InvalidDigit(char, usize),
    ///Value doesn't fit 128 bits
    #[error("Number is too large to fit 128 bits")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Value requires {bits} bits which is more than 128")]
///Error converting arbitrary precision integer which doesn't fit 128 bits
pub struct TryFromBigUintError {
    ///Number of significant bits within rejected value
    pub bits: u64,
}

impl str::FromStr for Uint128 {
    type Err = ParseUint128Error;

    #[inline(always)]
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_str_radix(text, 10)
    }
}

macro_rules! impl_from_primitive {
    ($($typ:ty),+) => {
        $(
            impl From<$typ> for Uint128 {
                #[inline(always)]
                fn from(value: $typ) -> Self {
                    Self::new(0, value as u64)
                }
            }
        )+
    };
}

impl_from_primitive!(u8, u16, u32, u64);

impl From<u128> for Uint128 {
    #[inline(always)]
    fn from(value: u128) -> Self {
        Self::from_u128(value)
    }
}

impl From<Uint128> for u128 {
    #[inline(always)]
    fn from(value: Uint128) -> Self {
        value.to_u128()
    }
}

impl From<Uint128> for BigUint {
    fn from(value: Uint128) -> Self {
        //little-endian base 2^32 digits
        BigUint::from_slice(&[
            value.low as u32,
            (value.low >> 32) as u32,
            value.high as u32,
            (value.high >> 32) as u32,
        ])
    }
}

impl TryFrom<&BigUint> for Uint128 {
    type Error = TryFromBigUintError;

    fn try_from(value: &BigUint) -> Result<Self, Self::Error> {
        let digits = value.to_u64_digits();
        match digits.as_slice() {
            [] => Ok(Self::ZERO),
            [low] => Ok(Self::new(0, *low)),
            [low, high] => Ok(Self::new(*high, *low)),
            _ => Err(TryFromBigUintError {
                bits: value.bits(),
            }),
        }
    }
}

impl TryFrom<BigUint> for Uint128 {
    type Error = TryFromBigUintError;

    #[inline(always)]
    fn try_from(value: BigUint) -> Result<Self, Self::Error> {
        Self::try_from(&value)
    }
}

macro_rules! impl_bit_op {
    ($($op:ident::$method:ident / $assign:ident::$assign_method:ident => $tok:tt;)+) => {
        $(
            impl ops::$op for Uint128 {
                type Output = Self;

                #[inline(always)]
                fn $method(self, rhs: Self) -> Self {
                    Self::new(self.high $tok rhs.high, self.low $tok rhs.low)
                }
            }

            impl ops::$assign for Uint128 {
                #[inline(always)]
                fn $assign_method(&mut self, rhs: Self) {
                    *self = ops::$op::$method(*self, rhs);
                }
            }
        )+
    };
}

impl_bit_op! {
    BitAnd::bitand / BitAndAssign::bitand_assign => &;
    BitOr::bitor / BitOrAssign::bitor_assign => |;
    BitXor::bitxor / BitXorAssign::bitxor_assign => ^;
}

impl ops::Not for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Self::new(!self.high, !self.low)
    }
}

impl ops::Add for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

impl ops::AddAssign for Uint128 {
    #[inline(always)]
    fn add_assign(&mut self, rhs: Self) {
        *self = self.wrapping_add(rhs);
    }
}

impl ops::Sub for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
}

impl ops::SubAssign for Uint128 {
    #[inline(always)]
    fn sub_assign(&mut self, rhs: Self) {
        *self = self.wrapping_sub(rhs);
    }
}

impl ops::Mul for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
}

impl ops::Mul<u64> for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: u64) -> Self {
        self.wrapping_mul(Self::new(0, rhs))
    }
}

impl ops::MulAssign for Uint128 {
    #[inline(always)]
    fn mul_assign(&mut self, rhs: Self) {
        *self = self.wrapping_mul(rhs);
    }
}

impl ops::Shl<u32> for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn shl(self, offset: u32) -> Self {
        self.wrapping_shl(offset)
    }
}

impl ops::Shr<u32> for Uint128 {
    type Output = Self;

    #[inline(always)]
    fn shr(self, offset: u32) -> Self {
        self.zero_fill_shr(offset)
    }
}

const LOWER_DIGITS: &[u8; 16] = b"0123456789abcdef";
const UPPER_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

impl fmt::Display for Uint128 {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(10, LOWER_DIGITS, "", fmt)
    }
}

impl fmt::LowerHex for Uint128 {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(16, LOWER_DIGITS, "0x", fmt)
    }
}

impl fmt::UpperHex for Uint128 {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(16, UPPER_DIGITS, "0x", fmt)
    }
}

impl fmt::Octal for Uint128 {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(8, LOWER_DIGITS, "0o", fmt)
    }
}

impl fmt::Binary for Uint128 {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_radix(2, LOWER_DIGITS, "0b", fmt)
    }
}

impl fmt::Debug for Uint128 {
    #[inline]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt.write_fmt(format_args!("Uint128({self:#x})"))
    }
}
