//!IPv6 module

use core::{fmt, iter, net, ops};

use alloc::string::{String, ToString};

use crate::base;
use crate::parser::{self, ParseError};
use crate::Uint128;

pub(crate) const BITS_LEN: u8 = 128;
///Number of hextets within address
pub const HEXTETS: usize = 8;

#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
///IPv6 address stored as raw 128 bits
pub struct Address(Uint128);

///IPv6 CIDR
pub type Cidr = base::Cidr<Address>;
///IPv6 address range
pub type Range = base::Range<Address>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
///Formatting of individual hextet
pub enum HextetFormat {
    ///Lowercase hex without leading zeros: `db8`
    #[default]
    Plain,
    ///Lowercase hex zero padded to 4 digits: `0db8`
    Padded,
}

impl Address {
    ///`::`
    pub const UNSPECIFIED: Self = Self(Uint128::ZERO);
    ///`::1`
    pub const LOCALHOST: Self = Self(Uint128::ONE);

    #[inline(always)]
    ///Creates address from its hextets, most significant first
    #[allow(clippy::too_many_arguments)]
    pub const fn new(a: u16, b: u16, c: u16, d: u16, e: u16, f: u16, g: u16, h: u16) -> Self {
        Self::from_hextets([a, b, c, d, e, f, g, h])
    }

    ///Creates address from its hextets, most significant first
    pub const fn from_hextets(hextets: [u16; HEXTETS]) -> Self {
        let high = (hextets[0] as u64) << 48 | (hextets[1] as u64) << 32 | (hextets[2] as u64) << 16 | hextets[3] as u64;
        let low = (hextets[4] as u64) << 48 | (hextets[5] as u64) << 32 | (hextets[6] as u64) << 16 | hextets[7] as u64;
        Self(Uint128::new(high, low))
    }

    #[inline(always)]
    ///Creates address from raw bits
    pub const fn from_bits(bits: Uint128) -> Self {
        Self(bits)
    }

    #[inline(always)]
    ///Returns raw bits
    pub const fn to_bits(self) -> Uint128 {
        self.0
    }

    #[inline]
    ///Returns hextet at `idx`, where `0` is the most significant one
    pub const fn hextet(self, idx: usize) -> Option<u16> {
        if idx >= HEXTETS {
            return None;
        }

        let half = if idx < 4 {
            self.0.high()
        } else {
            self.0.low()
        };
        let shift = (3 - idx % 4) * 16;
        Some((half >> shift) as u16)
    }

    #[inline(always)]
    ///Returns iterator over hextets, most significant first
    pub const fn hextets(self) -> Hextets {
        Hextets {
            addr: self,
            front: 0,
            back: HEXTETS,
        }
    }

    ///Returns all hextets, most significant first
    pub const fn to_hextets(self) -> [u16; HEXTETS] {
        let (high, low) = (self.0.high(), self.0.low());
        [
            (high >> 48) as u16, (high >> 32) as u16, (high >> 16) as u16, high as u16,
            (low >> 48) as u16, (low >> 32) as u16, (low >> 16) as u16, low as u16,
        ]
    }

    #[inline]
    ///Parses RFC 4291 text representation, allowing single `::` zero abbreviation
    pub fn parse(text: &str) -> Result<Self, ParseError<'_>> {
        parser::parse_v6(text, false).map(|(addr, _)| addr)
    }

    #[inline(always)]
    ///Returns formatter writing all 8 hextets
    pub const fn full(self, format: HextetFormat) -> Full {
        Full {
            addr: self,
            format,
        }
    }

    #[inline]
    ///Renders all 8 hextets separated by `:`
    pub fn to_string_full(self, format: HextetFormat) -> String {
        self.full(format).to_string()
    }

    #[inline]
    ///Renders RFC 5952 canonical text, same as `Display`
    pub fn to_string_short(self) -> String {
        self.to_string()
    }
}

//Returns `(start, len)` of the leftmost longest run of at least 2 zero hextets
fn longest_zero_run(hextets: &[u16; HEXTETS]) -> Option<(usize, usize)> {
    let mut best = (0, 0);
    let mut current = (0, 0);

    for (idx, hextet) in hextets.iter().enumerate() {
        if *hextet == 0 {
            if current.1 == 0 {
                current.0 = idx;
            }
            current.1 += 1;
            //strictly greater keeps leftmost run on ties
            if current.1 > best.1 {
                best = current;
            }
        } else {
            current.1 = 0;
        }
    }

    match best {
        (start, len) if len >= 2 => Some((start, len)),
        _ => None,
    }
}

fn write_hextets(fmt: &mut fmt::Formatter<'_>, hextets: &[u16], format: HextetFormat) -> fmt::Result {
    for (idx, hextet) in hextets.iter().enumerate() {
        if idx > 0 {
            fmt.write_str(":")?;
        }
        match format {
            HextetFormat::Plain => fmt.write_fmt(format_args!("{hextet:x}"))?,
            HextetFormat::Padded => fmt.write_fmt(format_args!("{hextet:04x}"))?,
        }
    }
    Ok(())
}

impl fmt::Display for Address {
    ///Writes RFC 5952 text: longest run of zero hextets is replaced with `::`
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hextets = self.to_hextets();
        match longest_zero_run(&hextets) {
            Some((start, len)) => {
                write_hextets(fmt, &hextets[..start], HextetFormat::Plain)?;
                fmt.write_str("::")?;
                write_hextets(fmt, &hextets[start + len..], HextetFormat::Plain)
            },
            None => write_hextets(fmt, &hextets, HextetFormat::Plain),
        }
    }
}

impl fmt::Debug for Address {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

#[derive(Copy, Clone, Debug)]
///Formatter of all 8 hextets, created by [Address::full](struct.Address.html#method.full)
pub struct Full {
    addr: Address,
    format: HextetFormat,
}

impl fmt::Display for Full {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_hextets(fmt, &self.addr.to_hextets(), self.format)
    }
}

#[derive(Clone, Debug)]
///Iterator over address hextets, most significant first
pub struct Hextets {
    addr: Address,
    front: usize,
    back: usize,
}

impl Iterator for Hextets {
    type Item = u16;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        let hextet = self.addr.hextet(self.front);
        self.front += 1;
        hextet
    }

    #[inline(always)]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl DoubleEndedIterator for Hextets {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }

        self.back -= 1;
        self.addr.hextet(self.back)
    }
}

impl ExactSizeIterator for Hextets {}
impl iter::FusedIterator for Hextets {}

impl ops::Add<Uint128> for Address {
    type Output = Self;

    #[inline(always)]
    fn add(self, offset: Uint128) -> Self {
        Self(self.0 + offset)
    }
}

impl ops::Sub<Uint128> for Address {
    type Output = Self;

    #[inline(always)]
    fn sub(self, offset: Uint128) -> Self {
        Self(self.0 - offset)
    }
}

impl ops::Sub for Address {
    type Output = Uint128;

    #[inline(always)]
    fn sub(self, other: Self) -> Uint128 {
        self.0 - other.0
    }
}

impl From<net::Ipv6Addr> for Address {
    #[inline(always)]
    fn from(addr: net::Ipv6Addr) -> Self {
        Self(Uint128::from_u128(addr.to_bits()))
    }
}

impl From<Address> for net::Ipv6Addr {
    #[inline(always)]
    fn from(addr: Address) -> Self {
        net::Ipv6Addr::from_bits(addr.0.to_u128())
    }
}

impl From<[u16; HEXTETS]> for Address {
    #[inline(always)]
    fn from(hextets: [u16; HEXTETS]) -> Self {
        Self::from_hextets(hextets)
    }
}

impl base::NetworkAddress for Address {
    const BITS_LEN: u8 = BITS_LEN;
}

//Integer operations usable within `const fn`, trait operators are not
mod repr {
    use crate::Uint128;

    #[inline(always)]
    pub(super) const fn and(left: Uint128, right: Uint128) -> Uint128 {
        Uint128::new(left.high() & right.high(), left.low() & right.low())
    }

    #[inline(always)]
    pub(super) const fn or(left: Uint128, right: Uint128) -> Uint128 {
        Uint128::new(left.high() | right.high(), left.low() | right.low())
    }

    #[inline(always)]
    pub(super) const fn not(value: Uint128) -> Uint128 {
        Uint128::new(!value.high(), !value.low())
    }

    #[inline(always)]
    pub(super) const fn shl(value: Uint128, offset: u32) -> Uint128 {
        value.wrapping_shl(offset)
    }

    #[inline(always)]
    pub(super) const fn eq(left: Uint128, right: Uint128) -> bool {
        left.high() == right.high() && left.low() == right.low()
    }

    #[inline(always)]
    pub(super) const fn lower(left: Uint128, right: Uint128) -> bool {
        left.high() < right.high() || (left.high() == right.high() && left.low() < right.low())
    }
}

crate::base::impl_base_methods!(Address where REPR=Uint128, ONE=Uint128::ONE, OPS=repr, PARSE=parser::parse_v6, OVERFLOW=ParseError::Ipv6CidrPrefixOverflow);
