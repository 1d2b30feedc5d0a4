//!IPv4 module

use core::{fmt, net, ops};

use crate::base;
use crate::parser::{self, ParseError};

pub(crate) const BITS_LEN: u8 = 32;
///Number of octets within address
pub const OCTETS: usize = 4;

#[derive(Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
///IPv4 address stored as native 32-bit word
pub struct Address(u32);

///IPv4 CIDR
pub type Cidr = base::Cidr<Address>;
///IPv4 address range
pub type Range = base::Range<Address>;

impl Address {
    ///`0.0.0.0`
    pub const UNSPECIFIED: Self = Self(0);
    ///`255.255.255.255`
    pub const BROADCAST: Self = Self(u32::MAX);

    #[inline(always)]
    ///Creates address from its octets, most significant first
    pub const fn new(a: u8, b: u8, c: u8, d: u8) -> Self {
        Self(u32::from_be_bytes([a, b, c, d]))
    }

    #[inline(always)]
    ///Creates address from raw bits
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    #[inline(always)]
    ///Returns raw bits
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    #[inline(always)]
    ///Returns octets, most significant first
    pub const fn octets(self) -> [u8; OCTETS] {
        self.0.to_be_bytes()
    }

    #[inline]
    ///Parses dotted-quad text
    ///
    ///Missing trailing octets are zero, i.e. `10.1` is `10.1.0.0`
    pub fn parse(text: &str) -> Result<Self, ParseError<'_>> {
        parser::parse_v4(text, false).map(|(addr, _)| addr)
    }
}

impl fmt::Display for Address {
    #[inline]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.octets();
        fmt.write_fmt(format_args!("{a}.{b}.{c}.{d}"))
    }
}

impl fmt::Debug for Address {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, fmt)
    }
}

impl ops::Add<u32> for Address {
    type Output = Self;

    #[inline(always)]
    fn add(self, offset: u32) -> Self {
        Self(self.0.wrapping_add(offset))
    }
}

impl ops::Sub<u32> for Address {
    type Output = Self;

    #[inline(always)]
    fn sub(self, offset: u32) -> Self {
        Self(self.0.wrapping_sub(offset))
    }
}

impl From<net::Ipv4Addr> for Address {
    #[inline(always)]
    fn from(addr: net::Ipv4Addr) -> Self {
        Self(addr.to_bits())
    }
}

impl From<Address> for net::Ipv4Addr {
    #[inline(always)]
    fn from(addr: Address) -> Self {
        net::Ipv4Addr::from_bits(addr.0)
    }
}

impl From<[u8; OCTETS]> for Address {
    #[inline(always)]
    fn from(octets: [u8; OCTETS]) -> Self {
        Self(u32::from_be_bytes(octets))
    }
}

impl base::NetworkAddress for Address {
    const BITS_LEN: u8 = BITS_LEN;
}

//Integer operations usable within `const fn`
mod repr {
    #[inline(always)]
    pub(super) const fn and(left: u32, right: u32) -> u32 {
        left & right
    }

    #[inline(always)]
    pub(super) const fn or(left: u32, right: u32) -> u32 {
        left | right
    }

    #[inline(always)]
    pub(super) const fn not(value: u32) -> u32 {
        !value
    }

    #[inline(always)]
    pub(super) const fn shl(value: u32, offset: u32) -> u32 {
        value << offset
    }

    #[inline(always)]
    pub(super) const fn eq(left: u32, right: u32) -> bool {
        left == right
    }

    #[inline(always)]
    pub(super) const fn lower(left: u32, right: u32) -> bool {
        left < right
    }
}

crate::base::impl_base_methods!(Address where REPR=u32, ONE=1, OPS=repr, PARSE=parser::parse_v4, OVERFLOW=ParseError::Ipv4CidrPrefixOverflow);

impl Cidr {
    #[inline]
    ///Returns number of addresses within block, including network and broadcast addresses
    pub const fn maximum_hosts(&self) -> u64 {
        1 << self.host_bits()
    }

    #[inline]
    ///Returns number of assignable host addresses, excluding network and broadcast addresses
    pub const fn usable_hosts(&self) -> u64 {
        self.maximum_hosts().saturating_sub(2)
    }

    #[inline]
    ///Returns number of `/prefix` networks within whole IPv4 address space, i.e. `2^prefix`
    pub const fn maximum_networks(&self) -> u64 {
        1 << self.prefix()
    }

    ///Returns range of assignable host addresses
    ///
    ///Returns `None` for `/31` and `/32` which have no room for both network and broadcast addresses
    pub const fn hosts(&self) -> Option<Range> {
        if self.host_bits() < 2 {
            return None;
        }

        let first = Address::from_bits(self.network_addr().to_bits() + 1);
        let last = Address::from_bits(self.broadcast_addr().to_bits() - 1);
        Some(base::Range::from_parts(first, last))
    }
}
