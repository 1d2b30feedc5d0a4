//! Subnet planning utilities
//!
//! Provides 128-bit address arithmetic ([Uint128](struct.Uint128.html)), IPv4/IPv6 addresses with
//! canonical text representation, CIDR blocks and VLSM allocation:
//!
//! - [vlsm::allocate](vlsm/fn.allocate.html) splits IPv4 space into subnets sized by host count;
//! - [vlsm::Hierarchy](vlsm/struct.Hierarchy.html) describes nested IPv6 subnets by subnet count
//!   and computes any of them on demand.
//!
//! ```
//! use subnetter::{v6, vlsm::Hierarchy};
//!
//! let top = v6::Cidr::parse("2001:db8:cad::/48").expect("valid cidr");
//! let plan = Hierarchy::new(top, [("Country", 3), ("State", 60), ("Office", 10)]).expect("to fit");
//!
//! let office = plan.subnet(&[1, 2, 3]).expect("valid indices");
//! assert_eq!(office.to_string(), "2001:db8:cad:4230::/60");
//! ```

#![no_std]
#![warn(missing_docs)]
#![allow(clippy::style)]

extern crate alloc;

mod parser;
pub use parser::{parse_ip, ParseError};
mod uint128;
pub use uint128::{Uint128, ParseUint128Error, TryFromBigUintError};
pub mod base;
pub mod v4;
pub mod v6;
pub mod vlsm;
#[cfg(feature = "serde")]
mod serialize;

use core::fmt;

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
///IP address of either family
pub enum Address {
    ///IPv4 address
    V4(v4::Address),
    ///IPv6 address
    V6(v6::Address),
}

impl fmt::Display for Address {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(addr) => fmt::Display::fmt(addr, fmt),
            Self::V6(addr) => fmt::Display::fmt(addr, fmt),
        }
    }
}

impl From<v4::Address> for Address {
    #[inline(always)]
    fn from(addr: v4::Address) -> Self {
        Self::V4(addr)
    }
}

impl From<v6::Address> for Address {
    #[inline(always)]
    fn from(addr: v6::Address) -> Self {
        Self::V6(addr)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
///CIDR representation
pub enum Cidr {
    ///IPv4 block
    V4(v4::Cidr),
    ///IPv6 block
    V6(v6::Cidr),
}

impl Cidr {
    ///Number of bits within ipv4 address
    pub const IPV4_BITS: u8 = v4::BITS_LEN;
    ///Number of bits within ipv6 address
    pub const IPV6_BITS: u8 = v6::BITS_LEN;

    #[inline(always)]
    ///Constructs new CIDR verifying that `prefix` fits provided `addr`
    ///
    ///Returns `None` if `prefix` is greater than address length
    pub const fn new(addr: Address, prefix: u8) -> Option<Self> {
        match addr {
            Address::V4(addr) => match v4::Cidr::new(addr, prefix) {
                Some(cidr) => Some(Self::V4(cidr)),
                None => None,
            },
            Address::V6(addr) => match v6::Cidr::new(addr, prefix) {
                Some(cidr) => Some(Self::V6(cidr)),
                None => None,
            },
        }
    }

    #[inline(always)]
    ///Returns network address
    pub const fn addr(&self) -> Address {
        match self {
            Self::V4(cidr) => Address::V4(cidr.addr()),
            Self::V6(cidr) => Address::V6(cidr.addr()),
        }
    }

    #[inline(always)]
    ///Returns prefix
    pub const fn prefix(&self) -> u8 {
        match self {
            Self::V4(cidr) => cidr.prefix(),
            Self::V6(cidr) => cidr.prefix(),
        }
    }

    #[inline(always)]
    ///Returns network address, which is lowest possible address within CIDR block
    pub const fn network_addr(&self) -> Address {
        match self {
            Self::V4(cidr) => Address::V4(cidr.network_addr()),
            Self::V6(cidr) => Address::V6(cidr.network_addr()),
        }
    }

    #[inline(always)]
    ///Computes broadcast address, which is highest possible address within CIDR block
    pub const fn broadcast_addr(&self) -> Address {
        match self {
            Self::V4(cidr) => Address::V4(cidr.broadcast_addr()),
            Self::V6(cidr) => Address::V6(cidr.broadcast_addr()),
        }
    }

    #[inline(always)]
    ///Returns maximum number of addresses within the block
    pub const fn size(&self) -> Uint128 {
        match self {
            Self::V4(cidr) => Uint128::new(0, cidr.size() as u64),
            Self::V6(cidr) => cidr.size(),
        }
    }

    #[inline(always)]
    ///Returns whether `addr` belongs to the block, addresses of other family never do
    pub const fn contains(&self, addr: Address) -> bool {
        match (self, addr) {
            (Self::V4(cidr), Address::V4(addr)) => cidr.contains(addr),
            (Self::V6(cidr), Address::V6(addr)) => cidr.contains(addr),
            _ => false,
        }
    }

    #[inline(always)]
    ///Returns `network + idx` if `idx` is lower than block size
    pub const fn get(&self, idx: Uint128) -> Option<Address> {
        match self {
            Self::V4(cidr) if idx.high() == 0 && idx.low() <= u32::MAX as u64 => match cidr.get(idx.low() as u32) {
                Some(addr) => Some(Address::V4(addr)),
                None => None,
            },
            Self::V4(_) => None,
            Self::V6(cidr) => match cidr.get(idx) {
                Some(addr) => Some(Address::V6(addr)),
                None => None,
            },
        }
    }
}

impl fmt::Display for Cidr {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V4(cidr) => fmt::Display::fmt(cidr, fmt),
            Self::V6(cidr) => fmt::Display::fmt(cidr, fmt),
        }
    }
}

#[inline]
///Parses `address[/prefix]` of either family into [Cidr](enum.Cidr.html)
///
///Without `/prefix` the block covers the single address (`/32` or `/128`).
pub fn parse_cidr(text: &str) -> Result<Cidr, ParseError<'_>> {
    match parse_ip(text)? {
        (Address::V4(addr), None) => Ok(Cidr::V4(v4::Cidr::new_single(addr))),
        (Address::V4(addr), Some(prefix)) => v4::Cidr::new(addr, prefix).map(Cidr::V4).ok_or(ParseError::Ipv4CidrPrefixOverflow(prefix)),
        (Address::V6(addr), None) => Ok(Cidr::V6(v6::Cidr::new_single(addr))),
        (Address::V6(addr), Some(prefix)) => v6::Cidr::new(addr, prefix).map(Cidr::V6).ok_or(ParseError::Ipv6CidrPrefixOverflow(prefix)),
    }
}
