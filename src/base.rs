//! Family independent building blocks: CIDR, address range and the per-family method generator

use core::fmt;

///Address of a single IP family
pub trait NetworkAddress: Clone + Copy + fmt::Debug + fmt::Display + PartialEq + Eq + PartialOrd + Ord {
    ///Address length in bits
    const BITS_LEN: u8;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
///CIDR representation of network
///
///Address is always the network address of the block: host bits are cleared on construction.
pub struct Cidr<A> {
    prefix: u8,
    addr: A,
}

impl<A: NetworkAddress> Cidr<A> {
    #[inline(always)]
    //Caller guarantees `addr` is already masked by `prefix`
    pub(crate) const fn from_parts(addr: A, prefix: u8) -> Self {
        Self {
            addr,
            prefix,
        }
    }

    #[inline(always)]
    ///Returns address
    pub const fn addr(&self) -> A {
        self.addr
    }

    #[inline(always)]
    ///Returns prefix
    pub const fn prefix(&self) -> u8 {
        self.prefix
    }

    #[inline(always)]
    ///Returns number of host bits, which is address length minus prefix
    pub const fn host_bits(&self) -> u8 {
        A::BITS_LEN - self.prefix
    }
}

impl<A: NetworkAddress> fmt::Display for Cidr<A> {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { addr, prefix } = self;
        fmt.write_fmt(format_args!("{addr}/{prefix}"))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
///Inclusive range of addresses
pub struct Range<A> {
    from: A,
    to: A,
}

impl<A: NetworkAddress> Range<A> {
    #[inline(always)]
    //Caller guarantees `from <= to`
    pub(crate) const fn from_parts(from: A, to: A) -> Self {
        Self {
            from,
            to,
        }
    }

    #[inline]
    ///Creates new range `from..=to`
    ///
    ///Returns `None` if `to` is lower than `from`
    pub fn new(from: A, to: A) -> Option<Self> {
        if to < from {
            None
        } else {
            Some(Self {
                from,
                to,
            })
        }
    }

    #[inline(always)]
    ///Returns first address
    pub const fn from(&self) -> A {
        self.from
    }

    #[inline(always)]
    ///Returns last address
    pub const fn to(&self) -> A {
        self.to
    }

    #[inline(always)]
    ///Checks if a given `addr` is contained within `self`
    pub fn contains(&self, addr: A) -> bool {
        self.from <= addr && addr <= self.to
    }
}

impl<A: NetworkAddress> fmt::Display for Range<A> {
    #[inline(always)]
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { from, to } = self;
        fmt.write_fmt(format_args!("{from}-{to}"))
    }
}

#[inline]
///Returns smallest `exp` such that `2^exp >= value`
///
///Both `0` and `1` require no bits.
pub const fn ceil_log2(value: u64) -> u32 {
    match value {
        0 | 1 => 0,
        value => u64::BITS - (value - 1).leading_zeros(),
    }
}

macro_rules! impl_base_methods {
    ($typ:ty where REPR=$repr:ty, ONE=$one:expr, OPS=$ops:ident, PARSE=$parse:path, OVERFLOW=$overflow:path) => {
        #[inline]
        ///Returns subnet mask with `prefix` leading ones, `prefix` must not exceed address length
        pub const fn mask(prefix: u8) -> $typ {
            match prefix {
                0 => <$typ>::UNSPECIFIED,
                prefix => {
                    let mask = $ops::shl(<$repr>::MAX, BITS_LEN.saturating_sub(prefix) as u32);
                    <$typ>::from_bits(mask)
                }
            }
        }

        #[inline]
        ///Clears host bits of `addr`, giving first address of the `/prefix` block
        pub const fn network_addr(addr: $typ, prefix: u8) -> $typ {
            let mask = mask(prefix).to_bits();
            <$typ>::from_bits($ops::and(addr.to_bits(), mask))
        }

        #[inline]
        ///Sets host bits of `addr`, giving last address of the `/prefix` block
        pub const fn broadcast_addr(addr: $typ, prefix: u8) -> $typ {
            let mask = mask(prefix).to_bits();
            <$typ>::from_bits($ops::or(addr.to_bits(), $ops::not(mask)))
        }

        #[inline]
        ///Returns number of possible addresses
        ///
        ///For `/0` the count doesn't fit the integer, hence maximum value is returned
        pub const fn size(prefix: u8) -> $repr {
            match prefix {
                0 => <$repr>::MAX,
                prefix => $ops::shl($one, BITS_LEN.saturating_sub(prefix) as u32),
            }
        }

        impl $crate::base::Cidr<$typ> {
            #[inline]
            ///Constructs new CIDR verifying that `prefix` fits provided `addr`
            ///
            ///`addr` is masked down to the network address.
            ///
            ///Returns `None` if `prefix` is greater than address length
            pub const fn new(addr: $typ, prefix: u8) -> Option<Self> {
                if prefix > BITS_LEN {
                    None
                } else {
                    Some(Self::from_parts(network_addr(addr, prefix), prefix))
                }
            }

            #[inline(always)]
            ///Constructs CIDR covering single address
            pub const fn new_single(addr: $typ) -> Self {
                Self::from_parts(addr, BITS_LEN)
            }

            ///Parses CIDR from `address/prefix` text
            pub fn parse(text: &str) -> Result<Self, $crate::ParseError<'_>> {
                match $parse(text, true)? {
                    (addr, Some(prefix)) => match Self::new(addr, prefix) {
                        Some(cidr) => Ok(cidr),
                        None => Err($overflow(prefix)),
                    },
                    (_, None) => Err($crate::ParseError::MissingCidr),
                }
            }

            #[inline(always)]
            ///Returns network address, which is lowest possible address within CIDR block
            pub const fn network_addr(&self) -> $typ {
                self.addr()
            }

            #[inline(always)]
            ///Computes broadcast address, which is highest possible address within CIDR block
            pub const fn broadcast_addr(&self) -> $typ {
                broadcast_addr(self.addr(), self.prefix())
            }

            #[inline(always)]
            ///Returns subnet mask of the block
            pub const fn subnet_mask(&self) -> $typ {
                mask(self.prefix())
            }

            #[inline(always)]
            ///Returns wildcard mask, which is complement of the subnet mask
            pub const fn wildcard_mask(&self) -> $typ {
                <$typ>::from_bits($ops::not(mask(self.prefix()).to_bits()))
            }

            #[inline(always)]
            ///Returns range from network to broadcast address
            pub const fn range(&self) -> $crate::base::Range<$typ> {
                $crate::base::Range::from_parts(self.network_addr(), self.broadcast_addr())
            }

            #[inline(always)]
            ///Returns whether `addr` belongs to the block
            pub const fn contains(&self, addr: $typ) -> bool {
                let masked = $ops::and(addr.to_bits(), mask(self.prefix()).to_bits());
                $ops::eq(masked, self.network_addr().to_bits())
            }

            #[inline(always)]
            ///Returns number of possible addresses
            pub const fn size(&self) -> $repr {
                size(self.prefix())
            }

            #[inline(always)]
            ///Returns `network + idx` if `idx` is lower than block size
            pub const fn get(&self, idx: $repr) -> Option<$typ> {
                if $ops::lower(idx, self.size()) {
                    Some(self.get_unchecked(idx))
                } else {
                    None
                }
            }

            #[inline]
            ///Returns `network + idx` without bounds check
            ///
            ///Out of block indices wrap around address space.
            pub const fn get_unchecked(&self, idx: $repr) -> $typ {
                let net = self.network_addr().to_bits();
                <$typ>::from_bits(net.wrapping_add(idx))
            }

            ///Returns how many blocks of `2^subnet_bits` addresses fit within `self`
            ///
            ///Returns zero if a single such block is larger than `self`.
            ///When result would be exactly `2^BITS_LEN`, maximum value is returned.
            pub const fn maximum_subnets(&self, subnet_bits: u8) -> $repr {
                let available = BITS_LEN as i16 - self.prefix() as i16 - subnet_bits as i16;
                if available < 0 {
                    <$repr>::MIN
                } else if available >= BITS_LEN as i16 {
                    <$repr>::MAX
                } else {
                    $ops::shl($one, available as u32)
                }
            }
        }

        impl $crate::base::Range<$typ> {
            #[inline(always)]
            ///Returns `to - from`
            pub const fn total_addresses(&self) -> $repr {
                self.to().to_bits().wrapping_sub(self.from().to_bits())
            }
        }
    }
}

pub(super) use impl_base_methods;
