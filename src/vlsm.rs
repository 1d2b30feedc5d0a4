//! Variable Length Subnet Masking
//!
//! IPv4 allocation is flat: every demand is a host count and gets its own subnet, largest first.
//!
//! IPv6 allocation is hierarchical: every level is a subnet count and nests within the previous
//! level. The hierarchy is never materialized, instead each level keeps its `increment`, which is
//! the distance between sibling subnets, so that any subnet is computed from its indices as
//! `top + index[0] * increment[0] + ... + index[k] * increment[k]`.

use alloc::string::String;
use alloc::vec::Vec;
use core::iter;

use crate::base::{self, ceil_log2};
use crate::{v4, v6, Uint128};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
///Possible errors building or querying subnet allocation
pub enum VlsmError {
    ///Demand with zero hosts or subnets
    #[error("'{0}' requests zero addresses")]
    EmptyDemand(String),
    ///Demand requires more prefix bits than available
    #[error("'{name}' requires {required} bits while only {available} are available")]
    ExhaustedBits {
        ///Name of the demand
        name: String,
        ///Total bits required up to this demand
        required: u32,
        ///Bits available for allocation
        available: u32,
    },
    ///Same level name is used more than once
    #[error("Level '{0}' is specified more than once")]
    DuplicateName(String),
    ///Subnet doesn't fit into remaining address space
    #[error("'{0}' does not fit into remaining address space")]
    AddressSpaceExhausted(String),
    ///More indices than levels within hierarchy
    #[error("Got {given} indices while hierarchy has only {depth} levels")]
    TooManyIndices {
        ///Number of supplied indices
        given: usize,
        ///Number of levels
        depth: usize,
    },
    ///Index is not lower than number of requested subnets at the level
    #[error("Index {index} is out of range for level '{level}' with {requested} subnets")]
    IndexOutOfRange {
        ///Name of the level
        level: String,
        ///Supplied index
        index: u64,
        ///Number of requested subnets
        requested: u64,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
///IPv4 subnet allocated for a single demand
pub struct Subnet {
    name: String,
    hosts: u32,
    cidr: v4::Cidr,
}

impl Subnet {
    #[inline(always)]
    ///Returns name of the demand
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    ///Returns requested number of hosts
    pub fn hosts(&self) -> u32 {
        self.hosts
    }

    #[inline(always)]
    ///Returns allocated block
    pub fn cidr(&self) -> v4::Cidr {
        self.cidr
    }

    #[inline(always)]
    ///Returns subnet mask
    pub fn subnet_mask(&self) -> v4::Address {
        self.cidr.subnet_mask()
    }

    #[inline(always)]
    ///Returns network address
    pub fn network_addr(&self) -> v4::Address {
        self.cidr.network_addr()
    }

    #[inline(always)]
    ///Returns broadcast address
    pub fn broadcast_addr(&self) -> v4::Address {
        self.cidr.broadcast_addr()
    }

    #[inline]
    ///Returns range of assignable host addresses
    pub fn range(&self) -> v4::Range {
        //every subnet reserves room for at least 2 hosts
        base::Range::from_parts(self.network_addr() + 1, self.broadcast_addr() - 1)
    }
}

///Allocates IPv4 subnets for `demands` starting at `start`
///
///Each demand is `(name, hosts)`. Demands are served from the largest to the smallest, keeping
///input order between equal ones. Every subnet reserves network and broadcast addresses on top of
///requested hosts and is aligned to its own size, hence subnets never overlap.
pub fn allocate<I, N>(start: v4::Address, demands: I) -> Result<Vec<Subnet>, VlsmError>
where
    I: IntoIterator<Item = (N, u32)>,
    N: Into<String>,
{
    allocate_until(start, v4::Address::BROADCAST, demands)
}

///Allocates IPv4 subnets for `demands` within `parent` block
///
///Fails if any subnet falls outside of `parent`.
pub fn allocate_within<I, N>(parent: v4::Cidr, demands: I) -> Result<Vec<Subnet>, VlsmError>
where
    I: IntoIterator<Item = (N, u32)>,
    N: Into<String>,
{
    allocate_until(parent.network_addr(), parent.broadcast_addr(), demands)
}

fn allocate_until<I, N>(start: v4::Address, last: v4::Address, demands: I) -> Result<Vec<Subnet>, VlsmError>
where
    I: IntoIterator<Item = (N, u32)>,
    N: Into<String>,
{
    let available = u32::from(v4::BITS_LEN);
    let mut requests = Vec::new();
    for (name, hosts) in demands {
        let name = name.into();
        if hosts == 0 {
            return Err(VlsmError::EmptyDemand(name));
        }
        //network and broadcast addresses
        let host_bits = ceil_log2(u64::from(hosts) + 2);
        if host_bits > available {
            return Err(VlsmError::ExhaustedBits {
                name,
                required: host_bits,
                available,
            });
        }
        requests.push((name, hosts, host_bits));
    }
    //stable
    requests.sort_by(|left, right| right.1.cmp(&left.1));

    let last = u64::from(last.to_bits());
    let mut cursor = u64::from(start.to_bits());
    let mut subnets = Vec::with_capacity(requests.len());
    for (name, hosts, host_bits) in requests {
        let block = 1u64 << host_bits;
        let network = (cursor + block - 1) & !(block - 1);
        let broadcast = network + block - 1;
        if broadcast > last {
            return Err(VlsmError::AddressSpaceExhausted(name));
        }

        let prefix = v4::BITS_LEN - host_bits as u8;
        let cidr = v4::Cidr::from_parts(v4::Address::from_bits(network as u32), prefix);
        tracing::debug!(subnet = %name, hosts, cidr = %cidr, "allocated subnet");

        subnets.push(Subnet {
            name,
            hosts,
            cidr,
        });
        cursor = broadcast + 1;
    }

    Ok(subnets)
}

#[derive(Clone, Debug, PartialEq, Eq)]
///Single level of IPv6 hierarchy
pub struct Level {
    name: String,
    requested: u64,
    bits: u8,
    prefix: u8,
    increment: Uint128,
}

impl Level {
    #[inline(always)]
    ///Returns name of the level
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline(always)]
    ///Returns requested number of subnets per parent
    pub fn requested(&self) -> u64 {
        self.requested
    }

    #[inline(always)]
    ///Returns number of prefix bits consumed by this level
    pub fn bits(&self) -> u8 {
        self.bits
    }

    #[inline(always)]
    ///Returns prefix length of subnets at this level
    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    #[inline(always)]
    ///Returns distance between sibling subnets at this level
    ///
    ///This is `2^(128 - prefix)` modulo 2^128, i.e. zero only when the level is a single
    ///subnet spanning the whole `::/0`.
    pub fn increment(&self) -> Uint128 {
        self.increment
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
///Hierarchy of IPv6 subnets nested within top level block
pub struct Hierarchy {
    top: v6::Cidr,
    levels: Vec<Level>,
}

impl Hierarchy {
    ///Builds hierarchy from `levels`, outermost first
    ///
    ///Each level is `(name, subnets)`, where `subnets` is number of subnets within every subnet
    ///of the previous level. Level consumes `ceil(log2(subnets))` prefix bits.
    pub fn new<I, N>(top: v6::Cidr, levels: I) -> Result<Self, VlsmError>
    where
        I: IntoIterator<Item = (N, u64)>,
        N: Into<String>,
    {
        let available = u32::from(top.host_bits());
        let mut used = 0;
        let mut result: Vec<Level> = Vec::new();

        for (name, requested) in levels {
            let name = name.into();
            if requested == 0 {
                return Err(VlsmError::EmptyDemand(name));
            }
            if result.iter().any(|level| level.name == name) {
                return Err(VlsmError::DuplicateName(name));
            }

            let bits = ceil_log2(requested);
            used += bits;
            if used > available {
                return Err(VlsmError::ExhaustedBits {
                    name,
                    required: used,
                    available,
                });
            }

            //2^128 wraps to zero, such level only admits index 0
            let increment = Uint128::power_of_two(available - used).unwrap_or(Uint128::ZERO);
            let prefix = top.prefix() + used as u8;
            tracing::debug!(level_name = %name, requested, bits, prefix, increment = %increment, "computed hierarchy level");

            result.push(Level {
                name,
                requested,
                bits: bits as u8,
                prefix,
                increment,
            });
        }

        Ok(Self {
            top,
            levels: result,
        })
    }

    #[inline(always)]
    ///Returns top level block
    pub fn top(&self) -> v6::Cidr {
        self.top
    }

    #[inline(always)]
    ///Returns levels, outermost first
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    #[inline(always)]
    ///Returns number of levels
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    #[inline]
    ///Looks up level by its name
    pub fn level(&self, name: &str) -> Option<&Level> {
        self.levels.iter().find(|level| level.name == name)
    }

    ///Computes subnet identified by `indices`, one per level starting from the outermost
    ///
    ///Empty `indices` identify top level block.
    pub fn subnet(&self, indices: &[u64]) -> Result<v6::Cidr, VlsmError> {
        if indices.len() > self.levels.len() {
            return Err(VlsmError::TooManyIndices {
                given: indices.len(),
                depth: self.levels.len(),
            });
        }

        let mut addr = self.top.network_addr();
        let mut prefix = self.top.prefix();
        for (level, index) in self.levels.iter().zip(indices.iter().copied()) {
            if index >= level.requested {
                return Err(VlsmError::IndexOutOfRange {
                    level: level.name.clone(),
                    index,
                    requested: level.requested,
                });
            }

            addr = addr + level.increment * index;
            prefix = level.prefix;
        }

        tracing::trace!(?indices, addr = %addr, prefix, "resolved subnet");
        Ok(v6::Cidr::from_parts(addr, prefix))
    }

    ///Returns iterator over requested subnets directly below subnet identified by `parent`
    pub fn children(&self, parent: &[u64]) -> Result<Children<'_>, VlsmError> {
        let cidr = self.subnet(parent)?;
        match self.levels.get(parent.len()) {
            Some(level) => Ok(Children {
                parent: cidr,
                level,
                next: 0,
            }),
            None => Err(VlsmError::TooManyIndices {
                given: parent.len() + 1,
                depth: self.levels.len(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
///Iterator over sibling subnets, created by [Hierarchy::children](struct.Hierarchy.html#method.children)
pub struct Children<'a> {
    parent: v6::Cidr,
    level: &'a Level,
    next: u64,
}

impl Iterator for Children<'_> {
    type Item = v6::Cidr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.level.requested {
            return None;
        }

        let addr = self.parent.network_addr() + self.level.increment * self.next;
        self.next += 1;
        Some(v6::Cidr::from_parts(addr, self.level.prefix))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.level.requested - self.next) {
            Ok(len) => (len, Some(len)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl iter::FusedIterator for Children<'_> {}
