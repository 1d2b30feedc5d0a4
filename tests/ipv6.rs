use core::net;

use proptest::prelude::*;
use subnetter::v6::{self, HextetFormat};
use subnetter::{Address, Cidr, ParseError, Uint128};

#[test]
fn should_verify_v6_prefix_size() {
    let addr = v6::Address::UNSPECIFIED;

    let mut cidr = v6::Cidr::new(addr, 0).expect("to create");
    //Broadcast address is never included
    assert_eq!(cidr.size(), Uint128::MAX, "/0 has invalid size");
    assert_eq!(cidr.get(Uint128::MAX), None);
    assert_eq!(cidr.get(Uint128::MAX.decrement()), Some(v6::Address::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX - 1)));
    for prefix in 1..=128 {
        cidr = v6::Cidr::new(addr, prefix).expect("to create");
        let expected_size = Uint128::power_of_two((128 - prefix) as _).expect("to fit");
        assert_eq!(cidr.size(), expected_size, "/{} has invalid size", prefix);

        let mut addr = v6::Address::from_bits(Uint128::ZERO);
        assert!(cidr.contains(addr), "{} is not contained in cidr={}", addr, cidr);
        addr = v6::Address::from_bits(expected_size.decrement());
        assert!(cidr.contains(addr), "{} is not contained in cidr={}", addr, cidr);
        addr = v6::Address::from_bits(expected_size);
        assert!(!cidr.contains(addr), "{} is contained in cidr={}", addr, cidr);
    }

    assert!(v6::Cidr::new(addr, 129).is_none());

    //check math never panics
    cidr = v6::Cidr::new(v6::Address::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX - 3), 127).expect("to create");
    assert_eq!(cidr.size(), Uint128::from(2u8));
    assert_eq!(cidr.get_unchecked(Uint128::from(0u8)), v6::Address::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX - 3));
    assert_eq!(cidr.get_unchecked(Uint128::from(1u8)), v6::Address::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX - 2));
    assert_eq!(cidr.get_unchecked(Uint128::from(2u8)), v6::Address::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX - 1));

    //wrap
    assert_eq!(cidr.get_unchecked(Uint128::from(3u8)), v6::Address::new(u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX, u16::MAX));
    assert_eq!(cidr.get_unchecked(Uint128::from(4u8)), v6::Address::new(0, 0, 0, 0, 0, 0, 0, 0));
}

#[test]
fn should_derive_cidr_range() {
    let cidr = v6::Cidr::parse("2001:db8:cad::/48").expect("to parse");
    let range = cidr.range();

    assert_eq!(range.from(), v6::Address::new(0x2001, 0xdb8, 0xcad, 0, 0, 0, 0, 0));
    assert_eq!(range.to(), v6::Address::new(0x2001, 0xdb8, 0xcad, 0xffff, 0xffff, 0xffff, 0xffff, 0xffff));
    assert_eq!(range.total_addresses(), Uint128::power_of_two(80).expect("to fit").decrement());
    assert_eq!(cidr.broadcast_addr(), range.to());
    assert_eq!(cidr.subnet_mask().to_string(), "ffff:ffff:ffff::");
    assert_eq!(cidr.wildcard_mask().to_string(), "::ffff:ffff:ffff:ffff:ffff");
    assert_eq!(cidr.host_bits(), 80);
    assert_eq!(range.to_string(), "2001:db8:cad::-2001:db8:cad:ffff:ffff:ffff:ffff:ffff");

    let full = v6::Cidr::new(v6::Address::UNSPECIFIED, 0).expect("to create");
    assert_eq!(full.range().total_addresses(), Uint128::MAX);
}

#[test]
fn should_mask_address_on_construction() {
    let addr = v6::Address::parse("2001:db8:cad:1::5").expect("to parse");
    let cidr = v6::Cidr::new(addr, 48).expect("to create");

    assert_eq!(cidr.addr(), v6::Address::parse("2001:db8:cad::").expect("to parse"));
    assert!(cidr.contains(addr));
    assert_eq!(cidr.to_string(), "2001:db8:cad::/48");

    let single = v6::Cidr::new_single(addr);
    assert_eq!(single.addr(), addr);
    assert_eq!(single.prefix(), 128);
}

#[test]
fn should_compute_cidr_in_const_context() {
    const BLOCK: v6::Cidr = match v6::Cidr::new(v6::Address::new(0x2001, 0xdb8, 0xcad, 1, 0, 0, 0, 5), 48) {
        Some(cidr) => cidr,
        None => panic!("invalid prefix"),
    };
    const BROADCAST: v6::Address = BLOCK.broadcast_addr();
    const WILDCARD: v6::Address = BLOCK.wildcard_mask();
    const CONTAINS: bool = BLOCK.contains(v6::Address::new(0x2001, 0xdb8, 0xcad, 0xffff, 0, 0, 0, 1));
    const OUTSIDE: bool = BLOCK.contains(v6::Address::new(0x2001, 0xdb8, 0xcae, 0, 0, 0, 0, 0));
    const SIZE: Uint128 = BLOCK.size();
    const LAST: Option<v6::Address> = BLOCK.get(SIZE.decrement());
    const PAST: Option<v6::Address> = BLOCK.get(SIZE);

    assert_eq!(BLOCK.addr(), v6::Address::new(0x2001, 0xdb8, 0xcad, 0, 0, 0, 0, 0));
    assert_eq!(BROADCAST.to_string(), "2001:db8:cad:ffff:ffff:ffff:ffff:ffff");
    assert_eq!(WILDCARD.to_string(), "::ffff:ffff:ffff:ffff:ffff");
    assert!(CONTAINS);
    assert!(!OUTSIDE);
    assert_eq!(LAST, Some(BROADCAST));
    assert_eq!(PAST, None);
}

#[test]
fn should_compute_maximum_subnets() {
    let cidr = v6::Cidr::parse("2001:db8:cad::/48").expect("to parse");

    assert_eq!(cidr.maximum_subnets(64), Uint128::from(1u32 << 16));
    assert_eq!(cidr.maximum_subnets(80), Uint128::ONE);
    assert_eq!(cidr.maximum_subnets(81), Uint128::ZERO);
    assert_eq!(cidr.maximum_subnets(128), Uint128::ZERO);
    assert_eq!(cidr.maximum_subnets(0), Uint128::power_of_two(80).expect("to fit"));

    let full = v6::Cidr::new(v6::Address::UNSPECIFIED, 0).expect("to create");
    assert_eq!(full.maximum_subnets(0), Uint128::MAX);
    assert_eq!(full.maximum_subnets(1), Uint128::power_of_two(127).expect("to fit"));
}

#[test]
fn should_parse_ipv6() {
    let inputs = [
        ("2001:db8::4a4a:2100", v6::Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0x4a4a, 0x2100)),
        ("2001:0db8:0000:0000:0000:0000:4a4a:2100", v6::Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0x4a4a, 0x2100)),
        ("2001:db8:0:1:1:1:1:1", v6::Address::new(0x2001, 0xdb8, 0, 1, 1, 1, 1, 1)),
        ("::1", v6::Address::LOCALHOST),
        ("::", v6::Address::UNSPECIFIED),
        ("1::", v6::Address::new(1, 0, 0, 0, 0, 0, 0, 0)),
        ("fe80::1:2", v6::Address::new(0xfe80, 0, 0, 0, 0, 0, 1, 2)),
        ("2001:DB8::1", v6::Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1)),
        ("1:2:3:4:5:6::8", v6::Address::new(1, 2, 3, 4, 5, 6, 0, 8)),
    ];

    for (prefix, (text, expected_ip)) in inputs.iter().enumerate() {
        println!("Parse '{text}'");
        assert_eq!(v6::Address::parse(text), Ok(*expected_ip));

        let (ip, cidr) = match subnetter::parse_ip(text) {
            Ok(result) => result,
            Err(error) => panic!("Should parse '{text}' but got error={error}"),
        };
        assert_eq!(ip, Address::V6(*expected_ip));
        assert!(cidr.is_none());

        let with_cidr = format!("{text}/{prefix}");
        println!("Parse '{with_cidr}'");
        let (ip, cidr) = match subnetter::parse_ip(&with_cidr) {
            Ok(result) => result,
            Err(error) => panic!("Should parse '{with_cidr}' but got error={error}"),
        };
        assert_eq!(ip, Address::V6(*expected_ip));
        assert_eq!(cidr, Some(prefix as u8));
    }
}

#[test]
fn should_not_parse_ipv6() {
    let inputs = [
        ("", ParseError::MissingIp),
        ("1:2:3:4:5:6:7:8:9", ParseError::Ipv6InvalidComponentSize(9)),
        ("1:2:3:4:5:6:7::8", ParseError::Ipv6InvalidComponentSize(9)),
        ("1:2:3", ParseError::Ipv6InvalidComponentSize(3)),
        ("1::2::3", ParseError::Ipv6MultipleZeroAbbrv),
        (":::", ParseError::Ipv6MultipleZeroAbbrv),
        ("12345::", ParseError::InvalidComponent("12345")),
        ("00001::", ParseError::InvalidComponent("00001")),
        ("0000000000002001:db8::1", ParseError::InvalidComponent("0000000000002001")),
        (":1::", ParseError::InvalidIpv6),
        ("1:2:3:4:5:6:7:8:", ParseError::InvalidIpv6),
        ("g::", ParseError::UnexpectedCharacter('g', 0)),
        ("::ffff:1.2.3.4", ParseError::InvalidIpv6),
        ("2001:db8::/32", ParseError::UnexpectedCharacter('/', 10)),
    ];

    for (text, expected_error) in inputs.iter() {
        println!("Parse '{text}'");
        let error = v6::Address::parse(text).expect_err("should fail");
        assert_eq!(error, *expected_error);
    }

    assert_eq!(v6::Address::parse("10.0.0.1"), Err(ParseError::InvalidIpv6));
}

#[test]
fn should_parse_ipv6_cidr() {
    let cidr = v6::Cidr::parse("2001:db8:cad::/48").expect("to parse");
    assert_eq!(cidr.addr(), v6::Address::new(0x2001, 0xdb8, 0xcad, 0, 0, 0, 0, 0));
    assert_eq!(cidr.prefix(), 48);

    assert_eq!(v6::Cidr::parse("2001:db8::"), Err(ParseError::MissingCidr));
    assert_eq!(v6::Cidr::parse("2001:db8::/"), Err(ParseError::MissingCidr));
    assert_eq!(v6::Cidr::parse("2001:db8::/129"), Err(ParseError::Ipv6CidrPrefixOverflow(129)));
    assert_eq!(v6::Cidr::parse("2001:db8::/abc"), Err(ParseError::InvalidCidr("abc")));
    assert_eq!(v6::Cidr::parse("2001:db8::/300"), Err(ParseError::InvalidCidr("300")));
    assert_eq!(v6::Cidr::parse("2001:db8::/+48"), Err(ParseError::InvalidCidr("+48")));
    assert_eq!(subnetter::parse_cidr("2001:db8::/+48"), Err(ParseError::InvalidCidr("+48")));

    match subnetter::parse_cidr("::1").expect("to parse") {
        Cidr::V6(cidr) => {
            assert_eq!(cidr.prefix(), 128);
            assert_eq!(cidr.addr(), v6::Address::LOCALHOST);
        },
        Cidr::V4(cidr) => panic!("Unexpected IPv4 {cidr}"),
    }

    let cidr = subnetter::parse_cidr("2001:db8::1/64").expect("to parse");
    assert_eq!(cidr.to_string(), "2001:db8::/64");
    assert!(!cidr.contains(Address::V4(subnetter::v4::Address::UNSPECIFIED)));
}

#[test]
fn should_format_short() {
    let inputs = [
        ([0x2001, 0x0db8, 0, 0, 0, 0, 0x4a4a, 0x2100], "2001:db8::4a4a:2100"),
        ([0x2001, 0xdb8, 0, 1, 1, 1, 1, 1], "2001:db8:0:1:1:1:1:1"),
        //longest run wins
        ([0x2001, 0, 0, 1, 0, 0, 0, 1], "2001:0:0:1::1"),
        //leftmost run wins on ties
        ([0x2001, 0xdb8, 0, 0, 1, 0, 0, 1], "2001:db8::1:0:0:1"),
        ([0, 0, 0, 0, 0, 0, 0, 0], "::"),
        ([0, 0, 0, 0, 0, 0, 0, 1], "::1"),
        ([1, 0, 0, 0, 0, 0, 0, 0], "1::"),
        ([0, 1, 1, 1, 1, 1, 1, 1], "0:1:1:1:1:1:1:1"),
        ([1, 1, 1, 1, 1, 1, 1, 0], "1:1:1:1:1:1:1:0"),
        ([0xfe80, 0, 0, 0, 0xABCD, 0, 0, 0], "fe80::abcd:0:0:0"),
    ];

    for (hextets, expected) in inputs.iter() {
        let addr = v6::Address::from_hextets(*hextets);
        assert_eq!(addr.to_string(), *expected);
        assert_eq!(addr.to_string_short(), *expected);
        assert_eq!(v6::Address::parse(expected), Ok(addr), "'{expected}' doesn't round trip");
    }
}

#[test]
fn should_format_full() {
    let addr = v6::Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0x4a4a, 0x2100);

    assert_eq!(addr.to_string_full(HextetFormat::Plain), "2001:db8:0:0:0:0:4a4a:2100");
    assert_eq!(addr.to_string_full(HextetFormat::Padded), "2001:0db8:0000:0000:0000:0000:4a4a:2100");
    assert_eq!(format!("{}", addr.full(HextetFormat::default())), "2001:db8:0:0:0:0:4a4a:2100");
    //idempotent
    assert_eq!(addr.to_string_full(HextetFormat::Padded), addr.to_string_full(HextetFormat::Padded));
    assert_eq!(addr.to_string_short(), addr.to_string_short());
}

#[test]
fn should_iterate_hextets() {
    let addr = v6::Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0x4a4a, 0x2100);
    let expected = [0x2001, 0xdb8, 0, 0, 0, 0, 0x4a4a, 0x2100];

    let hextets = addr.hextets();
    assert_eq!(hextets.len(), 8);
    assert_eq!(hextets.clone().collect::<Vec<_>>(), expected);
    assert_eq!(hextets.rev().collect::<Vec<_>>(), expected.iter().rev().copied().collect::<Vec<_>>());
    //restartable
    assert_eq!(addr.hextets().collect::<Vec<_>>(), expected);
    assert_eq!(addr.to_hextets(), expected);
    assert_eq!(addr.hextet(0), Some(0x2001));
    assert_eq!(addr.hextet(7), Some(0x2100));
    assert_eq!(addr.hextet(8), None);

    let mut hextets = addr.hextets();
    assert_eq!(hextets.next(), Some(0x2001));
    assert_eq!(hextets.next_back(), Some(0x2100));
    assert_eq!(hextets.len(), 6);
}

#[test]
fn should_do_address_arithmetic() {
    let addr = v6::Address::parse("::ffff").expect("to parse");
    assert_eq!((addr + Uint128::ONE).to_string(), "::1:0");
    assert_eq!((addr - Uint128::from(0xffffu32)), v6::Address::UNSPECIFIED);
    assert_eq!(v6::Address::LOCALHOST - Uint128::from(2u8), v6::Address::from_bits(Uint128::MAX));

    let from = v6::Address::parse("2001:db8::").expect("to parse");
    let to = v6::Address::parse("2001:db8::1:0").expect("to parse");
    assert_eq!(to - from, Uint128::from(0x10000u32));
    assert!(from < to);

    assert!(v6::Range::new(to, from).is_none());
    let range = v6::Range::new(from, to).expect("valid range");
    assert_eq!(range.total_addresses(), Uint128::from(0x10000u32));
    assert!(range.contains(from + Uint128::from(5u8)));
    assert!(!range.contains(to + Uint128::ONE));
}

#[test]
fn should_convert_from_std() {
    let std_addr: net::Ipv6Addr = "2001:db8::4a4a:2100".parse().expect("to parse");
    let addr = v6::Address::from(std_addr);

    assert_eq!(addr, v6::Address::new(0x2001, 0xdb8, 0, 0, 0, 0, 0x4a4a, 0x2100));
    assert_eq!(net::Ipv6Addr::from(addr), std_addr);
}

fn hextet() -> impl Strategy<Value = u16> {
    prop_oneof![Just(0u16), Just(0u16), any::<u16>()]
}

proptest! {
    #[test]
    fn short_form_should_round_trip(hextets in prop::array::uniform8(hextet())) {
        let addr = v6::Address::from_hextets(hextets);
        let text = addr.to_string();
        prop_assert_eq!(v6::Address::parse(&text), Ok(addr));
        prop_assert!(text.matches("::").count() <= 1);
    }

    #[test]
    fn full_form_should_round_trip(bits in any::<u128>()) {
        let addr = v6::Address::from_bits(Uint128::from_u128(bits));
        let plain = addr.to_string_full(HextetFormat::Plain);
        prop_assert_eq!(v6::Address::parse(&plain), Ok(addr));
        let padded = addr.to_string_full(HextetFormat::Padded);
        prop_assert_eq!(v6::Address::parse(&padded), Ok(addr));
    }

    #[test]
    fn short_form_should_match_std(hextets in prop::array::uniform8(hextet()), first in 1..=u16::MAX) {
        //avoid IPv4 mapped addresses which std renders in dotted form
        let mut hextets = hextets;
        hextets[0] = first;
        let addr = v6::Address::from_hextets(hextets);
        let std_addr = net::Ipv6Addr::from(hextets);
        prop_assert_eq!(addr.to_string(), std_addr.to_string());
    }

    #[test]
    fn single_zero_should_not_be_compressed(hextets in prop::array::uniform8(1..=u16::MAX), idx in 0usize..8) {
        let mut hextets = hextets;
        hextets[idx] = 0;
        let text = v6::Address::from_hextets(hextets).to_string();
        prop_assert!(!text.contains("::"), "'{}' is compressed", text);
        prop_assert_eq!(text.split(':').count(), 8);
    }
}
