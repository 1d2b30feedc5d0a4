//! Text parsing of IP addresses
//!
//! Single pass over input bytes, driven by a small state machine. Every function is `const` so
//! addresses can be parsed at compile time.

use core::str;

use crate::{v4, v6, Address};

const MAX_OCTETS: u8 = 4;
const MAX_HEXTETS: u8 = 8;

#[derive(Clone, Copy)]
enum Family {
    Detect,
    V4,
    V6,
}

//What the previous byte was
#[derive(Clone, Copy)]
enum Step {
    Start,
    Component,
    Dot,
    Colon,
}

struct Parser<'a> {
    input: &'a [u8],
    family: Family,
    step: Step,
    //Whether `/prefix` suffix is accepted
    with_prefix: bool,
    //Input begins with a single `:` that must be followed by another one
    leading_colon: bool,
    //Index of the component where `::` was found, if any
    gap_at: Option<u8>,
    //Offset of the first byte of the current component
    component_start: usize,
    //IPv4 uses first 4 slots only, missing trailing octets stay zero
    parts: [u16; MAX_HEXTETS as usize],
    parts_len: u8,
}

impl<'a> Parser<'a> {
    const fn new(text: &'a str, family: Family, with_prefix: bool) -> Self {
        Self {
            input: text.as_bytes(),
            family,
            step: Step::Start,
            with_prefix,
            leading_colon: false,
            gap_at: None,
            component_start: 0,
            parts: [0; MAX_HEXTETS as usize],
            parts_len: 0,
        }
    }

    //Parser only splits on ASCII bytes, hence conversion cannot fail
    const fn text(&self, start: usize, end: usize) -> &'a str {
        let (_, rest) = self.input.split_at(start);
        let (component, _) = rest.split_at(end.saturating_sub(start));
        match str::from_utf8(component) {
            Ok(component) => component,
            Err(_) => "",
        }
    }

    const fn push_component(&mut self, end: usize) -> Result<(), ParseError<'a>> {
        let text = self.text(self.component_start, end);
        let value = match self.family {
            Family::V4 if self.parts_len >= MAX_OCTETS => return Err(ParseError::Ipv4InvalidComponentSize(self.parts_len + 1)),
            Family::V6 if self.parts_len >= MAX_HEXTETS => return Err(ParseError::Ipv6InvalidComponentSize(self.parts_len + 1)),
            Family::V4 => match u8::from_str_radix(text, 10) {
                Ok(octet) => octet as u16,
                Err(_) => return Err(ParseError::InvalidComponent(text)),
            },
            //hextet is 1 to 4 digits, leading zeros included
            Family::V6 if end - self.component_start > 4 => return Err(ParseError::InvalidComponent(text)),
            Family::V6 => match u16::from_str_radix(text, 16) {
                Ok(hextet) => hextet,
                Err(_) => return Err(ParseError::InvalidComponent(text)),
            },
            Family::Detect => return Ok(()),
        };

        self.parts[self.parts_len as usize] = value;
        self.parts_len += 1;
        Ok(())
    }

    //Shifts components written after `::` to the tail
    const fn fill_gap(&mut self, gap_at: u8) {
        let zeros = (MAX_HEXTETS - self.parts_len) as usize;
        let gap_at = gap_at as usize;
        let mut idx = self.parts_len as usize;
        while idx > gap_at {
            idx -= 1;
            self.parts[idx + zeros] = self.parts[idx];
            self.parts[idx] = 0;
        }
        self.parts_len = MAX_HEXTETS;
    }

    const fn build(&mut self) -> Result<Address, ParseError<'a>> {
        let parts = self.parts;
        match self.family {
            Family::V4 => Ok(Address::V4(v4::Address::new(parts[0] as u8, parts[1] as u8, parts[2] as u8, parts[3] as u8))),
            Family::V6 => match self.gap_at {
                //`::` stands for at least one zero hextet
                Some(_) if self.parts_len >= MAX_HEXTETS => Err(ParseError::Ipv6InvalidComponentSize(MAX_HEXTETS + 1)),
                Some(gap_at) => {
                    self.fill_gap(gap_at);
                    Ok(Address::V6(v6::Address::from_hextets(self.parts)))
                },
                None if self.parts_len == MAX_HEXTETS => Ok(Address::V6(v6::Address::from_hextets(parts))),
                None => Err(ParseError::Ipv6InvalidComponentSize(self.parts_len)),
            },
            Family::Detect => match self.step {
                Step::Start => Err(ParseError::MissingIp),
                _ => Err(ParseError::InvalidIp),
            },
        }
    }

    const fn on_hex_digit(&mut self, pos: usize) -> Result<(), ParseError<'a>> {
        match self.step {
            Step::Component => Ok(()),
            Step::Colon if self.leading_colon => Err(ParseError::InvalidIpv6),
            _ => {
                self.step = Step::Component;
                self.component_start = pos;
                Ok(())
            },
        }
    }

    const fn on_dot(&mut self, pos: usize) -> Result<(), ParseError<'a>> {
        match (self.step, self.family) {
            (Step::Component, Family::V6) | (Step::Colon, Family::V6) => return Err(ParseError::InvalidIpv6),
            (Step::Component, _) => {
                self.family = Family::V4;
                if let Err(error) = self.push_component(pos) {
                    return Err(error);
                }
            },
            _ => return Err(ParseError::InvalidIpv4),
        }
        self.step = Step::Dot;
        Ok(())
    }

    const fn on_colon(&mut self, pos: usize) -> Result<(), ParseError<'a>> {
        match (self.step, self.family) {
            (_, Family::V4) | (Step::Dot, _) => return Err(ParseError::InvalidIpv4),
            (Step::Component, _) => {
                self.family = Family::V6;
                if let Err(error) = self.push_component(pos) {
                    return Err(error);
                }
            },
            (Step::Colon, _) => {
                if self.gap_at.is_some() {
                    return Err(ParseError::Ipv6MultipleZeroAbbrv);
                }
                self.gap_at = Some(self.parts_len);
                self.leading_colon = false;
                self.family = Family::V6;
            },
            (Step::Start, _) => self.leading_colon = true,
        }
        self.step = Step::Colon;
        Ok(())
    }

    //Completes address at `end`, which is either end of input or `/`
    const fn finish(&mut self, end: usize) -> Result<Address, ParseError<'a>> {
        match self.step {
            Step::Component => match self.push_component(end) {
                Ok(()) => self.build(),
                Err(error) => Err(error),
            },
            Step::Colon if self.gap_at.is_some() => match self.parts_len {
                0 => Ok(Address::V6(v6::Address::UNSPECIFIED)),
                _ => self.build(),
            },
            Step::Colon => Err(ParseError::InvalidIpv6),
            Step::Dot => Err(ParseError::InvalidIpv4),
            Step::Start => Err(ParseError::MissingIp),
        }
    }

    //Reads prefix following `/` at `pos`
    const fn read_prefix(&self, pos: usize) -> Result<u8, ParseError<'a>> {
        let start = pos + 1;
        if start >= self.input.len() {
            return Err(ParseError::MissingCidr);
        }

        let text = self.text(start, self.input.len());
        //`from_str_radix` also accepts leading `+`
        if !self.input[start].is_ascii_digit() {
            return Err(ParseError::InvalidCidr(text));
        }
        let prefix = match u8::from_str_radix(text, 10) {
            Ok(prefix) => prefix,
            Err(_) => return Err(ParseError::InvalidCidr(text)),
        };
        match self.family {
            Family::V4 if prefix > v4::BITS_LEN => Err(ParseError::Ipv4CidrPrefixOverflow(prefix)),
            Family::V6 if prefix > v6::BITS_LEN => Err(ParseError::Ipv6CidrPrefixOverflow(prefix)),
            Family::V4 | Family::V6 => Ok(prefix),
            Family::Detect => Err(ParseError::InvalidCidr(text)),
        }
    }

    const fn run(mut self) -> Result<(Address, Option<u8>), ParseError<'a>> {
        let mut pos = 0;

        while pos < self.input.len() {
            let byte = self.input[pos];
            let step = match byte {
                b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F' => self.on_hex_digit(pos),
                b'.' => self.on_dot(pos),
                b':' => self.on_colon(pos),
                b'/' if self.with_prefix => {
                    let addr = match self.finish(pos) {
                        Ok(addr) => addr,
                        Err(error) => return Err(error),
                    };
                    return match self.read_prefix(pos) {
                        Ok(prefix) => Ok((addr, Some(prefix))),
                        Err(error) => Err(error),
                    };
                },
                byte if byte.is_ascii() => Err(ParseError::UnexpectedCharacter(byte as char, pos)),
                _ => Err(ParseError::NonAsciiCharacter(pos)),
            };
            if let Err(error) = step {
                return Err(error);
            }

            pos += 1;
        }

        match self.finish(pos) {
            Ok(addr) => Ok((addr, None)),
            Err(error) => Err(error),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
///Possible errors parsings IP addr
pub enum ParseError<'a> {
    ///Invalid address component
    #[error("Invalid address component: {0}")]
    InvalidComponent(&'a str),
    ///Invalid CIDR prefix
    #[error("Invalid Cidr prefix: {0}")]
    InvalidCidr(&'a str),
    ///Unexpected character with position where it is encountered at
    #[error("Encountered unexpected character '{0}' at idx={1}")]
    UnexpectedCharacter(char, usize),
    ///Input is not valid IP
    #[error("Input is not valid IP")]
    InvalidIp,
    ///Address is not valid IPv4
    #[error("Address is not valid IPv4")]
    InvalidIpv4,
    ///IPv4 Address must have at most 4 components
    #[error("IPv4 Address has '{0}' components but expected at most 4")]
    Ipv4InvalidComponentSize(u8),
    ///Address is not valid IPv6
    #[error("Address is not valid IPv6")]
    InvalidIpv6,
    ///IPv6 Address must have 8 components
    #[error("IPv6 Address has '{0}' components but expected 8")]
    Ipv6InvalidComponentSize(u8),
    ///IPv6 contains more than 1 zero abbreviation
    #[error("IPv6 contains more than 1 zero abbreviation")]
    Ipv6MultipleZeroAbbrv,
    ///Unexpected Non-ASCII character encountered
    #[error("Encountered non-ASCII character at idx={0}")]
    NonAsciiCharacter(usize),
    ///IP address is not specified
    #[error("Address is not specified")]
    MissingIp,
    ///Prefix is not specified
    #[error("Prefix is not specified")]
    MissingCidr,
    ///Prefix is greater than 32
    #[error("Prefix '{0}' is greater than 32")]
    Ipv4CidrPrefixOverflow(u8),
    ///Prefix is greater than 128
    #[error("Prefix '{0}' is greater than 128")]
    Ipv6CidrPrefixOverflow(u8),
}

///Performs parsing of the string into IP addr with optional CIDR prefix
///
///Family is detected from the first separator, hence input must contain at least one `.` or `:`
pub const fn parse_ip(text: &str) -> Result<(Address, Option<u8>), ParseError<'_>> {
    Parser::new(text, Family::Detect, true).run()
}

//Parses text of a known family, optionally accepting `/prefix`
pub(crate) const fn parse_v4(text: &str, allow_prefix: bool) -> Result<(v4::Address, Option<u8>), ParseError<'_>> {
    match Parser::new(text, Family::V4, allow_prefix).run() {
        Ok((Address::V4(addr), prefix)) => Ok((addr, prefix)),
        Ok((Address::V6(_), _)) => Err(ParseError::InvalidIpv4),
        Err(error) => Err(error),
    }
}

pub(crate) const fn parse_v6(text: &str, allow_prefix: bool) -> Result<(v6::Address, Option<u8>), ParseError<'_>> {
    match Parser::new(text, Family::V6, allow_prefix).run() {
        Ok((Address::V6(addr), prefix)) => Ok((addr, prefix)),
        Ok((Address::V4(_), _)) => Err(ParseError::InvalidIpv6),
        Err(error) => Err(error),
    }
}
