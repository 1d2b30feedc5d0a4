//! Text based `serde` support

use core::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{v4, v6, Uint128};

macro_rules! impl_text_serde {
    ($($typ:ty => $expecting:literal with $parse:expr;)+) => {
        $(
            impl Serialize for $typ {
                #[inline]
                fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                    serializer.collect_str(self)
                }
            }

            impl<'de> Deserialize<'de> for $typ {
                fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                    struct TextVisitor;

                    impl de::Visitor<'_> for TextVisitor {
                        type Value = $typ;

                        #[inline(always)]
                        fn expecting(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
                            fmt.write_str($expecting)
                        }

                        #[inline]
                        fn visit_str<E: de::Error>(self, text: &str) -> Result<Self::Value, E> {
                            $parse(text).map_err(E::custom)
                        }
                    }

                    deserializer.deserialize_str(TextVisitor)
                }
            }
        )+
    };
}

impl_text_serde! {
    Uint128 => "decimal integer" with str::parse::<Uint128>;
    v4::Address => "IPv4 address" with v4::Address::parse;
    v6::Address => "IPv6 address" with v6::Address::parse;
    v4::Cidr => "IPv4 CIDR" with v4::Cidr::parse;
    v6::Cidr => "IPv6 CIDR" with v6::Cidr::parse;
}
