//! Serialization helpers for the swap submitter API

/// A module for serializing and deserializing U256 as decimal strings
///
/// Quote providers report token amounts as base-10 strings of atoms
pub(crate) mod u256_string_serialization {
    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize a U256 to a decimal string
    pub fn serialize<S: Serializer>(value: &U256, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.to_string())
    }

    /// Deserialize a decimal string to a U256
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
        let s = String::deserialize(d)?;
        U256::from_str_radix(&s, 10).map_err(|_| D::Error::custom("Invalid U256 value"))
    }
}

/// A module for serializing and deserializing an optional U256 as an optional
/// decimal string
pub(crate) mod option_u256_string_serialization {
    use alloy_primitives::U256;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    /// Serialize an optional U256 to an optional decimal string
    pub fn serialize<S: Serializer>(value: &Option<U256>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_some(&v.to_string()),
            None => s.serialize_none(),
        }
    }

    /// Deserialize an optional decimal string to an optional U256
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<U256>, D::Error> {
        let maybe_str = Option::<String>::deserialize(d)?;
        maybe_str
            .map(|s| U256::from_str_radix(&s, 10))
            .transpose()
            .map_err(|_| D::Error::custom("Invalid U256 value"))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::U256;
    use rand::{thread_rng, Rng};
    use serde::{Deserialize, Serialize};

    /// A wrapper exercising the string serialization modules
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Amounts {
        /// A required amount
        #[serde(with = "super::u256_string_serialization")]
        amount: U256,
        /// An optional amount
        #[serde(default, with = "super::option_u256_string_serialization")]
        gas: Option<U256>,
    }

    /// Test that amounts serialize as base-10 strings
    #[test]
    fn test_u256_decimal_format() {
        let amounts = Amounts { amount: U256::from(10_000_000_000_000_000u64), gas: None };
        let serialized = serde_json::to_string(&amounts).unwrap();
        assert_eq!(serialized, r#"{"amount":"10000000000000000","gas":null}"#);
    }

    /// Test serialization and deserialization of random amounts
    #[test]
    fn test_u256_serialization() {
        let mut rng = thread_rng();
        let mut bytes = [0u8; 32];
        rng.fill(&mut bytes);
        let amount = U256::from_be_bytes(bytes);
        let gas = Some(U256::from(rng.gen::<u64>()));

        let amounts = Amounts { amount, gas };
        let serialized = serde_json::to_string(&amounts).unwrap();
        let deserialized: Amounts = serde_json::from_str(&serialized).unwrap();
        assert_eq!(amounts, deserialized);
    }

    /// Test that a missing optional amount and a malformed amount are handled
    #[test]
    fn test_u256_deserialization_edge_cases() {
        let parsed: Amounts = serde_json::from_str(r#"{"amount":"42"}"#).unwrap();
        assert_eq!(parsed, Amounts { amount: U256::from(42u8), gas: None });

        let malformed = serde_json::from_str::<Amounts>(r#"{"amount":"0x2a"}"#);
        assert!(malformed.is_err());
    }
}
