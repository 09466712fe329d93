//! Denominated token amounts.
//!
//! [`Coin`] pairs a denomination with a raw `u128` amount. [`Coins`] is an
//! ordered collection of coins, kept sorted by denomination so that two
//! collections holding the same entries compare and serialize identically.
//!
//! Amounts are serialized as JSON strings to prevent precision loss on
//! u128 values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when a compact coin string such as `"100stake"` cannot
/// be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoinParseError {
    /// The string does not start with a decimal amount.
    #[error("missing amount in coin string: {0:?}")]
    MissingAmount(String),

    /// The amount does not fit in a `u128`.
    #[error("amount out of range in coin string: {0:?}")]
    AmountOutOfRange(String),

    /// The string has no denomination after the amount.
    #[error("missing denomination in coin string: {0:?}")]
    MissingDenom(String),
}

/// A single denominated amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Coin {
    /// Denomination (e.g. `"uatom"`, `"lp/pool1"`).
    pub denom: String,
    /// Raw amount in the denomination's smallest unit.
    #[serde(with = "amount_string")]
    #[schema(value_type = String)]
    pub amount: u128,
}

impl Coin {
    /// Creates a new coin.
    #[must_use]
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Returns `true` if the amount is zero.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(s.len());
        let (amount, denom) = s.split_at(split);
        if amount.is_empty() {
            return Err(CoinParseError::MissingAmount(s.to_string()));
        }
        if denom.is_empty() {
            return Err(CoinParseError::MissingDenom(s.to_string()));
        }
        let amount = amount
            .parse::<u128>()
            .map_err(|_| CoinParseError::AmountOutOfRange(s.to_string()))?;
        Ok(Self::new(denom, amount))
    }
}

/// An ordered collection of coins, sorted by denomination.
///
/// Entries are kept exactly as provided apart from ordering: zero amounts
/// are preserved so that callers can reject them explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Creates a collection from the given coins, sorting by denomination.
    #[must_use]
    pub fn new(mut coins: Vec<Coin>) -> Self {
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        Self(coins)
    }

    /// Creates a collection holding a single coin.
    #[must_use]
    pub fn single(coin: Coin) -> Self {
        Self(vec![coin])
    }

    /// Returns `true` if the collection holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterates over the entries in denomination order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// Returns the first entry whose amount is zero, if any.
    #[must_use]
    pub fn find_zero(&self) -> Option<&Coin> {
        self.0.iter().find(|c| c.is_zero())
    }

    /// Returns the entries as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Coin] {
        &self.0
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{coin}")?;
        }
        Ok(())
    }
}

impl FromIterator<Coin> for Coins {
    fn from_iter<I: IntoIterator<Item = Coin>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Coin> for Coins {
    fn from(coin: Coin) -> Self {
        Self::single(coin)
    }
}

/// Serializes a `u128` amount as a decimal JSON string.
///
/// Deserialization also accepts plain JSON numbers.
mod amount_string {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        struct AmountVisitor;

        impl Visitor<'_> for AmountVisitor {
            type Value = u128;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a non-negative integer or decimal string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
                Ok(u128::from(v))
            }

            fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
                Ok(v)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
                v.parse()
                    .map_err(|_| E::custom(format!("invalid amount: {v}")))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parse_compact_form() {
        let Ok(coin) = "100stake".parse::<Coin>() else {
            panic!("valid coin");
        };
        assert_eq!(coin, Coin::new("stake", 100));
        assert_eq!(coin.to_string(), "100stake");
    }

    #[test]
    fn parse_rejects_missing_parts() {
        assert!(matches!(
            "stake".parse::<Coin>(),
            Err(CoinParseError::MissingAmount(_))
        ));
        assert!(matches!(
            "100".parse::<Coin>(),
            Err(CoinParseError::MissingDenom(_))
        ));
        assert!(matches!(
            "999999999999999999999999999999999999999999stake".parse::<Coin>(),
            Err(CoinParseError::AmountOutOfRange(_))
        ));
    }

    #[test]
    fn coins_sorted_by_denom() {
        let coins = Coins::new(vec![Coin::new("zeta", 1), Coin::new("alpha", 2)]);
        let denoms: Vec<&str> = coins.iter().map(|c| c.denom.as_str()).collect();
        assert_eq!(denoms, vec!["alpha", "zeta"]);
        assert_eq!(coins.to_string(), "2alpha,1zeta");
    }

    #[test]
    fn find_zero_keeps_zero_entries() {
        let coins = Coins::new(vec![Coin::new("a", 5), Coin::new("b", 0)]);
        assert_eq!(coins.len(), 2);
        assert_eq!(coins.find_zero(), Some(&Coin::new("b", 0)));
    }

    #[test]
    fn amount_is_serialized_as_string() {
        let coin = Coin::new("uatom", u128::MAX);
        let json = serde_json::to_string(&coin).unwrap_or_default();
        assert!(json.contains(&format!("\"{}\"", u128::MAX)));

        let Ok(back) = serde_json::from_str::<Coin>(r#"{"denom":"uatom","amount":42}"#) else {
            panic!("numeric amount should deserialize");
        };
        assert_eq!(back.amount, 42);
    }
}
