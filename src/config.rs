//! Sale Configuration
//!
//! Construction-time parameters. Loaded from JSON or from `MINT_GATE_*`
//! environment variables, then validated before a sale is built.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::address::Address;
use crate::core::hash::{Digest32, ZERO_DIGEST};
use crate::ledger::treasury::Amount;
use crate::proof::commitment::CommitBinding;
use crate::{DEFAULT_MINT_PRICE, DEFAULT_REVEAL_DELAY, MAX_WHITELIST_SIZE};

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Whitelist root is all zeros.
    #[error("merkle root must be non-zero")]
    ZeroMerkleRoot,
    /// Supply cap is zero.
    #[error("supply cap must be greater than zero")]
    ZeroSupplyCap,
    /// Whitelist has more tickets than the bitmap ceiling.
    #[error("whitelist size {size} exceeds maximum {max}")]
    WhitelistTooLarge {
        /// Requested ticket count.
        size: u64,
        /// `MAX_WHITELIST_SIZE`.
        max: u64,
    },
    /// Operator is the zero address.
    #[error("operator must be a non-zero address")]
    ZeroOperator,
    /// Required variable missing.
    #[error("missing configuration value: {0}")]
    Missing(&'static str),
    /// Variable present but unparseable.
    #[error("invalid value for {key}: {reason}")]
    Invalid {
        /// Variable name.
        key: &'static str,
        /// Parse failure.
        reason: String,
    },
    /// JSON decoding failed.
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Sale construction parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleConfig {
    /// Whitelist Merkle root (hex in JSON).
    #[serde(with = "hex_digest")]
    pub merkle_root: Digest32,
    /// Maximum number of tokens ever minted.
    pub supply_cap: u64,
    /// Number of whitelist tickets (tickets are `1..=whitelist_size`).
    pub whitelist_size: u64,
    /// Exact public-sale price.
    #[serde(default = "default_mint_price")]
    pub mint_price: Amount,
    /// Blocks between commit and reveal.
    #[serde(default = "default_reveal_delay")]
    pub reveal_delay: u64,
    /// Identity of this sale, mixed into every commitment.
    pub contract: Address,
    /// Privileged operator.
    pub operator: Address,
    /// Commitment binding variant.
    #[serde(default)]
    pub commit_binding: CommitBinding,
}

fn default_mint_price() -> Amount {
    DEFAULT_MINT_PRICE
}

fn default_reveal_delay() -> u64 {
    DEFAULT_REVEAL_DELAY
}

impl SaleConfig {
    /// Config with default price, delay and binding.
    pub fn new(merkle_root: Digest32, supply_cap: u64, whitelist_size: u64, contract: Address, operator: Address) -> Self {
        Self {
            merkle_root,
            supply_cap,
            whitelist_size,
            mint_price: DEFAULT_MINT_PRICE,
            reveal_delay: DEFAULT_REVEAL_DELAY,
            contract,
            operator,
            commit_binding: CommitBinding::default(),
        }
    }

    /// Check construction invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.merkle_root == ZERO_DIGEST {
            return Err(ConfigError::ZeroMerkleRoot);
        }
        if self.supply_cap == 0 {
            return Err(ConfigError::ZeroSupplyCap);
        }
        if self.whitelist_size > MAX_WHITELIST_SIZE {
            return Err(ConfigError::WhitelistTooLarge {
                size: self.whitelist_size,
                max: MAX_WHITELIST_SIZE,
            });
        }
        if self.operator.is_zero() {
            return Err(ConfigError::ZeroOperator);
        }
        Ok(())
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SaleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create config from an arbitrary key lookup (`MINT_GATE_*` names).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let merkle_root = parse_digest("MINT_GATE_MERKLE_ROOT", &required("MINT_GATE_MERKLE_ROOT")?)?;
        let supply_cap = parse_num("MINT_GATE_SUPPLY_CAP", &required("MINT_GATE_SUPPLY_CAP")?)?;
        let whitelist_size = parse_num("MINT_GATE_WHITELIST_SIZE", &required("MINT_GATE_WHITELIST_SIZE")?)?;
        let contract = parse_address("MINT_GATE_CONTRACT", &required("MINT_GATE_CONTRACT")?)?;
        let operator = parse_address("MINT_GATE_OPERATOR", &required("MINT_GATE_OPERATOR")?)?;

        let mut config = Self::new(merkle_root, supply_cap, whitelist_size, contract, operator);

        if let Some(price) = lookup("MINT_GATE_MINT_PRICE") {
            config.mint_price = parse_num("MINT_GATE_MINT_PRICE", &price)?;
        }
        if let Some(delay) = lookup("MINT_GATE_REVEAL_DELAY") {
            config.reveal_delay = parse_num("MINT_GATE_REVEAL_DELAY", &delay)?;
        }
        if let Some(binding) = lookup("MINT_GATE_COMMIT_BINDING") {
            config.commit_binding = match binding.as_str() {
                "token_only" => CommitBinding::TokenOnly,
                "account_bound" => CommitBinding::AccountBound,
                other => {
                    return Err(ConfigError::Invalid {
                        key: "MINT_GATE_COMMIT_BINDING",
                        reason: format!("unknown binding {:?}", other),
                    })
                }
            };
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_num<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn parse_address(key: &'static str, value: &str) -> Result<Address, ConfigError> {
    value.trim().parse().map_err(|e: crate::core::address::AddressParseError| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn parse_digest(key: &'static str, value: &str) -> Result<Digest32, ConfigError> {
    hex_digest::decode(value.trim()).map_err(|reason| ConfigError::Invalid { key, reason })
}

/// Serde helpers for `0x`-prefixed 32-byte hex digests.
mod hex_digest {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::core::hash::Digest32;

    pub fn decode(s: &str) -> Result<Digest32, String> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s)).map_err(|e| e.to_string())?;
        bytes
            .as_slice()
            .try_into()
            .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))
    }

    pub fn serialize<S: Serializer>(digest: &Digest32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(digest)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Digest32, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn sample() -> SaleConfig {
        SaleConfig::new([9; 32], 6, 4, Address::repeat(0xcc), Address::repeat(0x0f))
    }

    fn env_map() -> BTreeMap<&'static str, String> {
        let mut vars = BTreeMap::new();
        vars.insert("MINT_GATE_MERKLE_ROOT", format!("0x{}", hex::encode([9u8; 32])));
        vars.insert("MINT_GATE_SUPPLY_CAP", "6".to_string());
        vars.insert("MINT_GATE_WHITELIST_SIZE", "4".to_string());
        vars.insert("MINT_GATE_CONTRACT", Address::repeat(0xcc).to_string());
        vars.insert("MINT_GATE_OPERATOR", Address::repeat(0x0f).to_string());
        vars
    }

    #[test]
    fn test_defaults() {
        let config = sample();
        assert_eq!(config.reveal_delay, 10);
        assert_eq!(config.mint_price, DEFAULT_MINT_PRICE);
        assert_eq!(config.commit_binding, CommitBinding::TokenOnly);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_root_rejected() {
        let mut config = sample();
        config.merkle_root = ZERO_DIGEST;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroMerkleRoot)));
    }

    #[test]
    fn test_zero_cap_rejected() {
        let mut config = sample();
        config.supply_cap = 0;
        assert!(matches!(config.validate(), Err(ConfigError::ZeroSupplyCap)));
    }

    #[test]
    fn test_oversized_whitelist_rejected() {
        let mut config = sample();
        config.whitelist_size = MAX_WHITELIST_SIZE;
        assert!(config.validate().is_ok());

        for size in [MAX_WHITELIST_SIZE + 1, u64::MAX] {
            config.whitelist_size = size;
            assert!(matches!(
                config.validate(),
                Err(ConfigError::WhitelistTooLarge { max: MAX_WHITELIST_SIZE, .. })
            ));
        }
    }

    #[test]
    fn test_oversized_whitelist_from_env() {
        let mut vars = env_map();
        vars.insert("MINT_GATE_WHITELIST_SIZE", u64::MAX.to_string());
        let result = SaleConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(matches!(result, Err(ConfigError::WhitelistTooLarge { size: u64::MAX, .. })));
    }

    #[test]
    fn test_json_roundtrip() {
        let mut config = sample();
        config.commit_binding = CommitBinding::AccountBound;
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("account_bound"));
        assert_eq!(SaleConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_json_defaults_applied() {
        let json = format!(
            r#"{{"merkle_root":"0x{}","supply_cap":6,"whitelist_size":4,"contract":"{}","operator":"{}"}}"#,
            hex::encode([9u8; 32]),
            Address::repeat(0xcc),
            Address::repeat(0x0f),
        );
        assert_eq!(SaleConfig::from_json(&json).unwrap(), sample());
    }

    #[test]
    fn test_json_bad_root() {
        let json = format!(
            r#"{{"merkle_root":"0x1234","supply_cap":6,"whitelist_size":4,"contract":"{}","operator":"{}"}}"#,
            Address::repeat(0xcc),
            Address::repeat(0x0f),
        );
        assert!(matches!(SaleConfig::from_json(&json), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_lookup() {
        let mut vars = env_map();
        vars.insert("MINT_GATE_REVEAL_DELAY", "25".to_string());
        vars.insert("MINT_GATE_COMMIT_BINDING", "account_bound".to_string());

        let config = SaleConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(config.reveal_delay, 25);
        assert_eq!(config.commit_binding, CommitBinding::AccountBound);
        assert_eq!(config.supply_cap, 6);
    }

    #[test]
    fn test_from_lookup_missing() {
        let mut vars = env_map();
        vars.remove("MINT_GATE_OPERATOR");
        let result = SaleConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(matches!(result, Err(ConfigError::Missing("MINT_GATE_OPERATOR"))));
    }

    #[test]
    fn test_from_lookup_invalid_number() {
        let mut vars = env_map();
        vars.insert("MINT_GATE_SUPPLY_CAP", "lots".to_string());
        let result = SaleConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(matches!(result, Err(ConfigError::Invalid { key: "MINT_GATE_SUPPLY_CAP", .. })));
    }
}
