use crate::json_codecs::{to_string, u64_from_string};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct Slot(
    #[serde(deserialize_with = "u64_from_string", serialize_with = "to_string")] pub u64,
);

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct CommitteeIndex(
    #[serde(deserialize_with = "u64_from_string", serialize_with = "to_string")] pub u64,
);

impl Display for CommitteeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies a block in a path segment, e.g. `/eth/v1/beacon/blob_sidecars/{block_id}`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BlockId {
    Head,
    Genesis,
    Finalized,
    Slot(Slot),
    Root(String),
}

impl Display for BlockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockId::Head => write!(f, "head"),
            BlockId::Genesis => write!(f, "genesis"),
            BlockId::Finalized => write!(f, "finalized"),
            BlockId::Slot(slot) => write!(f, "{slot}"),
            BlockId::Root(root) => write!(f, "{root}"),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ParseBlockIdError {
    #[error("failed to parse block id {0}, expected head, genesis, finalized, a slot or a 0x prefixed root")]
    Invalid(String),
}

impl FromStr for BlockId {
    type Err = ParseBlockIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "head" => Ok(Self::Head),
            "genesis" => Ok(Self::Genesis),
            "finalized" => Ok(Self::Finalized),
            root if is_root(root) => Ok(Self::Root(root.to_string())),
            other => other
                .parse::<u64>()
                .map(|slot| Self::Slot(Slot(slot)))
                .map_err(|_| ParseBlockIdError::Invalid(other.to_string())),
        }
    }
}

// 32 bytes, hex encoded, with the 0x prefix.
fn is_root(s: &str) -> bool {
    s.len() == 66
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

/// The `{"data": ...}` envelope every beacon API response body is wrapped in.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GenericResponse<T> {
    pub data: T,
}

impl<T> From<T> for GenericResponse<T> {
    fn from(data: T) -> Self {
        Self { data }
    }
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct GenesisData {
    #[serde(deserialize_with = "u64_from_string", serialize_with = "to_string")]
    pub genesis_time: u64,
    pub genesis_validators_root: String,
    pub genesis_fork_version: String,
}

impl GenesisData {
    /// `None` when `genesis_time` does not fit a chrono timestamp.
    pub fn genesis_date_time(&self) -> Option<DateTime<Utc>> {
        let seconds = i64::try_from(self.genesis_time).ok()?;
        Utc.timestamp_opt(seconds, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAINNET_GENESIS_ROOT: &str =
        "0x4b363db94e286120d76eb905340fdd4e54bfe9f06bf33ff6cf5ad27f511bfe95";

    #[test]
    fn test_block_id_display() {
        assert_eq!(BlockId::Head.to_string(), "head");
        assert_eq!(BlockId::Genesis.to_string(), "genesis");
        assert_eq!(BlockId::Finalized.to_string(), "finalized");
        assert_eq!(BlockId::Slot(Slot(4700013)).to_string(), "4700013");
        assert_eq!(
            BlockId::Root(MAINNET_GENESIS_ROOT.to_string()).to_string(),
            MAINNET_GENESIS_ROOT
        );
    }

    #[test]
    fn test_block_id_from_str() {
        assert_eq!("head".parse::<BlockId>(), Ok(BlockId::Head));
        assert_eq!("finalized".parse::<BlockId>(), Ok(BlockId::Finalized));
        assert_eq!("12".parse::<BlockId>(), Ok(BlockId::Slot(Slot(12))));
        assert_eq!(
            MAINNET_GENESIS_ROOT.parse::<BlockId>(),
            Ok(BlockId::Root(MAINNET_GENESIS_ROOT.to_string()))
        );
    }

    #[test]
    fn test_block_id_rejects_short_root() {
        assert_eq!(
            "0xabc".parse::<BlockId>(),
            Err(ParseBlockIdError::Invalid("0xabc".to_string()))
        );
    }

    #[test]
    fn test_slot_json_is_quoted() {
        assert_eq!(serde_json::to_string(&Slot(5)).unwrap(), r#""5""#);
        assert_eq!(serde_json::from_str::<Slot>(r#""5""#).unwrap(), Slot(5));
    }

    #[test]
    fn test_genesis_date_time() {
        let genesis = GenesisData {
            genesis_time: 1606824023,
            genesis_validators_root: MAINNET_GENESIS_ROOT.to_string(),
            genesis_fork_version: "0x00000000".to_string(),
        };
        let expected: DateTime<Utc> = "2020-12-01T12:00:23Z".parse().unwrap();
        assert_eq!(genesis.genesis_date_time(), Some(expected));
    }

    #[test]
    fn test_genesis_date_time_out_of_range() {
        let genesis = GenesisData {
            genesis_time: u64::MAX,
            genesis_validators_root: MAINNET_GENESIS_ROOT.to_string(),
            genesis_fork_version: "0x00000000".to_string(),
        };
        assert_eq!(genesis.genesis_date_time(), None);
    }
}
