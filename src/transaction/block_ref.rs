//! Block reference: the 8-byte anchor of a transaction's validity window.

use alloy::primitives::B256;
use alloy::rlp::{self, BufMut, Decodable, Encodable};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::encoding::decode_hex;
use crate::error::ThorError;

/// Either a big-endian block number in the high 4 bytes, or the first 8
/// bytes of a block ID. Both forms share one representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BlockRef([u8; 8]);

impl BlockRef {
    /// Reference to a block by number.
    pub fn from_number(number: u32) -> Self {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&number.to_be_bytes());
        Self(out)
    }

    /// Reference to a block by ID.
    pub fn from_id(id: &B256) -> Self {
        let mut out = [0u8; 8];
        out.copy_from_slice(&id[..8]);
        Self(out)
    }

    pub fn from_u64(value: u64) -> Self {
        Self(value.to_be_bytes())
    }

    /// Block number carried in the first 4 bytes.
    pub fn number(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn as_u64(&self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 8] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 8]
    }
}

impl From<[u8; 8]> for BlockRef {
    fn from(bytes: [u8; 8]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", alloy::hex::encode(self.0))
    }
}

impl FromStr for BlockRef {
    type Err = ThorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = decode_hex(s)?;
        let bytes: [u8; 8] = bytes.try_into().map_err(|b: Vec<u8>| {
            ThorError::MalformedEncoding(format!("block ref must be 8 bytes, got {}", b.len()))
        })?;
        Ok(Self(bytes))
    }
}

impl Serialize for BlockRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// On the wire the reference is an unsigned integer.
impl Encodable for BlockRef {
    fn encode(&self, out: &mut dyn BufMut) {
        self.as_u64().encode(out);
    }

    fn length(&self) -> usize {
        self.as_u64().length()
    }
}

impl Decodable for BlockRef {
    fn decode(buf: &mut &[u8]) -> rlp::Result<Self> {
        u64::decode(buf).map(Self::from_u64)
    }
}
