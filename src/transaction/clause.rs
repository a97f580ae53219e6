//! Clause: one execution unit of a transaction.

use alloy::primitives::{Address, Bytes, U256};
use alloy::rlp::{self, BufMut, Decodable, Encodable};
use serde::{Deserialize, Serialize};

use crate::encoding::rlp::{
    decode_list_payload, decode_optional, encode_optional, list_header, list_length,
    optional_length,
};

/// A single transfer or contract call.
///
/// Encodes as `[to-or-empty, value, data]`. An absent destination means
/// contract creation with `data` as init code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Clause {
    to: Option<Address>,
    value: U256,
    data: Bytes,
}

impl Clause {
    /// Create a clause with zero value and empty data.
    pub fn new(to: Option<Address>) -> Self {
        Self {
            to,
            value: U256::ZERO,
            data: Bytes::new(),
        }
    }

    /// Native currency transfer.
    pub fn transfer(to: Address, value: U256) -> Self {
        Self::new(Some(to)).with_value(value)
    }

    /// Contract deployment carrying `code` as init code.
    pub fn deploy(code: impl AsRef<[u8]>) -> Self {
        Self::new(None).with_data(code)
    }

    /// A copy of this clause with `value` replaced.
    pub fn with_value(&self, value: U256) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }

    /// A copy of this clause with `data` replaced.
    ///
    /// The bytes are copied; the new clause does not share storage with the
    /// caller's buffer.
    pub fn with_data(&self, data: impl AsRef<[u8]>) -> Self {
        Self {
            data: Bytes::copy_from_slice(data.as_ref()),
            ..self.clone()
        }
    }

    pub fn to(&self) -> Option<Address> {
        self.to
    }

    pub fn value(&self) -> U256 {
        self.value
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// True iff the clause has no destination.
    pub fn is_creating_contract(&self) -> bool {
        self.to.is_none()
    }

    fn payload_length(&self) -> usize {
        optional_length(self.to.as_ref()) + self.value.length() + self.data.length()
    }
}

impl Encodable for Clause {
    fn encode(&self, out: &mut dyn BufMut) {
        list_header(self.payload_length()).encode(out);
        encode_optional(self.to.as_ref(), out);
        self.value.encode(out);
        self.data.encode(out);
    }

    fn length(&self) -> usize {
        list_length(self.payload_length())
    }
}

impl Decodable for Clause {
    fn decode(buf: &mut &[u8]) -> rlp::Result<Self> {
        let mut payload = decode_list_payload(buf)?;
        let clause = Self {
            to: decode_optional(&mut payload)?,
            value: U256::decode(&mut payload)?,
            data: Bytes::decode(&mut payload)?,
        };
        if !payload.is_empty() {
            return Err(rlp::Error::Custom("unexpected trailing clause fields"));
        }
        Ok(clause)
    }
}
