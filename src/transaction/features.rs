//! Transaction feature flags and the `reserved` field that carries them.

use alloy::rlp::{self, BufMut, Decodable, Encodable, EMPTY_LIST_CODE};

use crate::encoding::rlp::{decode_list_payload, list_header, list_length};

/// Bit set of optional transaction features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Features(u32);

impl Features {
    pub const NONE: Features = Features(0);

    /// A gas payer co-signs and pays for the transaction.
    pub const DELEGATED: Features = Features(1);

    pub fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> u32 {
        self.0
    }

    pub fn is_delegated(&self) -> bool {
        self.0 & Self::DELEGATED.0 != 0
    }

    pub fn with_delegated(self, delegated: bool) -> Self {
        if delegated {
            Self(self.0 | Self::DELEGATED.0)
        } else {
            Self(self.0 & !Self::DELEGATED.0)
        }
    }
}

/// Encoded length of the `reserved` list.
pub(crate) fn reserved_length(features: Features) -> usize {
    if features.0 == 0 {
        1
    } else {
        list_length(features.0.length())
    }
}

/// `reserved` is `[]` when no feature is set and `[features]` otherwise.
pub(crate) fn encode_reserved(features: Features, out: &mut dyn BufMut) {
    if features.0 == 0 {
        out.put_u8(EMPTY_LIST_CODE);
        return;
    }
    list_header(features.0.length()).encode(out);
    features.0.encode(out);
}

pub(crate) fn decode_reserved(buf: &mut &[u8]) -> rlp::Result<Features> {
    let mut payload = decode_list_payload(buf)?;
    if payload.is_empty() {
        return Ok(Features::NONE);
    }
    let bits = u32::decode(&mut payload)?;
    if bits == 0 {
        return Err(rlp::Error::Custom("reserved fields not trimmed"));
    }
    if !payload.is_empty() {
        return Err(rlp::Error::Custom("unsupported reserved fields"));
    }
    Ok(Features(bits))
}
