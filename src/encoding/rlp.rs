//! Recursive length prefix helpers on top of `alloy::rlp`.

use alloy::primitives::Bytes;
use alloy::rlp::{self, BufMut, Decodable, Encodable, Header, EMPTY_STRING_CODE};

use crate::error::{ThorError, ThorResult};

/// A generic nested RLP value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RlpItem {
    /// A byte string.
    Bytes(Bytes),
    /// A list of items.
    List(Vec<RlpItem>),
}

impl RlpItem {
    /// Minimal big-endian representation of an unsigned integer.
    pub fn uint(value: u64) -> Self {
        let be = value.to_be_bytes();
        let skip = be.iter().take_while(|b| **b == 0).count();
        RlpItem::Bytes(Bytes::copy_from_slice(&be[skip..]))
    }

    /// Encode to a fresh buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        rlp::encode(self)
    }

    /// Decode a complete buffer into a single item.
    pub fn from_slice(bytes: &[u8]) -> ThorResult<Self> {
        decode_exact(bytes)
    }

    /// Borrow the byte payload, if this is a string.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RlpItem::Bytes(b) => Some(b.as_ref()),
            RlpItem::List(_) => None,
        }
    }

    /// Borrow the elements, if this is a list.
    pub fn as_list(&self) -> Option<&[RlpItem]> {
        match self {
            RlpItem::List(items) => Some(items.as_slice()),
            RlpItem::Bytes(_) => None,
        }
    }

    fn payload_length(&self) -> usize {
        match self {
            RlpItem::Bytes(b) => b[..].length(),
            RlpItem::List(items) => items.iter().map(Encodable::length).sum(),
        }
    }
}

impl Encodable for RlpItem {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            RlpItem::Bytes(b) => b[..].encode(out),
            RlpItem::List(items) => {
                list_header(self.payload_length()).encode(out);
                for item in items {
                    item.encode(out);
                }
            }
        }
    }

    fn length(&self) -> usize {
        match self {
            RlpItem::Bytes(b) => b[..].length(),
            RlpItem::List(_) => list_length(self.payload_length()),
        }
    }
}

impl Decodable for RlpItem {
    fn decode(buf: &mut &[u8]) -> rlp::Result<Self> {
        let header = Header::decode(buf)?;
        let payload = take_payload(buf, header.payload_length)?;
        if !header.list {
            return Ok(RlpItem::Bytes(Bytes::copy_from_slice(payload)));
        }

        let mut payload = payload;
        let mut items = Vec::new();
        while !payload.is_empty() {
            items.push(RlpItem::decode(&mut payload)?);
        }
        Ok(RlpItem::List(items))
    }
}

/// Decode `bytes` as exactly one `T`, rejecting trailing data.
pub fn decode_exact<T: Decodable>(bytes: &[u8]) -> ThorResult<T> {
    let mut buf = bytes;
    let value = T::decode(&mut buf)?;
    if !buf.is_empty() {
        return Err(ThorError::MalformedEncoding(format!(
            "{} trailing bytes after value",
            buf.len()
        )));
    }
    Ok(value)
}

/// Header for a list with the given payload length.
pub fn list_header(payload_length: usize) -> Header {
    Header {
        list: true,
        payload_length,
    }
}

/// Total encoded length of a list with the given payload length.
pub fn list_length(payload_length: usize) -> usize {
    payload_length + rlp::length_of_length(payload_length)
}

/// Consume a list header and return its payload.
pub fn decode_list_payload<'a>(buf: &mut &'a [u8]) -> rlp::Result<&'a [u8]> {
    let header = Header::decode(buf)?;
    if !header.list {
        return Err(rlp::Error::UnexpectedString);
    }
    take_payload(buf, header.payload_length)
}

/// Encode an optional value; absence is the empty string.
pub fn encode_optional<T: Encodable>(value: Option<&T>, out: &mut dyn BufMut) {
    match value {
        Some(v) => v.encode(out),
        None => out.put_u8(EMPTY_STRING_CODE),
    }
}

/// Encoded length of an optional value.
pub fn optional_length<T: Encodable>(value: Option<&T>) -> usize {
    value.map_or(1, Encodable::length)
}

/// Decode an optional value written by [`encode_optional`].
///
/// Only meaningful for types whose present encoding is never the empty
/// string (fixed-width addresses and hashes).
pub fn decode_optional<T: Decodable>(buf: &mut &[u8]) -> rlp::Result<Option<T>> {
    match buf.first() {
        None => Err(rlp::Error::InputTooShort),
        Some(&EMPTY_STRING_CODE) => {
            *buf = &buf[1..];
            Ok(None)
        }
        Some(_) => T::decode(buf).map(Some),
    }
}

fn take_payload<'a>(buf: &mut &'a [u8], len: usize) -> rlp::Result<&'a [u8]> {
    if buf.len() < len {
        return Err(rlp::Error::InputTooShort);
    }
    let (payload, rest) = buf.split_at(len);
    *buf = rest;
    Ok(payload)
}
