//! The signable transaction.

use alloy::primitives::{Address, Bytes, B256};
use alloy::rlp::{self, BufMut, Decodable, Encodable};

use crate::crypto::{blake2b256, recover_address, SIGNATURE_LENGTH};
use crate::encoding::rlp::{
    decode_list_payload, decode_optional, encode_optional, list_header, list_length,
    optional_length,
};
use crate::encoding::{decode_exact, decode_hex, encode_hex};
use crate::error::{ThorError, ThorResult};
use crate::gas;
use crate::transaction::features::{decode_reserved, encode_reserved, reserved_length};
use crate::transaction::{BlockRef, Clause, Features};

/// Every field of a transaction except the signature.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxBody {
    /// Last byte of the genesis block ID.
    pub chain_tag: u8,
    pub block_ref: BlockRef,
    /// Validity window in blocks, counted from `block_ref`.
    pub expiration: u32,
    pub clauses: Vec<Clause>,
    pub gas_price_coef: u8,
    pub gas: u64,
    /// Transaction that must be executed successfully before this one.
    pub depends_on: Option<B256>,
    pub nonce: u64,
    pub features: Features,
}

impl TxBody {
    fn clauses_payload_length(&self) -> usize {
        self.clauses.iter().map(Encodable::length).sum()
    }

    fn fields_length(&self) -> usize {
        self.chain_tag.length()
            + self.block_ref.length()
            + self.expiration.length()
            + list_length(self.clauses_payload_length())
            + self.gas_price_coef.length()
            + self.gas.length()
            + optional_length(self.depends_on.as_ref())
            + self.nonce.length()
            + reserved_length(self.features)
    }

    fn encode_fields(&self, out: &mut dyn BufMut) {
        self.chain_tag.encode(out);
        self.block_ref.encode(out);
        self.expiration.encode(out);
        list_header(self.clauses_payload_length()).encode(out);
        for clause in &self.clauses {
            clause.encode(out);
        }
        self.gas_price_coef.encode(out);
        self.gas.encode(out);
        encode_optional(self.depends_on.as_ref(), out);
        self.nonce.encode(out);
        encode_reserved(self.features, out);
    }

    fn decode_fields(buf: &mut &[u8]) -> rlp::Result<Self> {
        let chain_tag = u8::decode(buf)?;
        let block_ref = BlockRef::decode(buf)?;
        let expiration = u32::decode(buf)?;

        let mut clause_payload = decode_list_payload(buf)?;
        let mut clauses = Vec::new();
        while !clause_payload.is_empty() {
            clauses.push(Clause::decode(&mut clause_payload)?);
        }

        Ok(Self {
            chain_tag,
            block_ref,
            expiration,
            clauses,
            gas_price_coef: u8::decode(buf)?,
            gas: u64::decode(buf)?,
            depends_on: decode_optional(buf)?,
            nonce: u64::decode(buf)?,
            features: decode_reserved(buf)?,
        })
    }
}

/// A transaction, unsigned or signed.
///
/// The full encoding is `[chainTag, blockRef, expiration, clauses,
/// gasPriceCoef, gas, dependsOn, nonce, reserved, signature]`; the signing
/// encoding is the same list without the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    body: TxBody,
    signature: Option<Vec<u8>>,
}

impl Transaction {
    /// Create an unsigned transaction.
    pub fn new(body: TxBody) -> Self {
        Self {
            body,
            signature: None,
        }
    }

    pub fn body(&self) -> &TxBody {
        &self.body
    }

    pub fn chain_tag(&self) -> u8 {
        self.body.chain_tag
    }

    pub fn block_ref(&self) -> BlockRef {
        self.body.block_ref
    }

    pub fn expiration(&self) -> u32 {
        self.body.expiration
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.body.clauses
    }

    pub fn gas_price_coef(&self) -> u8 {
        self.body.gas_price_coef
    }

    pub fn gas(&self) -> u64 {
        self.body.gas
    }

    pub fn depends_on(&self) -> Option<B256> {
        self.body.depends_on
    }

    pub fn nonce(&self) -> u64 {
        self.body.nonce
    }

    pub fn features(&self) -> Features {
        self.body.features
    }

    pub fn is_delegated(&self) -> bool {
        self.body.features.is_delegated()
    }

    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// A copy of this transaction carrying `signature`.
    ///
    /// Expected lengths are 65 bytes, or 130 for a delegated transaction
    /// (origin signature followed by gas payer signature). The length is
    /// checked when the signers are recovered. An empty signature leaves
    /// the transaction unsigned, matching its wire form.
    pub fn with_signature(&self, signature: impl AsRef<[u8]>) -> Self {
        let signature = signature.as_ref();
        Self {
            body: self.body.clone(),
            signature: (!signature.is_empty()).then(|| signature.to_vec()),
        }
    }

    /// Hash the origin signs.
    pub fn signing_hash(&self) -> B256 {
        let payload_length = self.body.fields_length();
        let mut out = Vec::with_capacity(list_length(payload_length));
        list_header(payload_length).encode(&mut out);
        self.body.encode_fields(&mut out);
        blake2b256(&[out.as_slice()])
    }

    /// Hash the gas payer signs on behalf of `origin`.
    pub fn delegator_signing_hash(&self, origin: &Address) -> B256 {
        blake2b256(&[self.signing_hash().as_slice(), origin.as_slice()])
    }

    /// Recover the address that signed [`Self::signing_hash`].
    pub fn origin(&self) -> ThorResult<Address> {
        let signature = self.checked_signature()?;
        recover_address(&self.signing_hash(), &signature[..SIGNATURE_LENGTH])
    }

    /// Recover the gas payer of a delegated transaction.
    ///
    /// Returns `Ok(None)` when the delegation feature is not set.
    pub fn delegator(&self) -> ThorResult<Option<Address>> {
        if !self.is_delegated() {
            return Ok(None);
        }
        let signature = self.checked_signature()?;
        let origin = recover_address(&self.signing_hash(), &signature[..SIGNATURE_LENGTH])?;
        let hash = self.delegator_signing_hash(&origin);
        recover_address(&hash, &signature[SIGNATURE_LENGTH..]).map(Some)
    }

    /// Identifier the node assigns: blake2b(signing hash ‖ origin).
    pub fn id(&self) -> ThorResult<B256> {
        let origin = self.origin()?;
        Ok(blake2b256(&[self.signing_hash().as_slice(), origin.as_slice()]))
    }

    /// Hash of the full encoding, signature included.
    pub fn hash(&self) -> B256 {
        blake2b256(&[self.encoded().as_slice()])
    }

    /// Wire encoding including the signature.
    pub fn encoded(&self) -> Vec<u8> {
        rlp::encode(self)
    }

    /// `0x`-prefixed wire encoding, as submitted to a node.
    pub fn encoded_hex(&self) -> String {
        encode_hex(self.encoded())
    }

    pub fn decode(bytes: &[u8]) -> ThorResult<Self> {
        decode_exact(bytes)
    }

    pub fn from_hex(raw: &str) -> ThorResult<Self> {
        Self::decode(&decode_hex(raw)?)
    }

    /// Minimum gas the node accepts for this clause set.
    pub fn intrinsic_gas(&self) -> ThorResult<u64> {
        gas::intrinsic_gas(&self.body.clauses)
    }

    fn checked_signature(&self) -> ThorResult<&[u8]> {
        let signature = self
            .signature
            .as_deref()
            .ok_or_else(|| ThorError::InvalidSignature("transaction is not signed".to_string()))?;

        let expected = if self.is_delegated() {
            SIGNATURE_LENGTH * 2
        } else {
            SIGNATURE_LENGTH
        };
        if signature.len() != expected {
            return Err(ThorError::InvalidSignature(format!(
                "expected {} signature bytes, got {}",
                expected,
                signature.len()
            )));
        }
        Ok(signature)
    }

    fn signature_bytes(&self) -> &[u8] {
        self.signature.as_deref().unwrap_or_default()
    }
}

impl Encodable for Transaction {
    fn encode(&self, out: &mut dyn BufMut) {
        let signature = self.signature_bytes();
        list_header(self.body.fields_length() + signature.length()).encode(out);
        self.body.encode_fields(out);
        signature.encode(out);
    }

    fn length(&self) -> usize {
        list_length(self.body.fields_length() + self.signature_bytes().length())
    }
}

impl Decodable for Transaction {
    fn decode(buf: &mut &[u8]) -> rlp::Result<Self> {
        let mut payload = decode_list_payload(buf)?;
        let body = TxBody::decode_fields(&mut payload)?;
        let signature = Bytes::decode(&mut payload)?;
        if !payload.is_empty() {
            return Err(rlp::Error::Custom("unexpected trailing transaction fields"));
        }
        Ok(Self {
            body,
            signature: (!signature.is_empty()).then(|| signature.to_vec()),
        })
    }
}
