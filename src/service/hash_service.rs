//! Keccak-256 for context digests and pointer hashes, SHA-256 for code
//! digests. A change to a tag, field order or endianness ships under a new
//! `-v2` tag.

use crate::{Hash32, Identity};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use sha3::Keccak256;

pub const ORACLE_SNAPSHOT_TAG: &[u8] = b"oracle-snap-v1";
pub const JOB_ADDRESS_SEED: &[u8] = b"job";
pub const SNAPSHOT_ADDRESS_SEED: &[u8] = b"oraclesnap";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OracleAnchor {
    pub oracle_program: Identity,
    pub feed: Identity,
    pub observed_slot: u64,
    pub conf_band_bp: u16,
    pub staleness_limit_slots: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct ContextInput<'a> {
    pub tag: &'a [u8],
    pub program_id: &'a Identity,
    pub user: &'a Identity,
    pub asset: &'a Identity,
    pub amount: u64,
    pub nonce: u64,
    pub oracle: Option<OracleAnchor>,
}

pub fn keccak_hashv(parts: &[&[u8]]) -> Hash32 {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

pub fn sha256_hashv(parts: &[&[u8]]) -> Hash32 {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// Field order: tag, program id, user, asset, amount, nonce, then (when
/// anchored) oracle program, feed, observed slot, confidence band and
/// staleness limit. Numbers are little-endian.
pub fn context_digest(input: &ContextInput<'_>) -> Hash32 {
    let amount = input.amount.to_le_bytes();
    let nonce = input.nonce.to_le_bytes();
    let Some(anchor) = input.oracle.as_ref() else {
        return keccak_hashv(&[
            input.tag,
            input.program_id,
            input.user,
            input.asset,
            &amount,
            &nonce,
        ]);
    };
    keccak_hashv(&[
        input.tag,
        input.program_id,
        input.user,
        input.asset,
        &amount,
        &nonce,
        &anchor.oracle_program,
        &anchor.feed,
        &anchor.observed_slot.to_le_bytes(),
        &anchor.conf_band_bp.to_le_bytes(),
        &anchor.staleness_limit_slots.to_le_bytes(),
    ])
}

pub fn oracle_pointer_hash(
    oracle_program: &Identity,
    feed: &Identity,
    price_e9: i64,
    conf_e9: u64,
    observed_slot: u64,
) -> Hash32 {
    keccak_hashv(&[
        ORACLE_SNAPSHOT_TAG,
        oracle_program,
        feed,
        &price_e9.to_le_bytes(),
        &conf_e9.to_le_bytes(),
        &observed_slot.to_le_bytes(),
    ])
}

pub fn code_digest(ir_bytes: &[u8]) -> Hash32 {
    sha256_hashv(&[ir_bytes])
}

pub fn fresh_commitment() -> Hash32 {
    let mut commitment = [0u8; 32];
    OsRng.fill_bytes(&mut commitment);
    commitment
}

pub fn job_address(commitment: &Hash32, submitter: &Identity) -> Hash32 {
    sha256_hashv(&[JOB_ADDRESS_SEED, commitment, submitter])
}

pub fn snapshot_address(oracle_program: &Identity, feed: &Identity, observed_slot: u64) -> Hash32 {
    sha256_hashv(&[
        SNAPSHOT_ADDRESS_SEED,
        oracle_program,
        feed,
        &observed_slot.to_le_bytes(),
    ])
}

pub fn to_hex(value: &Hash32) -> String {
    hex::encode(value)
}

pub fn parse_hash32(input: &str) -> Result<Hash32, String> {
    let trimmed = input.trim();
    let raw = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let bytes = hex::decode(raw).map_err(|e| format!("invalid hex: {e}"))?;
    <Hash32>::try_from(bytes.as_slice())
        .map_err(|_| format!("expected 32 bytes, got {}", bytes.len()))
}
