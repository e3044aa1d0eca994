//! Deterministic shard selection.
//!
//! An identity always starts its failover walk at the same endpoint for a given
//! endpoint list, which spreads long-run load evenly across shards.

use crate::domain::Identity;
use crate::error::RelayError;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a over the raw bytes.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &b| {
        (hash ^ u32::from(b)).wrapping_mul(FNV_PRIME)
    })
}

/// Starting endpoint index for `identity` among `endpoint_count` endpoints.
pub fn select(identity: &Identity, endpoint_count: usize) -> Result<usize, RelayError> {
    if endpoint_count == 0 {
        return Err(RelayError::Configuration(
            "no webhook endpoints configured".to_string(),
        ));
    }
    Ok(fnv1a_32(identity.as_str().as_bytes()) as usize % endpoint_count)
}
