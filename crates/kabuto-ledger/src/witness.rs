//! Witness normalization: device signature plus derived public key.
//!
//! The device returns each signature with the derivation path it signed
//! under, but no public key. The matching key is reconstructed from the
//! account-level extended public key by deriving one non-hardened child per
//! path segment past the account level. Hardened segments past that level
//! cannot exist in a well-formed response: they would require private-key
//! derivation, so they abort the attempt.

use kabuto_core::constants::HARDENED;
use kabuto_core::error::DerivationError;
use kabuto_core::traits::KeyDeriver;
use kabuto_core::types::{RawWitness, TxWitness};

/// Build a full witness from a device signature.
///
/// `account_xpub_hex` is the account-level extended public key (sitting at
/// `account_depth` in the tree). Segments of `raw.path` beyond that depth
/// are derived in order; a path no longer than the depth yields the account
/// key itself. The signature is copied through unchanged.
pub fn normalize(
    account_xpub_hex: &str,
    raw: &RawWitness,
    deriver: &dyn KeyDeriver,
    account_depth: usize,
) -> Result<TxWitness, DerivationError> {
    let mut key = hex::decode(account_xpub_hex)
        .map_err(|e| DerivationError::InvalidKey(format!("account key is not hex: {e}")))?;
    if key.is_empty() {
        return Err(DerivationError::InvalidKey("account key is empty".into()));
    }

    for (position, &segment) in raw.path.iter().enumerate().skip(account_depth) {
        if segment >= HARDENED {
            return Err(DerivationError::HardenedSegment { segment, position });
        }
        key = deriver.derive_child(&key, segment)?;
    }

    Ok(TxWitness {
        public_key_hex: hex::encode(key),
        signature_hex: raw.signature_hex.clone(),
    })
}
