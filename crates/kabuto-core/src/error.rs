//! Error types for the signing adapter.
//!
//! One enum per failure domain, rolled up into [`SignError`] for the
//! orchestrated flow. Every failure aborts the signing attempt atomically;
//! none are retried internally. Transient transport retries are the
//! transport collaborator's concern.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::TxId;

/// Failures surfaced by the coin-selection/codec collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// Building the simulated transaction failed.
    #[error("simulation failed: {0}")]
    Simulate(String),

    /// The serialized transaction could not be decoded.
    #[error("decode failed: {0}")]
    Decode(String),

    /// The decoded transaction could not be re-encoded.
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Failures surfaced by the device transport.
///
/// All variants are terminal for the current attempt; the caller may start
/// a fresh attempt after user-visible recovery (reconnect, retry prompt).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeviceError {
    /// The device session dropped mid-exchange.
    #[error("device disconnected: {0}")]
    Disconnected(String),

    /// The device did not answer within the transport's deadline.
    #[error("device request timed out")]
    Timeout,

    /// The user declined the request on the device itself.
    #[error("request rejected on device")]
    Rejected,

    /// The device answered with data the adapter cannot use.
    #[error("malformed device response: {0}")]
    InvalidResponse(String),

    /// Any other transport-level failure.
    #[error("transport: {0}")]
    Transport(String),
}

/// Failures in public-key derivation while normalizing witnesses.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DerivationError {
    /// A witness path contains a hardened segment past the account level.
    /// Hardened derivation needs the private key, which only the device
    /// holds, so such a path cannot be honored here.
    #[error("hardened segment {segment:#010x} at position {position} cannot be derived from a public key")]
    HardenedSegment {
        /// The offending segment value.
        segment: u32,
        /// Its zero-based position within the full path.
        position: usize,
    },

    /// The account-level extended public key is not valid key material.
    #[error("invalid extended public key: {0}")]
    InvalidKey(String),

    /// The derivation primitive itself failed.
    #[error("derivation backend: {0}")]
    Backend(String),
}

/// Everything that can end a signing attempt.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignError {
    /// The proposal's fee disagrees with the fee the simulation settled on.
    /// The proposal must be rebuilt; the attempt is not retried.
    #[error("fee mismatch: proposal says {proposed}, simulation says {simulated}")]
    FeeMismatch {
        /// Fee carried by the proposal.
        proposed: Decimal,
        /// Fee computed during simulation.
        simulated: Decimal,
    },

    /// The simulation consumed none of the proposal's inputs. This means
    /// the builder and the proposal disagree about the candidate set.
    #[error("simulation selected none of the proposal inputs")]
    EmptySelection,

    /// A selected input has no raw transaction body registered for it.
    #[error("missing raw transaction body for input {txid}")]
    MissingRawBody {
        /// Id whose body was absent from the caller-supplied map.
        txid: TxId,
    },

    /// Builder/codec collaborator failure.
    #[error(transparent)]
    Builder(#[from] BuilderError),

    /// Device transport failure, surfaced verbatim.
    #[error(transparent)]
    Device(#[from] DeviceError),

    /// Witness-path derivation failure.
    #[error(transparent)]
    Derivation(#[from] DerivationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_fee_mismatch() {
        let e = SignError::FeeMismatch {
            proposed: Decimal::from(31_000u64),
            simulated: Decimal::from(30_000u64),
        };
        assert_eq!(
            e.to_string(),
            "fee mismatch: proposal says 31000, simulation says 30000"
        );
    }

    #[test]
    fn display_missing_raw_body() {
        let e = SignError::MissingRawBody {
            txid: TxId::new("ab12"),
        };
        assert_eq!(e.to_string(), "missing raw transaction body for input ab12");
    }

    #[test]
    fn display_hardened_segment() {
        let e = DerivationError::HardenedSegment {
            segment: 0x8000_0000,
            position: 3,
        };
        assert_eq!(
            e.to_string(),
            "hardened segment 0x80000000 at position 3 cannot be derived from a public key"
        );
    }

    #[test]
    fn device_error_passes_through_transparent() {
        let sign: SignError = DeviceError::Rejected.into();
        assert_eq!(sign, SignError::Device(DeviceError::Rejected));
        assert_eq!(sign.to_string(), "request rejected on device");
    }

    #[test]
    fn builder_error_passes_through_transparent() {
        let sign: SignError = BuilderError::Decode("truncated".into()).into();
        assert_eq!(sign.to_string(), "decode failed: truncated");
    }

    #[test]
    fn clone_and_eq() {
        let e1 = SignError::EmptySelection;
        let e2 = e1.clone();
        assert_eq!(e1, e2);
    }
}
