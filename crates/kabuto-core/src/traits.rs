//! Trait interfaces for the signing adapter's collaborators.
//!
//! These traits define the contracts between this adapter and the systems
//! around it:
//! - [`TransactionBuilder`] — coin selection, simulation, and the
//!   transaction codec (a wallet/chain library implements)
//! - [`SigningDevice`] — one open session with a hardware signing device
//!   (a transport layer implements)
//! - [`KeyDeriver`] — non-hardened public child-key derivation (a BIP32-style
//!   crypto library implements)
//!
//! The adapter only ever consumes these as `&dyn` references, so every flow
//! can be exercised in tests with hand-rolled mocks and no real chain,
//! device, or crypto backend.

use async_trait::async_trait;

use crate::crypto::EphemeralKeyPair;
use crate::error::{BuilderError, DerivationError, DeviceError};
use crate::types::{
    ChangeAddress, DecodedTx, DeviceVersion, ExtendedPublicKey, RawWitness, SimulatedTx,
    TransactionInput, TransactionOutput, WireInput, WireOutput,
};

/// Coin-selection, simulation, and codec capability.
///
/// `simulate` builds and signs a complete transaction from the proposal
/// using the supplied throwaway key pair; the result reveals the builder's
/// actual input selection and fee. `decode`/`encode` round-trip the
/// serialized form; an implementation must carry fields this adapter does
/// not model through the round-trip unchanged.
#[async_trait]
pub trait TransactionBuilder: Send + Sync {
    /// Build a throwaway-signed transaction from the proposal pieces.
    async fn simulate(
        &self,
        signer: &EphemeralKeyPair,
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
        change: &ChangeAddress,
    ) -> Result<SimulatedTx, BuilderError>;

    /// Decode a serialized transaction into its structured form.
    fn decode(&self, bytes: &[u8]) -> Result<DecodedTx, BuilderError>;

    /// Re-encode a structured transaction.
    fn encode(&self, tx: &DecodedTx) -> Result<Vec<u8>, BuilderError>;
}

/// One open session with a signing device.
///
/// A session cannot multiplex: the device holds no attempt id, so callers
/// must serialize signing attempts against the same session. Transport-level
/// retries for transient faults live behind this trait, never above it.
#[async_trait]
pub trait SigningDevice: Send + Sync {
    /// Version of the signing application running on the device.
    async fn version(&self) -> Result<DeviceVersion, DeviceError>;

    /// Extended public key for a derivation path.
    async fn extended_public_key(&self, path: &[u32]) -> Result<ExtendedPublicKey, DeviceError>;

    /// Ask the device to sign. Returns one witness per input, in input
    /// order. The device shows external outputs to the user for
    /// confirmation; rejection surfaces as [`DeviceError::Rejected`].
    async fn sign_transaction(
        &self,
        inputs: &[WireInput],
        outputs: &[WireOutput],
    ) -> Result<Vec<RawWitness>, DeviceError>;
}

/// Non-hardened public child-key derivation.
///
/// Takes extended-public-key bytes and one path segment, returns the child's
/// extended-public-key bytes. Must fail for hardened segments: those require
/// the parent private key, which never leaves the device.
pub trait KeyDeriver: Send + Sync {
    /// Derive the child extended public key for one path segment.
    fn derive_child(&self, xpub: &[u8], segment: u32) -> Result<Vec<u8>, DerivationError>;
}
