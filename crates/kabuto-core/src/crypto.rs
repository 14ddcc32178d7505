//! Throwaway key material for transaction simulation.
//!
//! The signing flow never holds a wallet private key. It does, however, need
//! *some* key pair to drive the builder's signing path during simulation:
//! the resulting placeholder witnesses are discarded and replaced by the
//! device's real ones. [`EphemeralKeyPair`] exists for exactly that one
//! simulation and is dropped with the attempt.

use ed25519_dalek::SigningKey;
use std::fmt;

/// Disposable Ed25519 key pair for the simulation step.
///
/// The secret is zeroized on drop by the underlying library and is redacted
/// from `Debug` output.
pub struct EphemeralKeyPair {
    signing_key: SigningKey,
}

impl EphemeralKeyPair {
    /// Generate a fresh key pair from the OS cryptographic RNG.
    pub fn generate() -> Self {
        let mut csprng = rand::rngs::OsRng;
        Self {
            signing_key: SigningKey::generate(&mut csprng),
        }
    }

    /// Create a key pair from 32-byte secret material. Test fixtures only
    /// need determinism, not secrecy.
    pub fn from_secret_bytes(bytes: [u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(&bytes),
        }
    }

    /// Raw public key bytes (32 bytes), for the builder to stamp into
    /// placeholder witnesses.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// Public key as hex.
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    /// Sign a message, returning the raw 64-byte signature. The builder
    /// uses this to produce placeholder witnesses during simulation.
    pub fn sign(&self, message: &[u8]) -> [u8; 64] {
        use ed25519_dalek::Signer;
        self.signing_key.sign(message).to_bytes()
    }
}

impl fmt::Debug for EphemeralKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EphemeralKeyPair")
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}
