//! # kabuto-core — types and traits for the Kabuto signing adapter.
//!
//! Defines the data model shared between a wallet frontend, the
//! coin-selection/codec library, and the hardware-device transport, plus the
//! trait seams the signing flow is built against.
//!
//! # Modules
//!
//! - [`constants`] — BIP44/derivation protocol constants
//! - [`types`] — proposals, decoded transactions, wire shapes, witnesses
//! - [`error`] — per-domain error enums and the [`SignError`](error::SignError) roll-up
//! - [`crypto`] — throwaway key pair for simulation
//! - [`traits`] — collaborator contracts (builder, device, key deriver)

pub mod constants;
pub mod crypto;
pub mod error;
pub mod traits;
pub mod types;

// Re-exports for convenient access
pub use crypto::EphemeralKeyPair;
pub use error::{BuilderError, DerivationError, DeviceError, SignError};
pub use traits::{KeyDeriver, SigningDevice, TransactionBuilder};
pub use types::{
    Addressing, ChangeAddress, DecodedTx, DeviceVersion, ExtendedPublicKey, OutPoint, RawWitness,
    SignRequest, SignedTx, SimulatedTx, TransactionInput, TransactionOutput, TransactionProposal,
    TxBodyMap, TxId, TxWitness, WireInput, WireOutput,
};
