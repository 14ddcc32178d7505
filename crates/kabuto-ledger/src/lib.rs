//! # kabuto-ledger — hardware-device signing flow.
//!
//! Turns a fee-validated [`TransactionProposal`](kabuto_core::types::TransactionProposal)
//! into a device-signed transaction. The device only ever sees derivation
//! paths and raw input/output data; private keys never leave it, and this
//! crate never holds one.
//!
//! # Modules
//!
//! - [`path`] — BIP44 path construction and the [`DerivationScheme`](path::DerivationScheme) config
//! - [`fee`] — change arithmetic and proposal/simulation fee reconciliation
//! - [`selection`] — resolution of the builder's actual input selection
//! - [`payload`] — wire-shape transformation for the device request
//! - [`witness`] — public-key derivation for device signatures
//! - [`device`] — device identification and account-key acquisition
//! - [`signer`] — the end-to-end orchestrator

pub mod device;
pub mod fee;
pub mod path;
pub mod payload;
pub mod selection;
pub mod signer;
pub mod witness;

// Re-exports for convenient access
pub use device::{fetch_device_info, HwDeviceInfo, HwFeatures};
pub use path::{harden, DerivationScheme};
pub use signer::HardwareSigner;
