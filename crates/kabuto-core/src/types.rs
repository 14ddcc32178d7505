//! Core signing types: proposals, decoded transactions, wire shapes.
//!
//! All monetary values use [`rust_decimal::Decimal`] so that fee and change
//! arithmetic is exact; floating point never appears in value math.
//! Byte-level payloads (transaction bodies, keys, signatures) travel as hex
//! strings, matching the representation used by the device protocol and the
//! transaction codec.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Hex-encoded transaction id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxId(String);

impl TxId {
    /// Create a transaction id from its hex string.
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// The hex string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TxId {
    fn from(hex: &str) -> Self {
        Self(hex.to_owned())
    }
}

/// Reference to a specific output of a previous transaction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OutPoint {
    /// Id of the transaction containing the referenced output.
    pub txid: TxId,
    /// Index of the output within that transaction.
    pub index: u32,
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

/// Position of a key in the wallet's derivation tree.
///
/// Immutable once created; `chain` is 0 for external (receive) addresses and
/// 1 for internal (change) addresses.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Addressing {
    /// Account segment (pre-hardening).
    pub account: u32,
    /// External/internal chain segment.
    pub chain: u32,
    /// Address index within the chain.
    pub index: u32,
}

/// A proposal input: a previously created output being spent.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionInput {
    /// The output being consumed.
    pub ptr: OutPoint,
    /// Value of that output.
    pub value: Decimal,
    /// Which wallet key controls it.
    pub addressing: Addressing,
}

/// A proposal output: destination address and amount.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionOutput {
    /// Destination address in its string encoding.
    pub address: String,
    /// Amount sent to the address.
    pub value: Decimal,
}

/// An unsigned transaction proposal produced by the coin-selection
/// collaborator.
///
/// Read-only for the duration of one signing attempt. `outputs` lists the
/// payment outputs only; the change output materializes during simulation.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TransactionProposal {
    /// Candidate inputs, in the order the proposal listed them.
    pub inputs: Vec<TransactionInput>,
    /// Payment outputs.
    pub outputs: Vec<TransactionOutput>,
    /// Fee the proposal was built for.
    pub fee: Decimal,
}

/// The wallet address (and key position) that receives change, if any.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ChangeAddress {
    /// Change address in its string encoding.
    pub address: String,
    /// Derivation coordinate of the key behind it.
    pub addressing: Addressing,
}

/// Map from transaction id to the hex-encoded full body of the transaction
/// that created it.
///
/// The device independently verifies each input's value against the raw body
/// of the transaction being spent, so the caller must supply one entry per
/// distinct input id.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TxBodyMap(HashMap<TxId, String>);

impl TxBodyMap {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the raw body for a transaction id.
    pub fn insert(&mut self, txid: TxId, body_hex: impl Into<String>) {
        self.0.insert(txid, body_hex.into());
    }

    /// Look up the raw body for a transaction id.
    pub fn get(&self, txid: &TxId) -> Option<&str> {
        self.0.get(txid).map(String::as_str)
    }

    /// Number of registered bodies.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no bodies are registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(TxId, String)> for TxBodyMap {
    fn from_iter<I: IntoIterator<Item = (TxId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Serialized transaction produced by signing the proposal with a throwaway
/// key pair.
///
/// Exists only to reveal which inputs the builder actually selected and what
/// fee it settled on; it is never transmitted and is discarded at the end of
/// the attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimulatedTx {
    /// Fee the builder computed during simulation.
    pub fee: Decimal,
    /// Opaque serialized transaction bytes.
    pub bytes: Vec<u8>,
}

/// A witness as it appears in a decoded transaction: public key plus
/// signature, both hex-encoded.
///
/// After simulation these are placeholders made with the throwaway key;
/// the signing flow replaces them with device-backed witnesses.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxWitness {
    /// Extended public key of the signer, hex-encoded.
    pub public_key_hex: String,
    /// Signature over the transaction, hex-encoded.
    pub signature_hex: String,
}

/// Structured form of a serialized transaction, as exposed by the codec
/// collaborator.
///
/// Only the fields this adapter touches are modeled; the codec is
/// responsible for carrying everything else through an encode/decode
/// round-trip unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DecodedTx {
    /// Outputs actually consumed by the transaction.
    pub inputs: Vec<OutPoint>,
    /// Outputs created, including the change output when present.
    pub outputs: Vec<TransactionOutput>,
    /// Witness list, one entry per input.
    pub witnesses: Vec<TxWitness>,
}

/// A transaction input in the shape the signing device expects.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct WireInput {
    /// Hex-encoded full body of the transaction that created the output.
    pub raw_body_hex: String,
    /// Index of the output being spent within that transaction.
    pub output_index: u32,
    /// Full derivation path of the controlling key.
    pub path: Vec<u32>,
}

/// A transaction output in the shape the signing device expects.
///
/// The device renders `External` outputs for user confirmation and treats
/// `Change` outputs as returning to the wallet, displaying neither address
/// nor amount for them. Amounts are decimal strings per the device protocol.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub enum WireOutput {
    /// Funds leaving the wallet.
    External {
        /// Destination address.
        address: String,
        /// Amount as a decimal string.
        amount: String,
    },
    /// Funds returning to the wallet's own key.
    Change {
        /// Derivation path of the change key.
        path: Vec<u32>,
        /// Amount as a decimal string.
        amount: String,
    },
}

/// The complete request handed to the signing device.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SignRequest {
    /// Inputs, in selection order.
    pub inputs: Vec<WireInput>,
    /// Outputs, in simulated-transaction order.
    pub outputs: Vec<WireOutput>,
}

/// A signature as returned by the device: derivation path plus raw
/// signature, no public key.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct RawWitness {
    /// Full derivation path the device signed with.
    pub path: Vec<u32>,
    /// Signature, hex-encoded.
    pub signature_hex: String,
}

/// The final signed transaction, ready for broadcast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTx {
    /// Serialized transaction with device-backed witnesses spliced in.
    pub bytes: Vec<u8>,
    /// Fee carried over from the simulation.
    pub fee: Decimal,
}

/// Version triple reported by the device application.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeviceVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl fmt::Display for DeviceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Extended public key material returned by the device for a given path.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    /// Public key bytes, hex-encoded.
    pub public_key_hex: String,
    /// Chain code bytes, hex-encoded.
    pub chain_code_hex: String,
}
