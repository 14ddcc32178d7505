//! Shared mock collaborators and fixtures for the signing-flow tests.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;

use kabuto_core::constants::HARDENED;
use kabuto_core::crypto::EphemeralKeyPair;
use kabuto_core::error::{BuilderError, DerivationError, DeviceError};
use kabuto_core::traits::{KeyDeriver, SigningDevice, TransactionBuilder};
use kabuto_core::types::{
    Addressing, ChangeAddress, DecodedTx, DeviceVersion, ExtendedPublicKey, OutPoint, RawWitness,
    SimulatedTx, TransactionInput, TransactionOutput, TransactionProposal, TxBodyMap, TxId,
    TxWitness, WireInput, WireOutput,
};
use kabuto_ledger::HwDeviceInfo;
use kabuto_ledger::device::HwFeatures;

/// Install a fmt subscriber once for the whole test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Which proposal inputs the mock builder's "coin selection" consumes.
#[derive(Clone, Debug)]
pub enum SelectionPlan {
    /// Consume every candidate.
    All,
    /// Consume the first `n` candidates.
    First(usize),
    /// Consume references the proposal never offered.
    Foreign,
}

/// Stand-in for the wallet's transaction-building library.
///
/// The "serialized transaction" is just the JSON of [`DecodedTx`], which
/// makes the codec an exact pass-through: whatever decode sees, encode
/// reproduces. Simulation consumes inputs per the [`SelectionPlan`], appends
/// a change output after the payment outputs, and reports the configured
/// fee.
pub struct MockChainLib {
    /// Fee the simulation reports.
    pub fee: Decimal,
    /// Input-selection behavior.
    pub plan: SelectionPlan,
    simulate_calls: AtomicUsize,
}

impl MockChainLib {
    pub fn new(fee: Decimal, plan: SelectionPlan) -> Self {
        Self {
            fee,
            plan,
            simulate_calls: AtomicUsize::new(0),
        }
    }

    pub fn simulate_calls(&self) -> usize {
        self.simulate_calls.load(Ordering::SeqCst)
    }

    fn consumed(&self, candidates: &[TransactionInput]) -> Vec<OutPoint> {
        match &self.plan {
            SelectionPlan::All => candidates.iter().map(|i| i.ptr.clone()).collect(),
            SelectionPlan::First(n) => {
                candidates.iter().take(*n).map(|i| i.ptr.clone()).collect()
            }
            SelectionPlan::Foreign => vec![OutPoint {
                txid: TxId::new("never-proposed"),
                index: 0,
            }],
        }
    }
}

#[async_trait]
impl TransactionBuilder for MockChainLib {
    async fn simulate(
        &self,
        signer: &EphemeralKeyPair,
        inputs: &[TransactionInput],
        outputs: &[TransactionOutput],
        change: &ChangeAddress,
    ) -> Result<SimulatedTx, BuilderError> {
        self.simulate_calls.fetch_add(1, Ordering::SeqCst);

        let consumed = self.consumed(inputs);
        let consumed_value: Decimal = inputs
            .iter()
            .filter(|i| consumed.contains(&i.ptr))
            .map(|i| i.value)
            .sum();
        let paid: Decimal = outputs.iter().map(|o| o.value).sum();

        let mut decoded_outputs = outputs.to_vec();
        let change_value = consumed_value - paid - self.fee;
        if change_value > Decimal::ZERO {
            decoded_outputs.push(TransactionOutput {
                address: change.address.clone(),
                value: change_value,
            });
        }

        let decoded = DecodedTx {
            witnesses: consumed
                .iter()
                .map(|_| TxWitness {
                    public_key_hex: signer.public_key_hex(),
                    signature_hex: "00".repeat(64),
                })
                .collect(),
            inputs: consumed,
            outputs: decoded_outputs,
        };
        Ok(SimulatedTx {
            fee: self.fee,
            bytes: self.encode(&decoded)?,
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<DecodedTx, BuilderError> {
        serde_json::from_slice(bytes).map_err(|e| BuilderError::Decode(e.to_string()))
    }

    fn encode(&self, tx: &DecodedTx) -> Result<Vec<u8>, BuilderError> {
        serde_json::to_vec(tx).map_err(|e| BuilderError::Encode(e.to_string()))
    }
}

/// What the scripted device should do when asked to sign.
pub enum DeviceScript {
    /// Return one witness per input, echoing each input's path.
    SignAll,
    /// Return witnesses with exactly these paths, one per input.
    SignWithPaths(Vec<Vec<u32>>),
    /// Fail with the given error.
    Fail(DeviceError),
}

/// Stand-in for an open device session.
pub struct ScriptedDevice {
    script: DeviceScript,
    sign_calls: AtomicUsize,
    /// Requests the device saw, for assertions on what was transmitted.
    pub seen_requests: Mutex<Vec<(Vec<WireInput>, Vec<WireOutput>)>>,
}

impl ScriptedDevice {
    pub fn new(script: DeviceScript) -> Self {
        Self {
            script,
            sign_calls: AtomicUsize::new(0),
            seen_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn sign_calls(&self) -> usize {
        self.sign_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SigningDevice for ScriptedDevice {
    async fn version(&self) -> Result<DeviceVersion, DeviceError> {
        Ok(DeviceVersion {
            major: 2,
            minor: 0,
            patch: 4,
        })
    }

    async fn extended_public_key(&self, path: &[u32]) -> Result<ExtendedPublicKey, DeviceError> {
        // Key material keyed off the account segment so distinct accounts
        // yield distinct keys.
        let tag = *path.last().unwrap_or(&0) as u8;
        Ok(ExtendedPublicKey {
            public_key_hex: hex::encode([tag; 32]),
            chain_code_hex: hex::encode([0xCC; 32]),
        })
    }

    async fn sign_transaction(
        &self,
        inputs: &[WireInput],
        outputs: &[WireOutput],
    ) -> Result<Vec<RawWitness>, DeviceError> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_requests
            .lock()
            .unwrap()
            .push((inputs.to_vec(), outputs.to_vec()));

        match &self.script {
            DeviceScript::Fail(err) => Err(err.clone()),
            DeviceScript::SignAll => Ok(inputs
                .iter()
                .enumerate()
                .map(|(i, input)| RawWitness {
                    path: input.path.clone(),
                    signature_hex: format!("5160{i:02x}"),
                })
                .collect()),
            DeviceScript::SignWithPaths(paths) => Ok(paths
                .iter()
                .enumerate()
                .map(|(i, path)| RawWitness {
                    path: path.clone(),
                    signature_hex: format!("5160{i:02x}"),
                })
                .collect()),
        }
    }
}

/// Deterministic fake derivation: each child folds the segment into the key
/// bytes, so different paths produce visibly different "public keys" and
/// derivation chains are order-sensitive.
pub struct FoldDeriver;

impl KeyDeriver for FoldDeriver {
    fn derive_child(&self, xpub: &[u8], segment: u32) -> Result<Vec<u8>, DerivationError> {
        if segment >= HARDENED {
            return Err(DerivationError::Backend(
                "hardened derivation from public key".into(),
            ));
        }
        let mut child = xpub.to_vec();
        child.rotate_left(1);
        for (i, b) in segment.to_le_bytes().iter().enumerate() {
            if let Some(slot) = child.get_mut(i) {
                *slot = slot.wrapping_add(*b);
            }
        }
        Ok(child)
    }
}

// ------------------------------------------------------------------
// Fixtures
// ------------------------------------------------------------------

/// A proposal input with the given id, value, and address index.
pub fn input(id: &str, value: u64, index: u32) -> TransactionInput {
    TransactionInput {
        ptr: OutPoint {
            txid: TxId::new(id),
            index: 0,
        },
        value: Decimal::from(value),
        addressing: Addressing {
            account: 0,
            chain: 0,
            index,
        },
    }
}

/// A payment output.
pub fn output(address: &str, value: u64) -> TransactionOutput {
    TransactionOutput {
        address: address.into(),
        value: Decimal::from(value),
    }
}

/// The standard two-input, one-output proposal used across the suite:
/// 1_000_000 + 500_000 in, 1_200_000 out, fee 30_000, change 270_000.
pub fn standard_proposal() -> TransactionProposal {
    TransactionProposal {
        inputs: vec![input("aa", 1_000_000, 0), input("bb", 500_000, 1)],
        outputs: vec![output("ext1", 1_200_000)],
        fee: Decimal::from(30_000u64),
    }
}

/// Raw bodies for the given ids.
pub fn bodies_for(ids: &[&str]) -> TxBodyMap {
    ids.iter()
        .map(|id| (TxId::new(*id), format!("rawbody-{id}")))
        .collect()
}

/// The wallet's change address at account 0, internal chain, index 0.
pub fn change_addr() -> ChangeAddress {
    ChangeAddress {
        address: "change_addr".into(),
        addressing: Addressing {
            account: 0,
            chain: 1,
            index: 0,
        },
    }
}

/// Device info with a 64-byte account key of repeated `tag` bytes.
pub fn device_info(tag: u8) -> HwDeviceInfo {
    HwDeviceInfo {
        account_public_key_hex: hex::encode([tag; 64]),
        features: HwFeatures {
            vendor: "ledger.com".into(),
            model: "NanoX".into(),
            label: String::new(),
            device_id: "test-device".into(),
            language: String::new(),
            major_version: 2,
            minor_version: 0,
            patch_version: 4,
        },
    }
}
