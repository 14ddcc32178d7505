//! The end-to-end signing flow.
//!
//! One [`HardwareSigner::sign`] call takes a fee-validated proposal to a
//! fully witnessed transaction in six strictly ordered steps:
//!
//! 1. Simulate the transaction with a throwaway key pair
//! 2. Reconcile the proposal fee against the simulated fee
//! 3. Resolve which proposal inputs the simulation actually consumed
//! 4. Transform inputs and outputs into the device request
//! 5. Request signatures from the device
//! 6. Normalize each returned witness and splice the list into the
//!    simulated transaction, re-encoding it as the final result
//!
//! Every step depends on the previous one's output; nothing is retried at
//! this layer and nothing partially signed is ever returned.

use tracing::{debug, warn};

use kabuto_core::crypto::EphemeralKeyPair;
use kabuto_core::error::SignError;
use kabuto_core::traits::{KeyDeriver, SigningDevice, TransactionBuilder};
use kabuto_core::types::{ChangeAddress, SignedTx, TransactionProposal, TxBodyMap};

use crate::device::HwDeviceInfo;
use crate::path::DerivationScheme;
use crate::{fee, payload, selection, witness};

/// Drives one signing attempt against a connected device.
///
/// Holds only borrowed collaborators and the derivation scheme; all
/// per-attempt state lives inside [`sign`](Self::sign) and is dropped when
/// it returns.
pub struct HardwareSigner<'a> {
    builder: &'a dyn TransactionBuilder,
    device: &'a dyn SigningDevice,
    deriver: &'a dyn KeyDeriver,
    scheme: DerivationScheme,
}

impl<'a> HardwareSigner<'a> {
    /// Create a signer over the three collaborators with the default
    /// derivation scheme.
    pub fn new(
        builder: &'a dyn TransactionBuilder,
        device: &'a dyn SigningDevice,
        deriver: &'a dyn KeyDeriver,
    ) -> Self {
        Self {
            builder,
            device,
            deriver,
            scheme: DerivationScheme::default(),
        }
    }

    /// Override the derivation scheme (coin/purpose variants).
    pub fn with_scheme(mut self, scheme: DerivationScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Sign `proposal` with the connected device.
    ///
    /// The device session cannot multiplex requests, so the caller must not
    /// start a second attempt against the same session until this one
    /// resolves. Cancellation of the device step follows the transport's
    /// own timeout/cancel semantics and surfaces as a
    /// [`DeviceError`](kabuto_core::error::DeviceError).
    pub async fn sign(
        &self,
        proposal: &TransactionProposal,
        bodies: &TxBodyMap,
        change: &ChangeAddress,
        device_info: &HwDeviceInfo,
    ) -> Result<SignedTx, SignError> {
        // Step 1: simulate with a key pair that exists only for this attempt.
        let throwaway = EphemeralKeyPair::generate();
        let simulated = self
            .builder
            .simulate(&throwaway, &proposal.inputs, &proposal.outputs, change)
            .await?;
        debug!(fee = %simulated.fee, "simulated transaction");

        // Step 2: the proposal and the builder must agree on the fee.
        if let Err(e) = fee::reconcile(proposal.fee, simulated.fee) {
            warn!(proposed = %proposal.fee, simulated = %simulated.fee, "fee mismatch");
            return Err(e);
        }

        // Step 3: the simulation is the ground truth for input selection.
        let decoded = self.builder.decode(&simulated.bytes)?;
        let selected = selection::resolve_inputs(&proposal.inputs, &decoded.inputs)?;
        debug!(
            selected = selected.len(),
            candidates = proposal.inputs.len(),
            "resolved input selection"
        );

        // Step 4: build the device request. The decoded outputs carry the
        // change output the proposal lacks; its amount is recomputed from
        // the resolved selection.
        let change_amount = fee::compute_change(&selected, &proposal.outputs, proposal.fee);
        let request = payload::build_sign_request(
            &selected,
            bodies,
            &decoded.outputs,
            change,
            change_amount,
            &self.scheme,
        )?;

        // Step 5: one shot at the device; transport errors surface verbatim.
        let raw_witnesses = self
            .device
            .sign_transaction(&request.inputs, &request.outputs)
            .await?;
        debug!(witnesses = raw_witnesses.len(), "device returned witnesses");

        // Step 6: replace the placeholder witnesses, in response order, and
        // re-encode. The i-th raw witness becomes the i-th final witness.
        let mut signed = decoded;
        signed.witnesses = raw_witnesses
            .iter()
            .map(|raw| {
                witness::normalize(
                    &device_info.account_public_key_hex,
                    raw,
                    self.deriver,
                    self.scheme.account_depth,
                )
            })
            .collect::<Result<_, _>>()?;

        let bytes = self.builder.encode(&signed)?;
        Ok(SignedTx {
            bytes,
            fee: simulated.fee,
        })
    }
}
