//! Fee reconciliation and change arithmetic.
//!
//! All value math is exact decimal arithmetic. The change returned here is
//! what the change wire-output carries to the device, so an error of even
//! one unit would make the device display a wrong amount or refuse the
//! transaction.

use rust_decimal::Decimal;

use kabuto_core::error::SignError;
use kabuto_core::types::{TransactionInput, TransactionOutput};

/// Change amount for a selection: `sum(inputs) - sum(outputs) - fee`.
///
/// `outputs` are the proposal's payment outputs (change excluded); a
/// negative result means the selection cannot cover the payments plus fee,
/// which the fee reconciliation upstream is expected to have ruled out.
pub fn compute_change(
    inputs: &[TransactionInput],
    outputs: &[TransactionOutput],
    fee: Decimal,
) -> Decimal {
    let total_input: Decimal = inputs.iter().map(|i| i.value).sum();
    let total_output: Decimal = outputs.iter().map(|o| o.value).sum();
    total_input - total_output - fee
}

/// Check that the proposal and the simulation agree on the fee.
///
/// Any nonzero difference aborts the attempt: it means the proposal was
/// built against different selection rules than the builder applied, and a
/// transaction signed under either fee would not be the one the user
/// approved.
pub fn reconcile(proposed: Decimal, simulated: Decimal) -> Result<(), SignError> {
    if proposed != simulated {
        return Err(SignError::FeeMismatch {
            proposed,
            simulated,
        });
    }
    Ok(())
}
