//! Transformation of resolved inputs and outputs into the device's request
//! shapes.
//!
//! The device verifies each input against the raw body of the transaction
//! that created it, and distinguishes change outputs (identified by a
//! derivation path, hidden from the confirmation screen) from external
//! outputs (shown to the user as address plus amount).

use rust_decimal::Decimal;
use tracing::debug;

use kabuto_core::error::SignError;
use kabuto_core::types::{
    ChangeAddress, SignRequest, TransactionInput, TransactionOutput, TxBodyMap, WireInput,
    WireOutput,
};

use crate::path::DerivationScheme;

/// Map selected inputs into wire inputs.
///
/// Each input carries the full raw body of its creating transaction and the
/// address-level derivation path of the controlling key. A missing body
/// entry means the caller-supplied map is inconsistent with the proposal and
/// fails with [`SignError::MissingRawBody`] naming the offending id.
pub fn to_wire_inputs(
    selected: &[TransactionInput],
    bodies: &TxBodyMap,
    scheme: &DerivationScheme,
) -> Result<Vec<WireInput>, SignError> {
    selected
        .iter()
        .map(|input| {
            let raw_body_hex = bodies
                .get(&input.ptr.txid)
                .ok_or_else(|| SignError::MissingRawBody {
                    txid: input.ptr.txid.clone(),
                })?
                .to_owned();
            Ok(WireInput {
                raw_body_hex,
                output_index: input.ptr.index,
                path: scheme.path_for(&input.addressing),
            })
        })
        .collect()
}

/// Map transaction outputs into wire outputs.
///
/// `outputs` are the outputs of the decoded simulated transaction, which
/// include the change output the proposal itself lacks. The first output
/// whose address equals the change address becomes the single change wire
/// output, carrying the change derivation path and `change_amount`; every
/// other output, including any later duplicate of the change address, is
/// encoded as an external output with its value verbatim.
pub fn to_wire_outputs(
    outputs: &[TransactionOutput],
    change: &ChangeAddress,
    change_amount: Decimal,
    scheme: &DerivationScheme,
) -> Vec<WireOutput> {
    let mut change_emitted = false;
    outputs
        .iter()
        .map(|output| {
            if !change_emitted && output.address == change.address {
                change_emitted = true;
                WireOutput::Change {
                    path: scheme.path_for(&change.addressing),
                    amount: change_amount.to_string(),
                }
            } else {
                WireOutput::External {
                    address: output.address.clone(),
                    amount: output.value.to_string(),
                }
            }
        })
        .collect()
}

/// Compose the full device request from its parts.
pub fn build_sign_request(
    selected: &[TransactionInput],
    bodies: &TxBodyMap,
    outputs: &[TransactionOutput],
    change: &ChangeAddress,
    change_amount: Decimal,
    scheme: &DerivationScheme,
) -> Result<SignRequest, SignError> {
    let inputs = to_wire_inputs(selected, bodies, scheme)?;
    let outputs = to_wire_outputs(outputs, change, change_amount, scheme);
    debug!(
        inputs = inputs.len(),
        outputs = outputs.len(),
        "built device sign request"
    );
    Ok(SignRequest { inputs, outputs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kabuto_core::types::{Addressing, OutPoint, TxId};

    fn input(id: &str, index: u32, addressing: Addressing) -> TransactionInput {
        TransactionInput {
            ptr: OutPoint {
                txid: TxId::new(id),
                index,
            },
            value: Decimal::from(1_000_000u64),
            addressing,
        }
    }

    fn output(address: &str, value: u64) -> TransactionOutput {
        TransactionOutput {
            address: address.into(),
            value: Decimal::from(value),
        }
    }

    fn change() -> ChangeAddress {
        ChangeAddress {
            address: "change_addr".into(),
            addressing: Addressing {
                account: 0,
                chain: 1,
                index: 5,
            },
        }
    }

    fn bodies_for(ids: &[&str]) -> TxBodyMap {
        ids.iter()
            .map(|id| (TxId::new(*id), format!("raw-{id}")))
            .collect()
    }

    #[test]
    fn wire_inputs_carry_body_index_and_path() {
        let scheme = DerivationScheme::default();
        let addressing = Addressing {
            account: 0,
            chain: 0,
            index: 7,
        };
        let wire = to_wire_inputs(
            &[input("aa", 2, addressing)],
            &bodies_for(&["aa"]),
            &scheme,
        )
        .unwrap();

        assert_eq!(wire.len(), 1);
        assert_eq!(wire[0].raw_body_hex, "raw-aa");
        assert_eq!(wire[0].output_index, 2);
        assert_eq!(wire[0].path, scheme.address_path(0, 0, 7));
    }

    #[test]
    fn wire_inputs_missing_body_names_the_input() {
        let scheme = DerivationScheme::default();
        let addressing = Addressing {
            account: 0,
            chain: 0,
            index: 0,
        };
        let err = to_wire_inputs(
            &[
                input("aa", 0, addressing),
                input("bb", 0, addressing),
            ],
            &bodies_for(&["aa"]),
            &scheme,
        )
        .unwrap_err();
        assert_eq!(
            err,
            SignError::MissingRawBody {
                txid: TxId::new("bb")
            }
        );
    }

    #[test]
    fn wire_outputs_split_change_from_external() {
        let scheme = DerivationScheme::default();
        let wire = to_wire_outputs(
            &[output("ext1", 1_200_000), output("change_addr", 270_000)],
            &change(),
            Decimal::from(270_000u64),
            &scheme,
        );

        assert_eq!(
            wire[0],
            WireOutput::External {
                address: "ext1".into(),
                amount: "1200000".into(),
            }
        );
        assert_eq!(
            wire[1],
            WireOutput::Change {
                path: scheme.address_path(0, 1, 5),
                amount: "270000".into(),
            }
        );
    }

    #[test]
    fn wire_outputs_without_change_are_all_external() {
        let scheme = DerivationScheme::default();
        let wire = to_wire_outputs(
            &[output("ext1", 100), output("ext2", 200)],
            &change(),
            Decimal::ZERO,
            &scheme,
        );
        assert!(wire
            .iter()
            .all(|o| matches!(o, WireOutput::External { .. })));
    }

    #[test]
    fn only_first_change_match_becomes_change() {
        let scheme = DerivationScheme::default();
        let wire = to_wire_outputs(
            &[output("change_addr", 100), output("change_addr", 200)],
            &change(),
            Decimal::from(100u64),
            &scheme,
        );
        assert!(matches!(wire[0], WireOutput::Change { .. }));
        assert_eq!(
            wire[1],
            WireOutput::External {
                address: "change_addr".into(),
                amount: "200".into(),
            }
        );
    }

    #[test]
    fn change_amount_overrides_decoded_value() {
        // The change wire output carries the recomputed amount, not the
        // decoded output's value.
        let scheme = DerivationScheme::default();
        let wire = to_wire_outputs(
            &[output("change_addr", 999)],
            &change(),
            Decimal::from(270_000u64),
            &scheme,
        );
        assert_eq!(
            wire[0],
            WireOutput::Change {
                path: scheme.address_path(0, 1, 5),
                amount: "270000".into(),
            }
        );
    }

    #[test]
    fn build_sign_request_composes_both_halves() {
        let scheme = DerivationScheme::default();
        let addressing = Addressing {
            account: 0,
            chain: 0,
            index: 0,
        };
        let request = build_sign_request(
            &[input("aa", 0, addressing)],
            &bodies_for(&["aa"]),
            &[output("ext1", 1_200_000), output("change_addr", 270_000)],
            &change(),
            Decimal::from(270_000u64),
            &scheme,
        )
        .unwrap();

        assert_eq!(request.inputs.len(), 1);
        assert_eq!(request.outputs.len(), 2);
    }
}
