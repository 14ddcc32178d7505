//! Resolution of the builder's actual input selection.
//!
//! The proposal lists candidate inputs; the builder is free to consume only
//! a subset of them. The decoded simulated transaction is the ground truth
//! for what was consumed, and only those inputs may be presented to the
//! device for signing.

use std::collections::HashSet;

use kabuto_core::error::SignError;
use kabuto_core::types::{OutPoint, TransactionInput};

/// Filter the proposal inputs down to those the simulation consumed.
///
/// Matching is on the full reference (transaction id and output index).
/// The result preserves proposal order, not simulated-transaction order, so
/// that downstream path and witness handling stays deterministic for a given
/// proposal. An empty result is a contract violation by the builder and
/// fails with [`SignError::EmptySelection`].
pub fn resolve_inputs(
    proposal_inputs: &[TransactionInput],
    consumed: &[OutPoint],
) -> Result<Vec<TransactionInput>, SignError> {
    let consumed: HashSet<&OutPoint> = consumed.iter().collect();
    let selected: Vec<TransactionInput> = proposal_inputs
        .iter()
        .filter(|input| consumed.contains(&input.ptr))
        .cloned()
        .collect();

    if selected.is_empty() {
        return Err(SignError::EmptySelection);
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kabuto_core::types::{Addressing, TxId};
    use rust_decimal::Decimal;

    fn input(id: &str, index: u32) -> TransactionInput {
        TransactionInput {
            ptr: OutPoint {
                txid: TxId::new(id),
                index,
            },
            value: Decimal::from(500_000u64),
            addressing: Addressing {
                account: 0,
                chain: 0,
                index,
            },
        }
    }

    fn ptr(id: &str, index: u32) -> OutPoint {
        OutPoint {
            txid: TxId::new(id),
            index,
        }
    }

    #[test]
    fn keeps_only_consumed_inputs() {
        let proposal = vec![input("aa", 0), input("bb", 0), input("cc", 0)];
        let selected = resolve_inputs(&proposal, &[ptr("aa", 0), ptr("cc", 0)]).unwrap();
        assert_eq!(selected, vec![input("aa", 0), input("cc", 0)]);
    }

    #[test]
    fn preserves_proposal_order_not_consumed_order() {
        let proposal = vec![input("aa", 0), input("bb", 0), input("cc", 0)];
        // Consumed list deliberately reversed relative to the proposal.
        let selected = resolve_inputs(&proposal, &[ptr("cc", 0), ptr("aa", 0)]).unwrap();
        assert_eq!(selected[0].ptr.txid, TxId::new("aa"));
        assert_eq!(selected[1].ptr.txid, TxId::new("cc"));
    }

    #[test]
    fn full_selection_passes_through() {
        let proposal = vec![input("aa", 0), input("bb", 1)];
        let selected = resolve_inputs(&proposal, &[ptr("aa", 0), ptr("bb", 1)]).unwrap();
        assert_eq!(selected, proposal);
    }

    #[test]
    fn matches_on_index_not_just_id() {
        // Two proposal inputs spend different outputs of the same
        // transaction; only one was consumed.
        let proposal = vec![input("aa", 0), input("aa", 1)];
        let selected = resolve_inputs(&proposal, &[ptr("aa", 1)]).unwrap();
        assert_eq!(selected, vec![input("aa", 1)]);
    }

    #[test]
    fn empty_selection_is_error() {
        let proposal = vec![input("aa", 0)];
        let err = resolve_inputs(&proposal, &[ptr("zz", 0)]).unwrap_err();
        assert_eq!(err, SignError::EmptySelection);
    }

    #[test]
    fn consumed_refs_unknown_to_proposal_are_ignored() {
        let proposal = vec![input("aa", 0)];
        let selected = resolve_inputs(&proposal, &[ptr("aa", 0), ptr("zz", 9)]).unwrap();
        assert_eq!(selected, vec![input("aa", 0)]);
    }
}
