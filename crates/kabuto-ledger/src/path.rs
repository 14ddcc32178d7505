//! BIP44 derivation-path construction.
//!
//! Paths are pure functions of their numeric coordinates: the same
//! `(account, chain, index)` always yields the same path, and distinct
//! coordinate tuples yield distinct paths because each coordinate occupies
//! its own fixed position.

use kabuto_core::constants::{ACCOUNT_DEPTH, BIP44_PURPOSE, CARDANO_COIN_TYPE, HARDENED};
use kabuto_core::types::Addressing;

/// Mark a path segment as hardened.
pub fn harden(segment: u32) -> u32 {
    HARDENED + segment
}

/// Derivation parameters for one coin/wallet scheme.
///
/// The default is BIP44 over Cardano. Fields are configuration rather than
/// hard-coded literals so a future coin or purpose variant is a constructor
/// away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DerivationScheme {
    /// Purpose segment, pre-hardening (44 for BIP44).
    pub purpose: u32,
    /// SLIP-44 coin type, pre-hardening.
    pub coin_type: u32,
    /// Number of segments up to and including the account segment.
    pub account_depth: usize,
}

impl Default for DerivationScheme {
    fn default() -> Self {
        Self {
            purpose: BIP44_PURPOSE,
            coin_type: CARDANO_COIN_TYPE,
            account_depth: ACCOUNT_DEPTH,
        }
    }
}

impl DerivationScheme {
    /// Account-level path: `[purpose', coin_type', account']`.
    pub fn account_path(&self, account: u32) -> Vec<u32> {
        vec![
            harden(self.purpose),
            harden(self.coin_type),
            harden(account),
        ]
    }

    /// Full address-level path: `[purpose', coin_type', account', chain, index]`.
    ///
    /// The chain and index segments stay non-hardened so the matching public
    /// keys can be derived from the account-level extended public key.
    pub fn address_path(&self, account: u32, chain: u32, index: u32) -> Vec<u32> {
        let mut path = self.account_path(account);
        path.push(chain);
        path.push(index);
        path
    }

    /// Address-level path for a wallet coordinate.
    pub fn path_for(&self, addressing: &Addressing) -> Vec<u32> {
        self.address_path(addressing.account, addressing.chain, addressing.index)
    }
}
