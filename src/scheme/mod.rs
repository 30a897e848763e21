//! Authorization Schemes
//!
//! Each scheme knows how to produce the predicate that locks an output and,
//! given the pending spending transaction, the witness that unlocks it.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  AUTHORIZATION SCHEMES                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  pay_to_pubkey.rs   - <pubkey> CHECKSIG                     │
//! │  pay_to_key_hash.rs - DUP HASH160 <hash> EQUALVERIFY CHECKSIG│
//! │  linear_puzzle.rs   - x + y = S, |x - y| = D                │
//! │  game::odds_evens   - commit-reveal, winner-only claim      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The set of schemes is closed, so dispatch is a `match` over
//! [`AuthorizationScheme`].

pub mod linear_puzzle;
pub mod pay_to_key_hash;
pub mod pay_to_pubkey;

pub use linear_puzzle::{LinearPuzzle, Solution};
pub use pay_to_key_hash::PayToKeyHash;
pub use pay_to_pubkey::PayToPubKey;

use crate::error::Result;
use crate::game::OddsAndEvens;
use crate::script::{LockingProgram, UnlockingProgram};
use crate::tx::UnsignedTransaction;

/// Every supported way of gating an output.
#[derive(Debug)]
pub enum AuthorizationScheme {
    /// Signature by an embedded public key.
    PayToPubKey(PayToPubKey),
    /// Signature by a key matching an embedded hash.
    PayToKeyHash(PayToKeyHash),
    /// Integer pair solving a linear system.
    LinearPuzzle(LinearPuzzle),
    /// Odds-and-evens game; only the winner may claim.
    CommitRevealGame(OddsAndEvens),
}

impl AuthorizationScheme {
    /// Short label for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::PayToPubKey(_) => "pay-to-pubkey",
            Self::PayToKeyHash(_) => "pay-to-key-hash",
            Self::LinearPuzzle(_) => "linear-puzzle",
            Self::CommitRevealGame(_) => "odds-and-evens",
        }
    }

    /// Predicate for the funded output.
    pub fn locking_program(&self) -> Result<LockingProgram> {
        match self {
            Self::PayToPubKey(s) => s.locking_program(),
            Self::PayToKeyHash(s) => s.locking_program(),
            Self::LinearPuzzle(s) => s.locking_program(),
            Self::CommitRevealGame(s) => s.locking_program(),
        }
    }

    /// Witness for `tx`. Single use: build a fresh one per attempt.
    pub fn unlocking_program(&self, tx: &UnsignedTransaction) -> Result<UnlockingProgram> {
        match self {
            Self::PayToPubKey(s) => s.unlocking_program(tx),
            Self::PayToKeyHash(s) => s.unlocking_program(tx),
            Self::LinearPuzzle(s) => s.unlocking_program(),
            Self::CommitRevealGame(s) => s.unlocking_program(tx),
        }
    }
}

impl From<PayToPubKey> for AuthorizationScheme {
    fn from(s: PayToPubKey) -> Self {
        Self::PayToPubKey(s)
    }
}

impl From<PayToKeyHash> for AuthorizationScheme {
    fn from(s: PayToKeyHash) -> Self {
        Self::PayToKeyHash(s)
    }
}

impl From<LinearPuzzle> for AuthorizationScheme {
    fn from(s: LinearPuzzle) -> Self {
        Self::LinearPuzzle(s)
    }
}

impl From<OddsAndEvens> for AuthorizationScheme {
    fn from(s: OddsAndEvens) -> Self {
        Self::CommitRevealGame(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Choice, Party};
    use crate::script::StackMachine;
    use crate::testing::spend_of;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn all_schemes() -> Vec<AuthorizationScheme> {
        let mut rng = StdRng::seed_from_u64(41);
        vec![
            PayToPubKey::generate(&mut rng).into(),
            PayToKeyHash::generate(&mut rng).into(),
            LinearPuzzle::new(36, 1442).unwrap().into(),
            OddsAndEvens::with_rng(Choice::One, Choice::Zero, &mut rng).into(),
        ]
    }

    #[test]
    fn test_every_scheme_unlocks_its_own_output() {
        let machine = StackMachine::new();
        for scheme in all_schemes() {
            let locking = scheme.locking_program().unwrap();
            let tx = spend_of(&locking);
            let unlocking = scheme.unlocking_program(&tx).unwrap();
            assert!(
                machine.execute(&locking, &unlocking, &tx.context()),
                "{} rejected its own witness",
                scheme.name()
            );
        }
    }

    #[test]
    fn test_witnesses_do_not_cross_schemes() {
        let machine = StackMachine::new();
        let schemes = all_schemes();
        for (i, locker) in schemes.iter().enumerate() {
            let locking = locker.locking_program().unwrap();
            let tx = spend_of(&locking);
            for (j, unlocker) in schemes.iter().enumerate() {
                if i == j {
                    continue;
                }
                let unlocking = unlocker.unlocking_program(&tx).unwrap();
                assert!(
                    !machine.execute(&locking, &unlocking, &tx.context()),
                    "{} accepted a {} witness",
                    locker.name(),
                    unlocker.name()
                );
            }
        }
    }

    #[test]
    fn test_losing_claimant_through_enum() {
        let game = OddsAndEvens::with_rng(Choice::Zero, Choice::Zero, &mut StdRng::seed_from_u64(42))
            .claimed_by(Party::Odd);
        let scheme = AuthorizationScheme::from(game);
        let locking = scheme.locking_program().unwrap();
        let tx = spend_of(&locking);
        let unlocking = scheme.unlocking_program(&tx).unwrap();

        assert!(!StackMachine::new().execute(&locking, &unlocking, &tx.context()));
    }
}
