//! Crate-wide error type.
//!
//! Construction-time failures (`Encoding`, `Constraint`, `Key`) are kept
//! apart from the expected `Verification` outcome and from `Ledger`
//! boundary failures so callers can tell "do not broadcast" from "the
//! network is down".

use thiserror::Error;

use crate::core::keys::KeyError;
use crate::core::num::EncodingError;
use crate::game::player::Party;
use crate::ledger::client::LedgerError;
use crate::script::machine::VerificationFailure;

/// Scheme preconditions that cannot be met.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstraintError {
    /// Sum and difference of different parity have no integer solution.
    #[error("sum {sum} and difference {difference} differ in parity; no integer solution")]
    ParityMismatch {
        /// Target sum.
        sum: i64,
        /// Target absolute difference.
        difference: i64,
    },
    /// An absolute difference cannot be negative.
    #[error("absolute difference must be non-negative, got {0}")]
    NegativeDifference(i64),
    /// A player was seated on the wrong side of the game.
    #[error("expected the {expected:?} player, got the {got:?} player")]
    WrongSeat {
        /// Seat being filled.
        expected: Party,
        /// Party the player was generated for.
        got: Party,
    },
}

/// Any failure surfaced by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Value not representable in a program.
    #[error("encoding error: {0}")]
    Encoding(#[from] EncodingError),

    /// Scheme precondition violated.
    #[error("constraint error: {0}")]
    Constraint(#[from] ConstraintError),

    /// Witness does not satisfy the predicate.
    #[error("verification failed: {0}")]
    Verification(#[from] VerificationFailure),

    /// Signing failed.
    #[error("key error: {0}")]
    Key(#[from] KeyError),

    /// Ledger boundary failure.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

/// Result alias for crate operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
