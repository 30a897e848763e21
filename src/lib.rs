//! # Odds-and-Evens Predicates
//!
//! Spending predicates for a Bitcoin-style UTXO ledger, a stack machine that
//! decides whether a witness satisfies one, and a two-player commit-reveal
//! game whose payout only the winner can claim.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  ODDS-EVENS PREDICATES                      │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Pure primitives                          │
//! │  ├── hash.rs     - SHA-256, HASH160, signing-hash writer    │
//! │  ├── num.rs      - Script-number encoding                   │
//! │  └── keys.rs     - secp256k1 keys and DER signatures        │
//! │                                                             │
//! │  script/         - Programs and evaluation (synchronous)    │
//! │  tx/             - Amounts, transactions, signing hashes    │
//! │  scheme/         - P2PK, P2PKH, linear puzzle dispatch      │
//! │  game/           - Commitments, players, odds and evens     │
//! │                                                             │
//! │  ledger/         - Async boundary (tokio)                   │
//! │  ├── client.rs   - LedgerClient capability                  │
//! │  ├── memory.rs   - In-memory ledger                         │
//! │  └── session.rs  - Fund / spend with retry and timeout      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Evaluation Model
//!
//! The unlocking program runs first, then the locking program, on one
//! shared stack. The pair is accepted when neither aborts and the top item
//! is truthy. Rejection is a value ([`VerificationFailure`]), never a panic.
//!
//! Construction errors (unrepresentable numbers, unsolvable puzzles) are
//! reported when a program is built; they never turn into a predicate that
//! silently always fails.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod game;
pub mod ledger;
pub mod scheme;
pub mod script;
pub mod tx;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use crate::core::keys::{Address, KeyPair, PubKeyHash, PublicKey, TxSignature};
pub use error::{ConstraintError, Error, Result};
pub use game::{determine_winner, Choice, OddsAndEvens, Party};
pub use ledger::{InMemoryLedger, LedgerClient, LedgerConfig, LedgerError, SpendSession};
pub use scheme::{AuthorizationScheme, LinearPuzzle, PayToKeyHash, PayToPubKey};
pub use script::{
    LockingProgram, ProgramBuilder, StackMachine, TransactionContext, UnlockingProgram,
    VerificationFailure,
};
pub use tx::{Amount, Transaction, TxId, UnsignedTransaction};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
