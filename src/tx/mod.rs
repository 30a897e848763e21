//! Transaction model.
//!
//! Amounts, outputs, transactions and the signing hash that binds a
//! signature to one input of one transaction.

pub mod amount;
pub mod transaction;

// Re-export key types
pub use amount::{Amount, CENT, UNITS_PER_COIN};
pub use transaction::{
    FundedOutput, OutPoint, Transaction, TxId, TxIn, TxOut, UnsignedTransaction, TX_VERSION,
};
