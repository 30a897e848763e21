//! The capability the rest of the crate needs from a ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::keys::{KeyError, KeyPair, PubKeyHash, TxSignature};
use crate::script::{LockingProgram, StackMachine, TransactionContext, UnlockingProgram};
use crate::tx::{Amount, FundedOutput, OutPoint, Transaction, TxId, UnsignedTransaction};

/// Failures at the ledger boundary.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Wallet cannot cover the value plus fee.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds {
        /// Value plus fee.
        needed: Amount,
        /// Spendable balance.
        available: Amount,
    },

    /// Ledger refused the transaction.
    #[error("transaction rejected: {0}")]
    Rejected(String),

    /// Transport failure; the call may succeed if repeated.
    #[error("network error: {0}")]
    Network(String),

    /// Call did not finish in time.
    #[error("timed out waiting for the ledger")]
    Timeout,

    /// Output is not (or no longer) spendable.
    #[error("unknown output {0}")]
    UnknownOutput(OutPoint),

    /// Transaction could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] bincode::Error),
}

impl LedgerError {
    /// Whether repeating a read-only call might succeed.
    ///
    /// A `Timeout` says nothing about whether a state-changing call was
    /// applied; only [`LedgerError::Network`] is safe to repeat for those.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::Network(_) | LedgerError::Timeout)
    }
}

/// A funding transaction accepted by the ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingTransaction {
    /// Funding transaction id.
    pub txid: TxId,
    /// The funding transaction.
    pub transaction: Transaction,
    /// The output locked by the requested predicate.
    pub funded: FundedOutput,
    /// When the ledger accepted it.
    pub broadcast_at: DateTime<Utc>,
}

/// Where a transaction stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfirmationStatus {
    /// Accepted, not yet in a block.
    Pending,
    /// Included in the block at `height`.
    Confirmed {
        /// Block height.
        height: u64,
    },
    /// Never seen.
    Unknown,
}

/// Operations a ledger offers to predicate owners.
///
/// Futures are awaited in place, so no `Send` bound is imposed.
#[allow(async_fn_in_trait)]
pub trait LedgerClient {
    /// Create an output of `value` locked by `locking`, paid from the wallet.
    async fn fund_output(
        &self,
        locking: &LockingProgram,
        value: Amount,
    ) -> Result<PendingTransaction, LedgerError>;

    /// Transaction spending `output` to `destination`, without a witness.
    async fn build_spending_transaction(
        &self,
        output: &FundedOutput,
        destination: &PubKeyHash,
    ) -> Result<UnsignedTransaction, LedgerError>;

    /// Submit a complete transaction.
    async fn broadcast(&self, transaction: &Transaction) -> Result<TxId, LedgerError>;

    /// Current status of `txid`.
    async fn confirmation(&self, txid: &TxId) -> Result<ConfirmationStatus, LedgerError>;

    /// Sign the pending input with `key`.
    fn sign(
        &self,
        transaction: &UnsignedTransaction,
        key: &KeyPair,
    ) -> Result<TxSignature, KeyError> {
        key.sign_hash(&transaction.signing_hash())
    }

    /// Run the pair through a default machine without touching the ledger.
    fn verify_locally(
        &self,
        locking: &LockingProgram,
        unlocking: &UnlockingProgram,
        context: &TransactionContext,
    ) -> bool {
        StackMachine::new().execute(locking, unlocking, context)
    }
}
