//! In-process ledger for demos and tests.
//!
//! Keeps a wallet balance, a UTXO map and a block height behind one
//! `RwLock`. Every broadcast is checked input by input with the stack
//! machine while the write lock is held, so two spends of the same output
//! cannot both land.

use std::collections::{BTreeMap, BTreeSet};

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use super::client::{ConfirmationStatus, LedgerClient, LedgerError, PendingTransaction};
use crate::core::hash::DigestWriter;
use crate::core::keys::PubKeyHash;
use crate::scheme::pay_to_key_hash::locking_for;
use crate::script::{LockingProgram, StackMachine, TransactionContext, UnlockingProgram};
use crate::tx::{
    Amount, FundedOutput, OutPoint, Transaction, TxId, TxIn, TxOut, UnsignedTransaction,
};

/// Flat fee charged per transaction unless configured otherwise.
pub const DEFAULT_FEE: Amount = Amount(1_000);

#[derive(Debug, Default)]
struct LedgerState {
    balance: Amount,
    utxos: BTreeMap<OutPoint, TxOut>,
    /// `None` while pending, block height once mined.
    transactions: BTreeMap<TxId, Option<u64>>,
    height: u64,
    funding_nonce: u64,
    failures_left: u32,
}

impl LedgerState {
    fn mine(&mut self) -> u64 {
        self.height += 1;
        let height = self.height;
        for slot in self.transactions.values_mut().filter(|s| s.is_none()) {
            *slot = Some(height);
        }
        height
    }
}

/// Ledger held entirely in memory.
#[derive(Debug)]
pub struct InMemoryLedger {
    state: RwLock<LedgerState>,
    fee: Amount,
    auto_mine: bool,
    machine: StackMachine,
}

impl InMemoryLedger {
    /// Ledger whose wallet starts with `balance`; mines a block per transaction.
    pub fn new(balance: Amount) -> Self {
        Self {
            state: RwLock::new(LedgerState {
                balance,
                ..LedgerState::default()
            }),
            fee: DEFAULT_FEE,
            auto_mine: true,
            machine: StackMachine::new(),
        }
    }

    /// Charge `fee` per transaction.
    pub fn with_fee(mut self, fee: Amount) -> Self {
        self.fee = fee;
        self
    }

    /// Leave transactions pending until [`mine_block`](Self::mine_block).
    pub fn with_auto_mine(mut self, auto_mine: bool) -> Self {
        self.auto_mine = auto_mine;
        self
    }

    /// Flat fee per transaction.
    pub fn fee(&self) -> Amount {
        self.fee
    }

    /// Remaining wallet balance.
    pub async fn balance(&self) -> Amount {
        self.state.read().await.balance
    }

    /// Current block height.
    pub async fn height(&self) -> u64 {
        self.state.read().await.height
    }

    /// Unspent output at `outpoint`, if any.
    pub async fn utxo(&self, outpoint: &OutPoint) -> Option<TxOut> {
        self.state.read().await.utxos.get(outpoint).cloned()
    }

    /// Fail the next `count` broadcasts with a network error.
    pub async fn fail_next_broadcasts(&self, count: u32) {
        self.state.write().await.failures_left = count;
    }

    /// Confirm everything pending in a new block.
    pub async fn mine_block(&self) -> u64 {
        let height = self.state.write().await.mine();
        debug!(height, "block mined");
        height
    }

    /// Funding transactions spend a synthetic wallet input, numbered so each
    /// one has a distinct id.
    fn wallet_input(nonce: u64) -> TxIn {
        let mut h = DigestWriter::new(b"PREDICATES_WALLET_V1");
        h.update_u64(nonce);
        TxIn {
            previous_output: OutPoint {
                txid: TxId(h.finalize_double()),
                vout: 0,
            },
            unlocking: UnlockingProgram::default(),
        }
    }

    fn check_inputs(
        &self,
        state: &LedgerState,
        tx: &Transaction,
    ) -> Result<Amount, LedgerError> {
        if tx.inputs.is_empty() {
            return Err(LedgerError::Rejected("transaction has no inputs".into()));
        }

        let mut seen = BTreeSet::new();
        let mut total = Amount::ZERO;
        for (index, input) in tx.inputs.iter().enumerate() {
            let outpoint = input.previous_output;
            if !seen.insert(outpoint) {
                return Err(LedgerError::Rejected(format!(
                    "input {index} spends {outpoint} twice"
                )));
            }
            let spent = state.utxos.get(&outpoint).ok_or_else(|| {
                LedgerError::Rejected(format!("input {index} spends unknown or spent output {outpoint}"))
            })?;

            let context = TransactionContext::new(tx.signing_hash(index, spent));
            if let Err(failure) = self.machine.evaluate(&spent.locking, &input.unlocking, &context) {
                warn!(input = index, %outpoint, %failure, "predicate not satisfied");
                return Err(LedgerError::Rejected(format!("input {index}: {failure}")));
            }

            total = total
                .checked_add(spent.value)
                .ok_or_else(|| LedgerError::Rejected("input value overflow".into()))?;
        }
        Ok(total)
    }
}

impl LedgerClient for InMemoryLedger {
    #[instrument(skip_all, fields(value = %value))]
    async fn fund_output(
        &self,
        locking: &LockingProgram,
        value: Amount,
    ) -> Result<PendingTransaction, LedgerError> {
        let mut state = self.state.write().await;
        let available = state.balance;
        let needed = value
            .checked_add(self.fee)
            .ok_or(LedgerError::InsufficientFunds {
                needed: Amount(u64::MAX),
                available,
            })?;
        let remaining = available
            .checked_sub(needed)
            .ok_or(LedgerError::InsufficientFunds { needed, available })?;

        let nonce = state.funding_nonce;
        let mut transaction = Transaction::new();
        transaction.inputs.push(Self::wallet_input(nonce));
        transaction.outputs.push(TxOut {
            value,
            locking: locking.clone(),
        });
        let txid = transaction.txid()?;

        let funded = FundedOutput {
            outpoint: OutPoint { txid, vout: 0 },
            output: transaction.outputs[0].clone(),
        };

        state.funding_nonce += 1;
        state.balance = remaining;
        state.utxos.insert(funded.outpoint, funded.output.clone());
        state.transactions.insert(txid, None);
        if self.auto_mine {
            state.mine();
        }

        info!(%txid, balance = %remaining, "output funded");
        Ok(PendingTransaction {
            txid,
            transaction,
            funded,
            broadcast_at: Utc::now(),
        })
    }

    async fn build_spending_transaction(
        &self,
        output: &FundedOutput,
        destination: &PubKeyHash,
    ) -> Result<UnsignedTransaction, LedgerError> {
        let spent = self
            .state
            .read()
            .await
            .utxos
            .get(&output.outpoint)
            .cloned()
            .ok_or(LedgerError::UnknownOutput(output.outpoint))?;

        let value = spent
            .value
            .checked_sub(self.fee)
            .ok_or(LedgerError::InsufficientFunds {
                needed: self.fee,
                available: spent.value,
            })?;
        let locking = locking_for(destination).map_err(|e| LedgerError::Rejected(e.to_string()))?;

        let mut transaction = Transaction::new();
        transaction.inputs.push(TxIn {
            previous_output: output.outpoint,
            unlocking: UnlockingProgram::default(),
        });
        transaction.outputs.push(TxOut { value, locking });

        Ok(UnsignedTransaction::new(transaction, 0, spent))
    }

    #[instrument(skip_all, fields(inputs = transaction.inputs.len()))]
    async fn broadcast(&self, transaction: &Transaction) -> Result<TxId, LedgerError> {
        let mut state = self.state.write().await;
        if state.failures_left > 0 {
            state.failures_left -= 1;
            warn!(remaining = state.failures_left, "injected network failure");
            return Err(LedgerError::Network("connection reset by peer".into()));
        }

        let input_total = self.check_inputs(&state, transaction)?;
        let output_total = transaction
            .output_value()
            .ok_or_else(|| LedgerError::Rejected("output value overflow".into()))?;
        if output_total > input_total {
            return Err(LedgerError::Rejected(format!(
                "outputs {output_total} exceed inputs {input_total}"
            )));
        }

        let txid = transaction.txid()?;
        for input in &transaction.inputs {
            state.utxos.remove(&input.previous_output);
        }
        for (vout, output) in (0u32..).zip(&transaction.outputs) {
            state.utxos.insert(OutPoint { txid, vout }, output.clone());
        }
        state.transactions.insert(txid, None);
        if self.auto_mine {
            state.mine();
        }

        info!(%txid, "transaction accepted");
        Ok(txid)
    }

    async fn confirmation(&self, txid: &TxId) -> Result<ConfirmationStatus, LedgerError> {
        let status = match self.state.read().await.transactions.get(txid) {
            None => ConfirmationStatus::Unknown,
            Some(None) => ConfirmationStatus::Pending,
            Some(Some(height)) => ConfirmationStatus::Confirmed { height: *height },
        };
        Ok(status)
    }
}
