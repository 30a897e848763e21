//! Transactions and Signing Hashes
//!
//! A transaction spends outpoints and creates outputs. The signing hash of
//! an input commits to every outpoint and output, the index of the input,
//! and the predicate and value of the output it spends. Unlocking programs
//! are left out so a signature can be placed inside one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::hash::{sha256d, DigestWriter, Hash256};
use crate::core::keys::SIGHASH_ALL;
use crate::script::{LockingProgram, TransactionContext, UnlockingProgram};

use super::amount::Amount;

/// Current transaction format.
pub const TX_VERSION: u32 = 1;

/// Transaction identifier: double SHA-256 of the serialized transaction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TxId(pub Hash256);

impl fmt::Debug for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxId({})", hex::encode(self.0))
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Reference to one output of a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    /// Creating transaction.
    pub txid: TxId,
    /// Output index within it.
    pub vout: u32,
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.vout)
    }
}

/// Value locked by a predicate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOut {
    /// Locked value.
    pub value: Amount,
    /// Spending predicate.
    pub locking: LockingProgram,
}

/// Spend of a previous output.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxIn {
    /// Output being spent.
    pub previous_output: OutPoint,
    /// Witness satisfying that output's predicate.
    pub unlocking: UnlockingProgram,
}

/// A ledger transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Format version.
    pub version: u32,
    /// Inputs in order.
    pub inputs: Vec<TxIn>,
    /// Outputs in order.
    pub outputs: Vec<TxOut>,
}

impl Transaction {
    /// Empty transaction at the current version.
    pub fn new() -> Self {
        Self {
            version: TX_VERSION,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Wire encoding.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Identifier of this exact transaction, witnesses included.
    pub fn txid(&self) -> Result<TxId, bincode::Error> {
        Ok(TxId(sha256d(&self.to_bytes()?)))
    }

    /// Signing hash for `input_index`, which spends `spent`.
    pub fn signing_hash(&self, input_index: usize, spent: &TxOut) -> Hash256 {
        let mut h = DigestWriter::for_signing_hash();
        h.update_u32(self.version);

        h.update_u64(self.inputs.len() as u64);
        for input in &self.inputs {
            h.update_bytes(&input.previous_output.txid.0);
            h.update_u32(input.previous_output.vout);
        }

        h.update_u64(self.outputs.len() as u64);
        for output in &self.outputs {
            h.update_u64(output.value.units());
            h.update_var_bytes(&output.locking.to_bytes());
        }

        h.update_u64(input_index as u64);
        h.update_u64(spent.value.units());
        h.update_var_bytes(&spent.locking.to_bytes());
        h.update_u8(SIGHASH_ALL);

        h.finalize_double()
    }

    /// Total output value, or `None` on overflow.
    pub fn output_value(&self) -> Option<Amount> {
        self.outputs
            .iter()
            .try_fold(Amount::ZERO, |acc, out| acc.checked_add(out.value))
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

/// An output the ledger knows about, with its location.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundedOutput {
    /// Where the output lives.
    pub outpoint: OutPoint,
    /// The output itself.
    pub output: TxOut,
}

/// A spending transaction awaiting its unlocking program.
///
/// Bound to one input; signatures made against it are useless for any
/// other transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTransaction {
    transaction: Transaction,
    input_index: usize,
    spent: TxOut,
}

impl UnsignedTransaction {
    /// Wrap a transaction whose `input_index` spends `spent`.
    pub fn new(transaction: Transaction, input_index: usize, spent: TxOut) -> Self {
        Self {
            transaction,
            input_index,
            spent,
        }
    }

    /// The pending transaction.
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// Input being authorized.
    pub fn input_index(&self) -> usize {
        self.input_index
    }

    /// Output being spent by that input.
    pub fn spent_output(&self) -> &TxOut {
        &self.spent
    }

    /// Hash every signature for this input must cover.
    pub fn signing_hash(&self) -> Hash256 {
        self.transaction.signing_hash(self.input_index, &self.spent)
    }

    /// Verification context for the stack machine.
    pub fn context(&self) -> TransactionContext {
        TransactionContext::new(self.signing_hash())
    }

    /// Install the witness and produce the broadcastable transaction.
    pub fn with_unlocking(&self, unlocking: UnlockingProgram) -> Transaction {
        let mut tx = self.transaction.clone();
        if let Some(input) = tx.inputs.get_mut(self.input_index) {
            input.unlocking = unlocking;
        }
        tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::{Opcode, ProgramBuilder};

    fn sample_output(value: u64) -> TxOut {
        TxOut {
            value: Amount(value),
            locking: ProgramBuilder::new()
                .op(Opcode::Dup)
                .build_locking()
                .unwrap(),
        }
    }

    fn sample_tx() -> Transaction {
        let mut tx = Transaction::new();
        tx.inputs.push(TxIn {
            previous_output: OutPoint {
                txid: TxId([1; 32]),
                vout: 0,
            },
            unlocking: UnlockingProgram::default(),
        });
        tx.outputs.push(sample_output(900));
        tx
    }

    #[test]
    fn test_signing_hash_ignores_unlocking() {
        let tx = sample_tx();
        let spent = sample_output(1000);
        let unsigned = UnsignedTransaction::new(tx, 0, spent.clone());

        let witness = ProgramBuilder::new().number(5).build_unlocking().unwrap();
        let signed = unsigned.with_unlocking(witness.clone());

        assert_eq!(signed.inputs[0].unlocking, witness);
        assert_eq!(signed.signing_hash(0, &spent), unsigned.signing_hash());
        assert_ne!(signed.txid().unwrap(), unsigned.transaction().txid().unwrap());
    }

    #[test]
    fn test_signing_hash_commits_to_outputs_and_spent_value() {
        let tx = sample_tx();
        let base = tx.signing_hash(0, &sample_output(1000));

        let mut changed = tx.clone();
        changed.outputs[0].value = Amount(901);
        assert_ne!(changed.signing_hash(0, &sample_output(1000)), base);

        assert_ne!(tx.signing_hash(0, &sample_output(1001)), base);
        assert_ne!(tx.signing_hash(1, &sample_output(1000)), base);
    }

    #[test]
    fn test_txid_is_deterministic() {
        assert_eq!(sample_tx().txid().unwrap(), sample_tx().txid().unwrap());
    }

    #[test]
    fn test_output_value() {
        let mut tx = sample_tx();
        tx.outputs.push(sample_output(100));
        assert_eq!(tx.output_value(), Some(Amount(1000)));
    }
}
