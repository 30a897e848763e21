//! Shared fixtures for unit tests.

use crate::script::{LockingProgram, UnlockingProgram};
use crate::tx::{Amount, OutPoint, Transaction, TxId, TxIn, TxOut, UnsignedTransaction, CENT};

/// Spending transaction for a single output locked by `locking`.
///
/// Pays the whole value less a nominal fee back to an empty predicate;
/// only the signing hash matters to the schemes under test.
pub fn spend_of(locking: &LockingProgram) -> UnsignedTransaction {
    let spent = TxOut {
        value: CENT,
        locking: locking.clone(),
    };
    let mut tx = Transaction::new();
    tx.inputs.push(TxIn {
        previous_output: OutPoint {
            txid: TxId([0x5a; 32]),
            vout: 0,
        },
        unlocking: UnlockingProgram::default(),
    });
    tx.outputs.push(TxOut {
        value: Amount(CENT.units() - 1_000),
        locking: LockingProgram::default(),
    });
    UnsignedTransaction::new(tx, 0, spent)
}
