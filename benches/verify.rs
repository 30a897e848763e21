//! Criterion benchmarks for predicate evaluation.
//!
//! Measures one full witness-then-predicate run per scheme. The signature
//! schemes are dominated by ECDSA verification; the puzzle shows the bare
//! interpreter cost.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use predicates::{
    tx::{OutPoint, TxIn, TxOut, CENT},
    Amount, AuthorizationScheme, Choice, LinearPuzzle, LockingProgram, OddsAndEvens,
    PayToKeyHash, PayToPubKey, StackMachine, Transaction, TxId, UnlockingProgram,
    UnsignedTransaction,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn spend_of(locking: &LockingProgram) -> UnsignedTransaction {
    let mut tx = Transaction::new();
    tx.inputs.push(TxIn {
        previous_output: OutPoint {
            txid: TxId([0x42; 32]),
            vout: 0,
        },
        unlocking: UnlockingProgram::default(),
    });
    tx.outputs.push(TxOut {
        value: Amount(CENT.units() - 1_000),
        locking: LockingProgram::default(),
    });
    let spent = TxOut {
        value: CENT,
        locking: locking.clone(),
    };
    UnsignedTransaction::new(tx, 0, spent)
}

fn bench_schemes(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(7);
    let schemes: Vec<AuthorizationScheme> = vec![
        PayToPubKey::generate(&mut rng).into(),
        PayToKeyHash::generate(&mut rng).into(),
        LinearPuzzle::new(36, 1442).expect("solvable").into(),
        OddsAndEvens::with_rng(Choice::One, Choice::Zero, &mut rng).into(),
    ];

    let machine = StackMachine::new();
    let mut group = c.benchmark_group("verify");
    for scheme in &schemes {
        let locking = scheme.locking_program().expect("locking program");
        let tx = spend_of(&locking);
        let unlocking = scheme.unlocking_program(&tx).expect("unlocking program");
        let context = tx.context();

        group.bench_with_input(BenchmarkId::from_parameter(scheme.name()), &(), |b, _| {
            b.iter(|| {
                black_box(machine.execute(
                    black_box(&locking),
                    black_box(&unlocking),
                    black_box(&context),
                ))
            })
        });
    }
    group.finish();
}

fn bench_signing_hash(c: &mut Criterion) {
    let scheme = PayToKeyHash::generate(&mut StdRng::seed_from_u64(8));
    let locking = scheme.locking_program().expect("locking program");
    let tx = spend_of(&locking);

    c.bench_function("signing_hash", |b| b.iter(|| black_box(tx.signing_hash())));
}

criterion_group!(benches, bench_schemes, bench_signing_hash);
criterion_main!(benches);
