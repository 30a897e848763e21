//! Predicates Demo
//!
//! Funds and spends one output per authorization scheme against the
//! in-memory ledger, then plays every odds-and-evens combination and shows
//! that only the winner's claim gets through.

use anyhow::{bail, Context};
use rand::rngs::OsRng;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use predicates::{
    ledger::DEFAULT_FEE,
    tx::CENT,
    AuthorizationScheme, Choice, Error, InMemoryLedger, KeyPair, LedgerConfig, LinearPuzzle,
    OddsAndEvens, PayToKeyHash, PayToPubKey, SpendSession, VERSION,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Odds-evens predicates v{}", VERSION);

    let config = LedgerConfig::from_env();
    let ledger = InMemoryLedger::new(predicates::Amount(CENT.units() * 100));
    let session = SpendSession::new(&ledger, config);
    let destination = KeyPair::generate(&mut OsRng).key_hash();

    info!("Wallet balance {}, fee {} per transaction", ledger.balance().await, DEFAULT_FEE);

    info!("=== Authorization Schemes ===");
    let schemes: Vec<AuthorizationScheme> = vec![
        PayToPubKey::generate(&mut OsRng).into(),
        PayToKeyHash::generate(&mut OsRng).into(),
        LinearPuzzle::new(36, 1442)?.into(),
    ];
    for scheme in &schemes {
        let receipt = session
            .run(scheme, CENT, &destination)
            .await
            .with_context(|| format!("{} spend failed", scheme.name()))?;
        info!(
            "{}: funded {}, spent {} at height {}",
            scheme.name(),
            receipt.funding,
            receipt.spend,
            receipt.height
        );
    }

    info!("=== Odds and Evens ===");
    let combos = [
        (Choice::Zero, Choice::Zero),
        (Choice::One, Choice::One),
        (Choice::Zero, Choice::One),
        (Choice::One, Choice::Zero),
    ];
    for (even, odd) in combos {
        let game = OddsAndEvens::new(even, odd);
        let winner = game.winner();
        let loser = winner.opponent();
        info!(
            "Even chose {}, Odd chose {}: {:?} wins",
            even.value(),
            odd.value(),
            winner
        );
        let (even_announced, odd_announced) = game.announcements();
        info!(
            "Announced commitments: even {}, odd {}",
            even_announced.commitment, odd_announced.commitment
        );

        // The loser tries first and must be refused before anything is sent.
        let scheme = AuthorizationScheme::from(game.claimed_by(loser));
        let pending = session.fund(&scheme, CENT).await?;
        match session.spend(&scheme, &pending.funded, &destination).await {
            Err(Error::Verification(failure)) => {
                info!("{:?} claim refused locally: {}", loser, failure)
            }
            Ok(txid) => bail!("{:?} claimed a game it lost in {}", loser, txid),
            Err(other) => return Err(other.into()),
        }

        // Same game, same output: now the winner signs.
        let AuthorizationScheme::CommitRevealGame(game) = scheme else {
            bail!("scheme is not a game");
        };
        let scheme = AuthorizationScheme::from(game.claimed_by(winner));
        let spend = session
            .spend(&scheme, &pending.funded, &destination)
            .await
            .context("winner's claim failed")?;
        let height = session.wait_for_confirmation(&spend).await?;
        info!("{:?} claimed in {} at height {}", winner, spend, height);
    }

    info!(
        "Final height {}, wallet balance {}",
        ledger.height().await,
        ledger.balance().await
    );
    Ok(())
}
