//! Spend Sessions
//!
//! Drives one authorization scheme through the full flow:
//!
//! ```text
//! fund ──► build spend ──► unlock ──► verify locally ──► broadcast ──► confirm
//!                                          │
//!                                          └─ fails: stop, nothing sent
//! ```
//!
//! Each ledger call is bounded by `confirmation_timeout`. Network errors
//! are retried up to `max_retries` times with a linearly growing backoff.
//! A timeout is retried only for read-only calls; a funding or broadcast
//! may already have been applied when it times out, so its timeout goes
//! straight back to the caller. Every other error is returned as is.

use std::future::Future;

use tokio::time::{sleep, timeout};
use tracing::{info, instrument, warn};

use super::client::{ConfirmationStatus, LedgerClient, LedgerError, PendingTransaction};
use super::config::LedgerConfig;
use crate::core::keys::PubKeyHash;
use crate::error::Result;
use crate::scheme::AuthorizationScheme;
use crate::script::StackMachine;
use crate::tx::{Amount, FundedOutput, TxId};

/// Which failures a call may be repeated after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retry {
    /// Read-only call: network errors and timeouts.
    ReadOnly,
    /// Call that moves value: network errors only.
    Mutating,
}

impl Retry {
    fn allows(self, err: &LedgerError) -> bool {
        match self {
            Retry::ReadOnly => err.is_retryable(),
            Retry::Mutating => matches!(err, LedgerError::Network(_)),
        }
    }
}

/// Result of a completed fund-and-spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendReceipt {
    /// Transaction that created the locked output.
    pub funding: TxId,
    /// Transaction that spent it.
    pub spend: TxId,
    /// Block the spend was confirmed in.
    pub height: u64,
}

/// Runs schemes against a ledger under a retry policy.
pub struct SpendSession<'a, L: LedgerClient> {
    ledger: &'a L,
    config: LedgerConfig,
    machine: StackMachine,
}

impl<'a, L: LedgerClient> SpendSession<'a, L> {
    /// Session over `ledger` with `config`.
    pub fn new(ledger: &'a L, config: LedgerConfig) -> Self {
        Self {
            ledger,
            config,
            machine: StackMachine::new(),
        }
    }

    /// Active policy.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Lock `value` behind the scheme's predicate.
    #[instrument(skip_all, fields(scheme = scheme.name(), value = %value))]
    pub async fn fund(&self, scheme: &AuthorizationScheme, value: Amount) -> Result<PendingTransaction> {
        let locking = scheme.locking_program()?;
        let ledger = self.ledger;
        let locking = &locking;
        let pending = self
            .with_retry("fund", Retry::Mutating, move || {
                ledger.fund_output(locking, value)
            })
            .await?;
        info!(txid = %pending.txid, outpoint = %pending.funded.outpoint, "funded");
        Ok(pending)
    }

    /// Spend `funded` to `destination` using the scheme's witness.
    ///
    /// The witness is checked locally first; if it fails, nothing is
    /// broadcast and the verification failure is returned.
    #[instrument(skip_all, fields(scheme = scheme.name(), outpoint = %funded.outpoint))]
    pub async fn spend(
        &self,
        scheme: &AuthorizationScheme,
        funded: &FundedOutput,
        destination: &PubKeyHash,
    ) -> Result<TxId> {
        let ledger = self.ledger;
        let unsigned = self
            .with_retry("build", Retry::ReadOnly, move || {
                ledger.build_spending_transaction(funded, destination)
            })
            .await?;

        let unlocking = scheme.unlocking_program(&unsigned)?;
        let locking = &unsigned.spent_output().locking;
        if let Err(failure) = self
            .machine
            .evaluate(locking, &unlocking, &unsigned.context())
        {
            warn!(%failure, "witness does not satisfy predicate, not broadcasting");
            return Err(failure.into());
        }

        let transaction = unsigned.with_unlocking(unlocking);
        let transaction = &transaction;
        let txid = self
            .with_retry("broadcast", Retry::Mutating, move || {
                ledger.broadcast(transaction)
            })
            .await?;
        info!(%txid, "spend broadcast");
        Ok(txid)
    }

    /// Poll until `txid` is confirmed, returning its block height.
    ///
    /// `Unknown` is polled like `Pending`; the ledger may not have indexed
    /// the transaction yet.
    pub async fn wait_for_confirmation(&self, txid: &TxId) -> Result<u64> {
        let height = timeout(self.config.confirmation_timeout, self.poll_confirmation(txid))
            .await
            .map_err(|_| LedgerError::Timeout)??;
        Ok(height)
    }

    /// Fund, spend and wait for the spend to confirm.
    pub async fn run(
        &self,
        scheme: &AuthorizationScheme,
        value: Amount,
        destination: &PubKeyHash,
    ) -> Result<SpendReceipt> {
        let pending = self.fund(scheme, value).await?;
        let spend = self.spend(scheme, &pending.funded, destination).await?;
        let height = self.wait_for_confirmation(&spend).await?;
        info!(scheme = scheme.name(), %spend, height, "spend confirmed");
        Ok(SpendReceipt {
            funding: pending.txid,
            spend,
            height,
        })
    }

    async fn poll_confirmation(&self, txid: &TxId) -> std::result::Result<u64, LedgerError> {
        loop {
            match self.ledger.confirmation(txid).await? {
                ConfirmationStatus::Confirmed { height } => return Ok(height),
                ConfirmationStatus::Pending | ConfirmationStatus::Unknown => {
                    sleep(self.config.poll_interval).await;
                }
            }
        }
    }

    async fn with_retry<T, F, Fut>(
        &self,
        operation: &'static str,
        policy: Retry,
        mut call: F,
    ) -> std::result::Result<T, LedgerError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, LedgerError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let outcome = timeout(self.config.confirmation_timeout, call())
                .await
                .unwrap_or(Err(LedgerError::Timeout));
            match outcome {
                Ok(value) => return Ok(value),
                Err(err) if policy.allows(&err) && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(operation, attempt, error = %err, "ledger call failed, retrying");
                    sleep(self.config.retry_backoff * attempt).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
