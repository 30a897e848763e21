//! Ledger Boundary
//!
//! Everything that talks to a ledger is async and lives here; scripts and
//! schemes stay synchronous.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     LEDGER BOUNDARY                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  client.rs  - LedgerClient trait, LedgerError, statuses     │
//! │  config.rs  - Timeout / retry policy (env, JSON)            │
//! │  memory.rs  - In-memory ledger with failure injection       │
//! │  session.rs - fund → unlock → verify → broadcast → confirm  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod config;
pub mod memory;
pub mod session;

pub use client::{ConfirmationStatus, LedgerClient, LedgerError, PendingTransaction};
pub use config::LedgerConfig;
pub use memory::{InMemoryLedger, DEFAULT_FEE};
pub use session::{SpendReceipt, SpendSession};
