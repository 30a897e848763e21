//! Commit-reveal game.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    ODDS AND EVENS                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  commitment.rs - Secrets and their HASH160 commitments      │
//! │  player.rs     - Parties, choices, per-game key material    │
//! │  odds_evens.rs - Winner rule and winner-only predicate      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod commitment;
pub mod odds_evens;
pub mod player;

// Re-export key types
pub use commitment::{Commitment, CommitmentError, Secret, SECRET_BASE_LEN};
pub use odds_evens::{determine_winner, winner_predicate, OddsAndEvens};
pub use player::{Announcement, Choice, Party, Player};
