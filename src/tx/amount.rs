//! Ledger amounts in the smallest unit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Smallest units per whole coin.
pub const UNITS_PER_COIN: u64 = 100_000_000;

/// One hundredth of a coin.
pub const CENT: Amount = Amount(UNITS_PER_COIN / 100);

/// Value carried by an output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(pub u64);

impl Amount {
    /// Zero value.
    pub const ZERO: Amount = Amount(0);

    /// Amount from smallest units.
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Raw unit count.
    pub const fn units(self) -> u64 {
        self.0
    }

    /// Sum, or `None` on overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Difference, or `None` if it would go negative.
    pub fn checked_sub(self, other: Amount) -> Option<Amount> {
        self.0.checked_sub(other.0).map(Amount)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:08}",
            self.0 / UNITS_PER_COIN,
            self.0 % UNITS_PER_COIN
        )
    }
}
