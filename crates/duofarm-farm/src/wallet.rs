//! The duo's shared points balance.
//!
//! Points are earned by activity and spent in the farm shop. All arithmetic
//! is checked; a debit that cannot be covered fails without touching the
//! balance.

use serde::{Deserialize, Serialize};

use crate::error::FarmError;

/// A non-negative points balance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsWallet {
    balance: u64,
}

impl PointsWallet {
    /// Create a wallet holding `balance` points.
    pub const fn new(balance: u64) -> Self {
        Self { balance }
    }

    /// Current balance.
    pub const fn balance(&self) -> u64 {
        self.balance
    }

    /// Whether the wallet can cover `amount`.
    pub const fn can_afford(&self, amount: u64) -> bool {
        self.balance >= amount
    }

    /// Add points, returning the new balance.
    pub fn credit(&mut self, amount: u64) -> Result<u64, FarmError> {
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or_else(|| FarmError::ArithmeticOverflow {
                context: String::from("points credit overflow"),
            })?;
        Ok(self.balance)
    }

    /// Remove points, returning the new balance.
    pub fn debit(&mut self, amount: u64) -> Result<u64, FarmError> {
        self.balance = self
            .balance
            .checked_sub(amount)
            .ok_or(FarmError::InsufficientPoints {
                required: amount,
                available: self.balance,
            })?;
        Ok(self.balance)
    }
}
