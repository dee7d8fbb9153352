//! Per-user point ledger and ranked leaderboard
//!
//! The ledger is the single authoritative spendable balance per user.
//! Balances are unsigned: a debit larger than the balance is refused whole,
//! so no sequence of operations can drive a balance negative. All mutation
//! happens on the simulation timeline (requests are queued and drained at
//! tick start), so `&mut self` here is already serialized with the tick.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A refused ledger operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Debit rejected; the balance is untouched.
    #[error("insufficient funds: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Account {
    balance: u64,
    /// Creation order, used as the stable leaderboard tie-break.
    first_seen: u64,
}

/// One leaderboard row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user: String,
    pub balance: u64,
}

/// The authoritative per-user balances.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    accounts: HashMap<String, Account>,
    next_seen: u64,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points to a user, creating the account on first credit.
    pub fn credit(&mut self, user: &str, amount: u64) {
        let account = self.account_mut(user);
        account.balance = account.balance.saturating_add(amount);
    }

    /// Remove points from a user. Refused whole (`InsufficientFunds`) when
    /// the balance cannot cover it; the ledger is unchanged on failure.
    pub fn debit(&mut self, user: &str, amount: u64) -> Result<(), LedgerError> {
        let available = self.balance(user);
        if available < amount {
            return Err(LedgerError::InsufficientFunds {
                needed: amount,
                available,
            });
        }
        if amount > 0 {
            let account = self.account_mut(user);
            account.balance -= amount;
        }
        Ok(())
    }

    /// Current balance; zero for unknown users.
    pub fn balance(&self, user: &str) -> u64 {
        self.accounts.get(user).map_or(0, |a| a.balance)
    }

    /// Top `n` users by balance, descending. Ties break by who scored
    /// first, then by user id, so repeated calls over the same state return
    /// the same order.
    pub fn top(&self, n: usize) -> Vec<LeaderboardEntry> {
        let mut rows: Vec<(&String, &Account)> = self.accounts.iter().collect();
        rows.sort_by(|(user_a, a), (user_b, b)| {
            b.balance
                .cmp(&a.balance)
                .then(a.first_seen.cmp(&b.first_seen))
                .then(user_a.cmp(user_b))
        });
        rows.truncate(n);
        rows.into_iter()
            .map(|(user, account)| LeaderboardEntry {
                user: user.clone(),
                balance: account.balance,
            })
            .collect()
    }

    /// Clear every balance (manual full-reset control).
    pub fn reset(&mut self) {
        self.accounts.clear();
        self.next_seen = 0;
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    fn account_mut(&mut self, user: &str) -> &mut Account {
        let next_seen = &mut self.next_seen;
        self.accounts.entry(user.to_owned()).or_insert_with(|| {
            let account = Account {
                balance: 0,
                first_seen: *next_seen,
            };
            *next_seen += 1;
            account
        })
    }
}
