use serde::{Deserialize, Serialize};

/// A coin-holding account, keyed in the ledger by its lower-cased name.
///
/// `balance` is non-negative by convention only; the ledger never debits it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    #[serde(rename = "coin", alias = "Coin")]
    pub balance: i64,
}

impl User {
    pub fn new(name: impl Into<String>, balance: i64) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }

    /// Add `amount` to the balance, returning the new balance.
    ///
    /// Returns `None` (leaving the balance untouched) on overflow.
    pub fn credit(&mut self, amount: i64) -> Option<i64> {
        let next = self.balance.checked_add(amount)?;
        self.balance = next;
        Some(next)
    }
}
