use serde::{Deserialize, Serialize};

use pwi_store::StateStore;
use pwi_types::ContractState;

use crate::error::{LedgerError, LedgerResult};
use crate::keys::primary_key;
use crate::repository::EntityRepository;

/// One beneficiary credit made by a settlement.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub farm: String,
    pub beneficiary: String,
    pub benefit: i64,
    pub new_balance: i64,
}

/// Moves a farm's active contracts to `solved` and pays their beneficiaries.
pub struct SettlementEngine<'a, S: StateStore + ?Sized> {
    repo: EntityRepository<'a, S>,
}

impl<'a, S: StateStore + ?Sized> SettlementEngine<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            repo: EntityRepository::new(store),
        }
    }

    /// Settle every `active` contract insuring `farm`.
    ///
    /// Each beneficiary is credited `coverage_number * rate` and saved before
    /// the next contract is processed, so several contracts for one user
    /// accumulate. The book is written once, after all matches, and only if
    /// something settled. Contracts already `solved`, still `pending`, or for
    /// other farms are untouched, so settling twice never pays twice.
    pub fn settle(&self, farm: &str) -> LedgerResult<Vec<Payout>> {
        let mut book = self.repo.load_book()?;
        let mut payouts = Vec::new();

        for contract in book.contracts.iter_mut().filter(|c| c.is_active_for(farm)) {
            let benefit = contract.benefit().ok_or_else(|| {
                LedgerError::validation(format!(
                    "benefit {} * {} overflows",
                    contract.coverage_number, contract.rate
                ))
            })?;
            contract
                .advance(ContractState::Solved)
                .map_err(|e| LedgerError::validation(e.to_string()))?;

            let key = primary_key(&contract.beneficiary_user);
            let mut user = self.repo.user(&key)?;
            let new_balance = user.credit(benefit).ok_or_else(|| {
                LedgerError::validation(format!("balance of {key} overflows"))
            })?;
            self.repo.save_user(&key, &user)?;

            tracing::info!(
                farm,
                beneficiary = %key,
                benefit,
                new_balance,
                "contract settled"
            );
            payouts.push(Payout {
                farm: farm.to_string(),
                beneficiary: key,
                benefit,
                new_balance,
            });
        }

        if !payouts.is_empty() {
            self.repo.save_book(&book)?;
        }
        Ok(payouts)
    }
}
