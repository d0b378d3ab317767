use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;

/// Lifecycle of an insurance contract.
///
/// Ordering follows the lifecycle: `Pending < Active < Solved`. A contract
/// only ever moves forward, and `Solved` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractState {
    /// Issued but not yet in force.
    Pending,
    /// In force; settles when the farm's weather condition is met.
    Active,
    /// Paid out. Terminal.
    Solved,
}

impl ContractState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Solved => "solved",
        }
    }

    /// Returns `true` if `next` is the single forward step from `self`.
    pub fn can_transition_to(&self, next: ContractState) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Active) | (Self::Active, Self::Solved)
        )
    }
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractState {
    type Err = TypeError;

    /// Parses the lower-case wire form. Callers normalize case first.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "solved" => Ok(Self::Solved),
            other => Err(TypeError::UnknownState(other.to_string())),
        }
    }
}

/// A parametric insurance contract.
///
/// When the insured farm's weather condition is met while the contract is
/// `Active`, the beneficiary is credited `coverage_number * rate` coins and
/// the contract becomes `Solved`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceContract {
    /// Name of the insured farm.
    #[serde(rename = "insurant")]
    pub insurant_farm: String,
    /// Name of the user credited on payout.
    #[serde(rename = "beneficiaries")]
    pub beneficiary_user: String,
    /// Issue time, milliseconds since UNIX epoch.
    #[serde(rename = "timestamp")]
    pub issued_at_millis: i64,
    /// Number of insured units.
    #[serde(rename = "number")]
    pub coverage_number: i64,
    /// Coins paid per insured unit.
    pub rate: i64,
    pub state: ContractState,
}

impl InsuranceContract {
    /// Payout owed on settlement, or `None` on overflow.
    pub fn benefit(&self) -> Option<i64> {
        self.coverage_number.checked_mul(self.rate)
    }

    /// Returns `true` if this contract is in force for `farm`.
    pub fn is_active_for(&self, farm: &str) -> bool {
        self.state == ContractState::Active && self.insurant_farm == farm
    }

    /// Advance the state one step forward.
    pub fn advance(&mut self, next: ContractState) -> Result<(), TypeError> {
        if !self.state.can_transition_to(next) {
            return Err(TypeError::IllegalTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }
}

/// Every insurance contract ever issued, in issue order.
///
/// Stored as one record under a reserved key. Contracts are appended and
/// never removed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceBook {
    #[serde(rename = "all_insurance", default, deserialize_with = "null_as_empty")]
    pub contracts: Vec<InsuranceContract>,
}

// Older books were written with `"all_insurance": null` for an empty list.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<InsuranceContract>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<InsuranceContract>>::deserialize(deserializer)?.unwrap_or_default())
}

impl InsuranceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, contract: InsuranceContract) {
        self.contracts.push(contract);
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}
