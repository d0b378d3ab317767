use serde::Serialize;

use pwi_ledger::Ledger;
use pwi_store::StateStore;

use crate::command::{Command, Function};
use crate::error::{ChaincodeError, ChaincodeResult};

/// Entry points of the ledger.
///
/// Responses are raw bytes: `read` returns the stored value verbatim,
/// `init` and `write` return nothing, and every other function returns JSON.
pub struct Chaincode<S: StateStore> {
    ledger: Ledger<S>,
}

impl<S: StateStore> Chaincode<S> {
    pub fn new(ledger: Ledger<S>) -> Self {
        Self { ledger }
    }

    /// Run a state-changing function (`init`, `write`, `create_*`,
    /// `update_weather`).
    pub fn invoke(&self, function: &str, args: &[String]) -> ChaincodeResult<Vec<u8>> {
        tracing::debug!(function, args = args.len(), "invoke is running");
        let function = resolve(function, "invocation", |f| !f.is_query())?;
        self.execute(Command::parse(function, args)?)
    }

    /// Run a read-only function (`read`, `list_*`, `get_*`).
    pub fn query(&self, function: &str, args: &[String]) -> ChaincodeResult<Vec<u8>> {
        tracing::debug!(function, args = args.len(), "query is running");
        let function = resolve(function, "query", Function::is_query)?;
        self.execute(Command::parse(function, args)?)
    }

    /// Run an already validated command, regardless of entry point.
    pub fn execute(&self, command: Command) -> ChaincodeResult<Vec<u8>> {
        tracing::debug!(function = %command.function(), "executing");
        let ledger = &self.ledger;
        match command {
            Command::Init { seed } => {
                ledger.init(&seed)?;
                Ok(Vec::new())
            }
            Command::Read { key } => Ok(ledger.read(&key)?),
            Command::Write { key, value } => {
                ledger.write(&key, value.as_bytes())?;
                Ok(Vec::new())
            }
            Command::CreateUser { name, coin } => json(&ledger.create_user(&name, &coin)?),
            Command::CreateFarm {
                name,
                address,
                owner,
                weather,
            } => json(&ledger.create_farm(&name, &address, &owner, &weather)?),
            Command::CreateInsurance {
                farm,
                beneficiary,
                coverage_number,
                rate,
                state,
            } => json(&ledger.create_insurance(&farm, &beneficiary, &coverage_number, &rate, &state)?),
            Command::UpdateWeather {
                farm,
                label,
                temperature,
            } => json(&ledger.update_weather(&farm, &label, &temperature)?),
            Command::ListFarms => json(&ledger.farms()?),
            Command::ListUsers => json(&ledger.users()?),
            Command::ListInsurance => json(&ledger.insurance_book()?),
            Command::GetFarm { name } => json(&ledger.farm(&name)?),
            Command::GetUser { name } => json(&ledger.user(&name)?),
        }
    }
}

fn resolve(
    name: &str,
    entry_point: &'static str,
    allowed: impl Fn(&Function) -> bool,
) -> ChaincodeResult<Function> {
    match name.parse::<Function>() {
        Ok(f) if allowed(&f) => Ok(f),
        _ => {
            tracing::warn!(function = name, entry_point, "did not find func");
            Err(ChaincodeError::UnknownFunction {
                entry_point,
                function: name.to_string(),
            })
        }
    }
}

fn json<T: Serialize>(value: &T) -> ChaincodeResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ChaincodeError::Encoding(e.to_string()))
}
