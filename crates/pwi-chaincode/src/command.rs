use std::fmt;
use std::str::FromStr;

use crate::error::{ChaincodeError, ChaincodeResult};

/// Every function name the chaincode answers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    Init,
    Read,
    Write,
    CreateUser,
    CreateFarm,
    CreateInsurance,
    UpdateWeather,
    ListFarms,
    ListUsers,
    ListInsurance,
    GetFarm,
    GetUser,
}

impl Function {
    pub const ALL: [Function; 12] = [
        Self::Init,
        Self::Read,
        Self::Write,
        Self::CreateUser,
        Self::CreateFarm,
        Self::CreateInsurance,
        Self::UpdateWeather,
        Self::ListFarms,
        Self::ListUsers,
        Self::ListInsurance,
        Self::GetFarm,
        Self::GetUser,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Read => "read",
            Self::Write => "write",
            Self::CreateUser => "create_user",
            Self::CreateFarm => "create_farm",
            Self::CreateInsurance => "create_insurance",
            Self::UpdateWeather => "update_weather",
            Self::ListFarms => "list_farms",
            Self::ListUsers => "list_users",
            Self::ListInsurance => "list_insurance",
            Self::GetFarm => "get_farm",
            Self::GetUser => "get_user",
        }
    }

    /// Returns `true` for read-only functions served by the query entry point.
    pub fn is_query(&self) -> bool {
        matches!(
            self,
            Self::Read
                | Self::ListFarms
                | Self::ListUsers
                | Self::ListInsurance
                | Self::GetFarm
                | Self::GetUser
        )
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Function {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|f| f.as_str() == s).ok_or(())
    }
}

/// A validated call, ready to run against the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Init { seed: String },
    Read { key: String },
    Write { key: String, value: String },
    CreateUser { name: String, coin: String },
    CreateFarm {
        name: String,
        address: String,
        owner: String,
        /// Alternating label and temperature tokens.
        weather: Vec<String>,
    },
    CreateInsurance {
        farm: String,
        beneficiary: String,
        coverage_number: String,
        rate: String,
        state: String,
    },
    UpdateWeather { farm: String, label: String, temperature: String },
    ListFarms,
    ListUsers,
    ListInsurance,
    GetFarm { name: String },
    GetUser { name: String },
}

impl Command {
    /// Validate the argument count for `function` and build the command.
    ///
    /// Only the count is checked here; contents are validated by the ledger.
    pub fn parse(function: Function, args: &[String]) -> ChaincodeResult<Self> {
        let exact = |n: usize, expected: &'static str| -> ChaincodeResult<()> {
            if args.len() != n {
                return Err(ChaincodeError::ArgumentCount {
                    function: function.as_str(),
                    expected,
                    actual: args.len(),
                });
            }
            Ok(())
        };
        let arg = |i: usize| args[i].clone();

        let command = match function {
            Function::Init => {
                exact(1, "1")?;
                Self::Init { seed: arg(0) }
            }
            Function::Read => {
                exact(1, "1")?;
                Self::Read { key: arg(0) }
            }
            Function::Write => {
                exact(2, "2")?;
                Self::Write { key: arg(0), value: arg(1) }
            }
            Function::CreateUser => {
                exact(2, "2")?;
                Self::CreateUser { name: arg(0), coin: arg(1) }
            }
            Function::CreateFarm => {
                if args.len() < 5 || (args.len() - 3) % 2 != 0 {
                    return Err(ChaincodeError::ArgumentCount {
                        function: function.as_str(),
                        expected: "3 plus label/temperature pairs",
                        actual: args.len(),
                    });
                }
                Self::CreateFarm {
                    name: arg(0),
                    address: arg(1),
                    owner: arg(2),
                    weather: args[3..].to_vec(),
                }
            }
            Function::CreateInsurance => {
                exact(5, "5")?;
                Self::CreateInsurance {
                    farm: arg(0),
                    beneficiary: arg(1),
                    coverage_number: arg(2),
                    rate: arg(3),
                    state: arg(4),
                }
            }
            Function::UpdateWeather => {
                exact(3, "3")?;
                Self::UpdateWeather {
                    farm: arg(0),
                    label: arg(1),
                    temperature: arg(2),
                }
            }
            Function::ListFarms => {
                exact(0, "0")?;
                Self::ListFarms
            }
            Function::ListUsers => {
                exact(0, "0")?;
                Self::ListUsers
            }
            Function::ListInsurance => {
                exact(0, "0")?;
                Self::ListInsurance
            }
            Function::GetFarm => {
                exact(1, "1")?;
                Self::GetFarm { name: arg(0) }
            }
            Function::GetUser => {
                exact(1, "1")?;
                Self::GetUser { name: arg(0) }
            }
        };
        Ok(command)
    }

    pub fn function(&self) -> Function {
        match self {
            Self::Init { .. } => Function::Init,
            Self::Read { .. } => Function::Read,
            Self::Write { .. } => Function::Write,
            Self::CreateUser { .. } => Function::CreateUser,
            Self::CreateFarm { .. } => Function::CreateFarm,
            Self::CreateInsurance { .. } => Function::CreateInsurance,
            Self::UpdateWeather { .. } => Function::UpdateWeather,
            Self::ListFarms => Function::ListFarms,
            Self::ListUsers => Function::ListUsers,
            Self::ListInsurance => Function::ListInsurance,
            Self::GetFarm { .. } => Function::GetFarm,
            Self::GetUser { .. } => Function::GetUser,
        }
    }
}
