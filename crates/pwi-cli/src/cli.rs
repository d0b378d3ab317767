use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pwi",
    about = "Parametric weather insurance ledger",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger state file
    #[arg(long, global = true, default_value = "pwi-state.json")]
    pub state: PathBuf,

    /// TOML file overriding the default contract terms
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Reset the farm and user indexes and the insurance book
    Init(InitArgs),
    /// Print the raw value stored at a key
    Read(ReadArgs),
    /// Overwrite the raw value stored at a key
    Write(WriteArgs),
    /// Create a user with a starting coin balance
    CreateUser(CreateUserArgs),
    /// Create a farm with its initial weather readings
    CreateFarm(CreateFarmArgs),
    /// Issue an insurance contract for a farm
    CreateInsurance(CreateInsuranceArgs),
    /// Record a weather reading, settling contracts if the condition is met
    UpdateWeather(UpdateWeatherArgs),
    /// List farm names in creation order
    Farms,
    /// List user names in creation order
    Users,
    /// List every insurance contract
    Contracts,
    /// Show one farm and its weather history
    Farm(NameArgs),
    /// Show one user
    User(NameArgs),
    /// Call a state-changing function by name
    Invoke(RawCallArgs),
    /// Call a read-only function by name
    Query(RawCallArgs),
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(allow_negative_numbers = true)]
    pub seed: String,
}

#[derive(Args)]
pub struct ReadArgs {
    pub key: String,
}

#[derive(Args)]
pub struct WriteArgs {
    pub key: String,
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

#[derive(Args)]
pub struct CreateUserArgs {
    pub name: String,
    #[arg(allow_negative_numbers = true)]
    pub coin: String,
}

#[derive(Args)]
pub struct CreateFarmArgs {
    pub name: String,
    pub address: String,
    pub owner: String,
    /// Alternating LABEL TEMPERATURE tokens, at least one pair
    #[arg(required = true, num_args = 2.., allow_negative_numbers = true)]
    pub weather: Vec<String>,
}

#[derive(Args)]
pub struct CreateInsuranceArgs {
    pub farm: String,
    pub beneficiary: String,
    #[arg(allow_negative_numbers = true)]
    pub coverage_number: String,
    #[arg(allow_negative_numbers = true)]
    pub rate: String,
    /// Initial contract state, `pending` or `active`
    #[arg(id = "contract_state", value_name = "STATE", default_value = "active")]
    pub state: String,
}

#[derive(Args)]
pub struct UpdateWeatherArgs {
    pub farm: String,
    pub label: String,
    #[arg(allow_negative_numbers = true)]
    pub temperature: String,
}

#[derive(Args)]
pub struct NameArgs {
    pub name: String,
}

#[derive(Args)]
pub struct RawCallArgs {
    pub function: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
