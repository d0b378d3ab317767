use std::fs;

use anyhow::Context;
use colored::Colorize;

use pwi_chaincode::{Chaincode, ChaincodeError, Command as Call};
use pwi_ledger::{Ledger, LedgerConfig, WeatherUpdate};
use pwi_store::FileStateStore;
use pwi_types::{ContractState, Farm, InsuranceBook, InsuranceContract, User};

use crate::cli::*;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let chaincode = open(&cli)?;
    match plan(cli.command) {
        Plan::Invoke(raw) => {
            let out = chaincode.invoke(&raw.function, &raw.args).map_err(classify)?;
            print_raw(&out);
        }
        Plan::Query(raw) => {
            let out = chaincode.query(&raw.function, &raw.args).map_err(classify)?;
            print_raw(&out);
        }
        Plan::Typed(call) => {
            let out = chaincode.execute(call.clone()).map_err(classify)?;
            match cli.format {
                OutputFormat::Json => print_raw(&out),
                OutputFormat::Text => render(&call, &out)?,
            }
        }
    }
    Ok(())
}

enum Plan {
    Typed(Call),
    Invoke(RawCallArgs),
    Query(RawCallArgs),
}

fn open(cli: &Cli) -> anyhow::Result<Chaincode<FileStateStore>> {
    let config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            LedgerConfig::from_toml_str(&raw)?
        }
        None => LedgerConfig::default(),
    };
    let store = FileStateStore::open(&cli.state)
        .with_context(|| format!("opening state file {}", cli.state.display()))?;
    Ok(Chaincode::new(Ledger::with_config(store, config)?))
}

fn classify(err: ChaincodeError) -> anyhow::Error {
    anyhow::anyhow!("{}: {err}", err.kind())
}

fn plan(command: Command) -> Plan {
    let call = match command {
        Command::Init(a) => Call::Init { seed: a.seed },
        Command::Read(a) => Call::Read { key: a.key },
        Command::Write(a) => Call::Write { key: a.key, value: a.value },
        Command::CreateUser(a) => Call::CreateUser { name: a.name, coin: a.coin },
        Command::CreateFarm(a) => Call::CreateFarm {
            name: a.name,
            address: a.address,
            owner: a.owner,
            weather: a.weather,
        },
        Command::CreateInsurance(a) => Call::CreateInsurance {
            farm: a.farm,
            beneficiary: a.beneficiary,
            coverage_number: a.coverage_number,
            rate: a.rate,
            state: a.state,
        },
        Command::UpdateWeather(a) => Call::UpdateWeather {
            farm: a.farm,
            label: a.label,
            temperature: a.temperature,
        },
        Command::Farms => Call::ListFarms,
        Command::Users => Call::ListUsers,
        Command::Contracts => Call::ListInsurance,
        Command::Farm(a) => Call::GetFarm { name: a.name },
        Command::User(a) => Call::GetUser { name: a.name },
        Command::Invoke(raw) => return Plan::Invoke(raw),
        Command::Query(raw) => return Plan::Query(raw),
    };
    Plan::Typed(call)
}

fn print_raw(out: &[u8]) {
    if !out.is_empty() {
        println!("{}", String::from_utf8_lossy(out));
    }
}

fn render(call: &Call, out: &[u8]) -> anyhow::Result<()> {
    match call {
        Call::Init { seed } => {
            println!("{} Ledger reset (seed {})", "✓".green().bold(), seed.bold());
        }
        Call::Read { .. } => print_raw(out),
        Call::Write { key, .. } => println!("{} Wrote {}", "✓".green(), key.bold()),
        Call::CreateUser { .. } => {
            let user: User = serde_json::from_slice(out)?;
            println!("{} Created user {} with {} coins", "✓".green().bold(), user.name.yellow(), user.balance);
        }
        Call::CreateFarm { .. } => {
            let farm: Farm = serde_json::from_slice(out)?;
            println!("{} Created farm {} for {}", "✓".green().bold(), farm.name.yellow(), farm.owner);
            print_history(&farm);
        }
        Call::CreateInsurance { .. } => {
            let contract: InsuranceContract = serde_json::from_slice(out)?;
            println!("{} Issued contract", "✓".green().bold());
            print_contract(&contract);
        }
        Call::UpdateWeather { .. } => {
            let update: WeatherUpdate = serde_json::from_slice(out)?;
            println!(
                "Recorded weather for {} ({} readings)",
                update.farm.yellow(),
                update.history_len
            );
            if update.condition_met {
                println!("  {}", "Payout condition met".red().bold());
            }
            for payout in &update.settlements {
                println!(
                    "  {} {} +{} → {}",
                    "settled".green(),
                    payout.beneficiary.bold(),
                    payout.benefit,
                    payout.new_balance
                );
            }
        }
        Call::ListFarms | Call::ListUsers => {
            let names: Vec<String> = serde_json::from_slice(out)?;
            if names.is_empty() {
                println!("None.");
            }
            for name in names {
                println!("  {name}");
            }
        }
        Call::ListInsurance => {
            let book: InsuranceBook = serde_json::from_slice(out)?;
            if book.is_empty() {
                println!("No contracts.");
            }
            for contract in &book.contracts {
                print_contract(contract);
            }
        }
        Call::GetFarm { .. } => {
            let farm: Farm = serde_json::from_slice(out)?;
            println!("{}  {}  (owner {})", farm.name.yellow().bold(), farm.address, farm.owner);
            print_history(&farm);
        }
        Call::GetUser { .. } => {
            let user: User = serde_json::from_slice(out)?;
            println!("{}  {} coins", user.name.yellow().bold(), user.balance);
        }
    }
    Ok(())
}

fn print_history(farm: &Farm) {
    for (i, reading) in farm.weather_history.iter().enumerate() {
        println!("  {:>3}  {}", i + 1, reading);
    }
}

fn print_contract(contract: &InsuranceContract) {
    let label = contract.state.as_str();
    let state = match contract.state {
        ContractState::Solved => label.dimmed(),
        ContractState::Active => label.green(),
        ContractState::Pending => label.yellow(),
    };
    println!(
        "  {} → {}  {} × {}  [{}]",
        contract.insurant_farm.yellow(),
        contract.beneficiary_user.bold(),
        contract.coverage_number,
        contract.rate,
        state
    );
}
