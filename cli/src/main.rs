//! Aerial host - runs chaincode invocations against a local sled store

mod config;

use aerial_chaincode::{AerialContract, Clock, FixedClock, Response, SystemClock};
use aerial_core::{ContractParameters, FundingLedger, Timestamp};
use aerial_storage::SledStore;
use clap::{Parser, Subcommand};
use config::Config;
use owo_colors::OwoColorize;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "aerial")]
#[command(about = "Aerial coin-age staking ledger", version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// State directory (overrides `data_dir` from the config)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Pin "now" to a unix timestamp instead of the wall clock
    #[arg(long, value_name = "SECONDS")]
    now: Option<Timestamp>,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the genesis parameters (positional values, or `[genesis]` from the config)
    Init {
        /// name symbol decimals chain-start stake-start chain-block min-days max-days
        /// max-mint total-supply max-total-supply total-initial-supply
        values: Vec<String>,
    },

    /// Call a contract function
    Invoke {
        /// Allocate, MakePayment, DeleteAccount, CheckBalance, MinePoS, CoinAge, TotalSupply
        function: String,
        args: Vec<String>,
    },

    /// Show the stored contract parameters
    Params,

    /// Show an address's funding ledger
    Ledger { address: String },
}

#[derive(Serialize)]
struct Output<'a> {
    function: &'a str,
    status: u16,
    message: &'a str,
    payload: Option<&'a str>,
}

fn print_response(function: &str, response: &Response, json: bool) {
    if json {
        let output = Output {
            function,
            status: response.status,
            message: &response.message,
            payload: response.payload_str(),
        };
        match serde_json::to_string(&output) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("failed to encode response: {}", e),
        }
        return;
    }

    if response.is_ok() {
        println!(
            "{} {} {}",
            "✓".green(),
            function.bold(),
            response.status.to_string().green()
        );
    } else {
        println!(
            "{} {} {}",
            "✗".red(),
            function.bold(),
            response.status.to_string().red()
        );
    }
    if response.message != "OK" {
        println!("  {}: {}", "Message".yellow().bold(), response.message);
    }
    if let Some(payload) = response.payload_str() {
        println!("  {}: {}", "Result".yellow().bold(), payload.bright_white());
    }
}

fn format_time(time: Timestamp) -> String {
    chrono::DateTime::from_timestamp(time, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| time.to_string())
}

fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let data_dir = config.resolve_data_dir(cli.data_dir.as_deref());
    let mut store = SledStore::open(&data_dir)?;

    let now = cli.now.unwrap_or_else(|| SystemClock.now());
    let contract = AerialContract::new(FixedClock::new(now));
    log::debug!("using state at {} with now = {}", data_dir.display(), now);

    match cli.command {
        Commands::Init { values } => {
            let values = if values.is_empty() {
                config
                    .genesis
                    .as_ref()
                    .map(|genesis| genesis.to_init_args())
                    .ok_or("no init values given and no [genesis] table in the config")?
            } else {
                values
            };

            let response = match contract.init(&mut store, &values) {
                Ok(params) => Response::success(Some(params.name.into_bytes())),
                Err(e) => Response::error(&e),
            };
            print_response("Init", &response, cli.json);
            Ok(response.is_ok())
        }

        Commands::Invoke { function, args } => {
            let response = contract.invoke(&mut store, &function, &args);
            print_response(&function, &response, cli.json);
            Ok(response.is_ok())
        }

        Commands::Params => {
            let params = ContractParameters::load(&store)?;
            if cli.json {
                println!("{}", serde_json::to_string(&params)?);
                return Ok(true);
            }

            println!("\n{} ({})", params.name.cyan().bold(), params.symbol);
            println!("{}: {}", "Decimals".yellow().bold(), params.decimals);
            println!(
                "{}: {}",
                "Stake Start".yellow().bold(),
                format_time(params.stake_start_time)
            );
            println!(
                "{}: {} - {} days",
                "Stake Age".yellow().bold(),
                params.stake_min_age / aerial_core::constants::ONE_DAY,
                params.stake_max_age / aerial_core::constants::ONE_DAY
            );
            println!(
                "{}: {} / {}",
                "Total Supply".yellow().bold(),
                params.total_supply.to_string().green(),
                params.max_total_supply
            );
            println!(
                "{}: {} / {}",
                "Initial Allocated".yellow().bold(),
                params.initial_allocated,
                params.total_initial_supply
            );
            println!();
            Ok(true)
        }

        Commands::Ledger { address } => {
            let ledger = FundingLedger::load(&store, &address)?;
            if cli.json {
                println!("{}", serde_json::to_string(ledger.events())?);
                return Ok(true);
            }

            println!("\n{} ({} events)", address.cyan().bold(), ledger.len());
            for (i, event) in ledger.events().iter().enumerate() {
                println!(
                    "  {}. {} at {}",
                    i + 1,
                    event.amount.to_string().green(),
                    format_time(event.time)
                );
            }
            println!();
            Ok(true)
        }
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(2);
        }
    }
}
