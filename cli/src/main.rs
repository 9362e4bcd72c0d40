//! cpamm CLI - drive the constant product settlement engine
//!
//! Every command loads the JSON ledger, runs one engine operation as the
//! caller named by the configured keypair, and saves the ledger again if the
//! operation committed.

use clap::{Parser, Subcommand};
use colored::Colorize;
use cpamm::SwapDirection;
use std::path::PathBuf;

mod client;
mod config;
mod ledger;
mod liquidity;
mod pool;
mod trading;

use client::Session;
use config::{parse_pubkey, CliConfig, Overrides};

#[derive(Parser)]
#[command(name = "cpamm")]
#[command(about = "Constant product AMM settlement CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.config/cpamm/config.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ledger file (overrides config)
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Path to keypair file (overrides config)
    #[arg(short, long)]
    keypair: Option<PathBuf>,

    /// Program id used to derive pool identities (overrides config)
    #[arg(long)]
    program_id: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new pool
    Init {
        /// Seed the pool identity is derived from
        #[arg(short, long)]
        seed: u64,

        /// Reserve asset X
        #[arg(long)]
        mint_x: String,

        /// Reserve asset Y
        #[arg(long)]
        mint_y: String,

        /// Swap fee (basis points)
        #[arg(short, long, default_value = "30")]
        fee_bps: u16,

        /// Lock authority (default: the caller)
        #[arg(long, conflicts_with = "no_authority")]
        authority: Option<String>,

        /// Create the pool without a lock authority
        #[arg(long)]
        no_authority: bool,
    },

    /// Deposit liquidity for a fixed amount of LP tokens
    Deposit {
        /// Pool seed or address
        pool: String,

        /// LP tokens to mint
        amount: u64,

        /// Most X the caller will pay
        #[arg(long, default_value_t = u64::MAX)]
        max_x: u64,

        /// Most Y the caller will pay
        #[arg(long, default_value_t = u64::MAX)]
        max_y: u64,
    },

    /// Burn LP tokens for a share of the reserves
    Withdraw {
        /// Pool seed or address
        pool: String,

        /// LP tokens to burn
        amount: u64,

        /// Least X the caller will accept
        #[arg(long, default_value = "0")]
        min_x: u64,

        /// Least Y the caller will accept
        #[arg(long, default_value = "0")]
        min_y: u64,
    },

    /// Swap one reserve asset for the other
    Swap {
        /// Pool seed or address
        pool: String,

        /// x-to-y or y-to-x
        direction: SwapDirection,

        /// Input amount, fee included
        amount: u64,

        /// Least output the caller will accept
        #[arg(long, default_value = "0")]
        min_out: u64,
    },

    /// Pause a pool (authority only)
    Lock {
        /// Pool seed or address
        pool: String,
    },

    /// Resume a paused pool (authority only)
    Unlock {
        /// Pool seed or address
        pool: String,
    },

    /// Show pool reserves, supply and price
    Status {
        /// Pool seed or address (default: all pools)
        pool: Option<String>,
    },

    /// Preview an operation without committing it
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },

    /// Show custody balances
    Balances {
        /// Holder (default: the caller)
        #[arg(short, long)]
        owner: Option<String>,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Amounts a deposit would take
    Deposit {
        pool: String,
        amount: u64,
    },

    /// Amounts a withdraw would return
    Withdraw {
        pool: String,
        amount: u64,
    },

    /// Output a swap would pay
    Swap {
        pool: String,
        direction: SwapDirection,
        amount: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = CliConfig::load(
        cli.config.as_deref(),
        Overrides {
            program_id: cli.program_id.clone(),
            ledger_path: cli.ledger.clone(),
            keypair_path: cli.keypair.clone(),
        },
    )?;

    if cli.verbose {
        println!("{} {}", "Program:".bright_cyan(), config.program_id);
        println!("{} {}", "Ledger:".bright_cyan(), config.ledger_path.display());
        println!("{} {}", "Keypair:".bright_cyan(), config.keypair_path.display());
        println!("{} {}", "Caller:".bright_cyan(), config.pubkey());
    }

    let mut session = Session::open(&config)?;

    match cli.command {
        Commands::Init { seed, mint_x, mint_y, fee_bps, authority, no_authority } => {
            let authority = if no_authority {
                None
            } else {
                match authority {
                    Some(authority) => Some(parse_pubkey(&authority)?),
                    None => Some(session.caller),
                }
            };
            pool::initialize_pool(
                &mut session,
                seed,
                parse_pubkey(&mint_x)?,
                parse_pubkey(&mint_y)?,
                fee_bps,
                authority,
            )?;
        }
        Commands::Deposit { pool, amount, max_x, max_y } => {
            liquidity::deposit(&mut session, &pool, amount, max_x, max_y)?;
        }
        Commands::Withdraw { pool, amount, min_x, min_y } => {
            liquidity::withdraw(&mut session, &pool, amount, min_x, min_y)?;
        }
        Commands::Swap { pool, direction, amount, min_out } => {
            trading::swap(&mut session, &pool, direction, amount, min_out)?;
        }
        Commands::Lock { pool } => {
            pool::set_locked(&mut session, &pool, true)?;
        }
        Commands::Unlock { pool } => {
            pool::set_locked(&mut session, &pool, false)?;
        }
        Commands::Status { pool } => {
            pool::show_status(&session, pool.as_deref())?;
        }
        Commands::Quote { command } => match command {
            QuoteCommands::Deposit { pool, amount } => {
                trading::quote_deposit(&session, &pool, amount)?;
            }
            QuoteCommands::Withdraw { pool, amount } => {
                trading::quote_withdraw(&session, &pool, amount)?;
            }
            QuoteCommands::Swap { pool, direction, amount } => {
                trading::quote_swap(&session, &pool, direction, amount)?;
            }
        },
        Commands::Balances { owner } => {
            let owner = owner.as_deref().map(parse_pubkey).transpose()?;
            pool::show_balances(&session, owner)?;
        }
    }

    Ok(())
}
