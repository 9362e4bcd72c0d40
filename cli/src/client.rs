//! Ledger-backed engine session

use anyhow::{Context, Result};
use colored::Colorize;
use cpamm::{MemoryAmmEngine, MemoryCustody, ProgramDerivation};
use log::{debug, info};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::CliConfig;
use crate::ledger::Ledger;

/// Engine loaded from the configured ledger, plus the authenticated caller
pub struct Session {
    pub engine: MemoryAmmEngine,
    pub caller: Pubkey,
    program_id: Pubkey,
    ledger_path: PathBuf,
}

impl Session {
    /// Load the ledger, or start a fresh one from the genesis balances
    pub fn open(config: &CliConfig) -> Result<Self> {
        let engine = match Ledger::load(&config.ledger_path)? {
            Some(ledger) => {
                let ledger_program = Pubkey::from_str(&ledger.program_id)
                    .with_context(|| format!("Invalid program id in ledger: {}", ledger.program_id))?;
                if ledger_program != config.program_id {
                    anyhow::bail!(
                        "Ledger {} was created for program {}, config uses {}",
                        config.ledger_path.display(),
                        ledger_program,
                        config.program_id
                    );
                }
                debug!("Loaded ledger {} (updated {})", config.ledger_path.display(), ledger.updated_at);
                ledger.restore()?
            }
            None => {
                let mut custody = MemoryCustody::new();
                for (owner, mint, amount) in config.genesis_balances()? {
                    custody
                        .fund(owner, mint, amount)
                        .with_context(|| format!("Invalid genesis balance for {}", owner))?;
                }
                info!("Created ledger {} from genesis", config.ledger_path.display());
                println!(
                    "{} {}",
                    "New ledger:".bright_cyan(),
                    config.ledger_path.display().to_string().dimmed()
                );
                MemoryAmmEngine::new(BTreeMap::new(), custody, ProgramDerivation::new(config.program_id))
            }
        };

        Ok(Self {
            engine,
            caller: config.pubkey(),
            program_id: config.program_id,
            ledger_path: config.ledger_path.clone(),
        })
    }

    /// Persist the engine state after a committed operation
    pub fn commit(&self) -> Result<()> {
        Ledger::capture(&self.engine, &self.program_id).save(&self.ledger_path)?;
        debug!("Saved ledger {}", self.ledger_path.display());
        Ok(())
    }

    /// Accept a pool address, or a seed to derive it from
    pub fn resolve_pool(&self, pool: &str) -> Result<Pubkey> {
        if let Ok(seed) = pool.parse::<u64>() {
            return Ok(self.engine.pool_address(seed));
        }
        Pubkey::from_str(pool).with_context(|| format!("Invalid pool (expected seed or address): {}", pool))
    }
}
