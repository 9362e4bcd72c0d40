//! CLI configuration and keypair management

use anyhow::{Context, Result};
use cpamm::DEFAULT_PROGRAM_ID;
use serde::Deserialize;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_CONFIG_PATH: &str = "~/.config/cpamm/config.toml";
const DEFAULT_LEDGER_PATH: &str = "~/.config/cpamm/ledger.json";
const DEFAULT_KEYPAIR_PATH: &str = "~/.config/solana/id.json";

/// Opening balance credited when a ledger is created
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GenesisBalance {
    /// Base58 holder; omitted means the configured keypair
    pub owner: Option<String>,
    /// Base58 asset identity
    pub mint: String,
    pub amount: u64,
}

/// On-disk layout of the TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    program_id: Option<String>,
    ledger_path: Option<String>,
    keypair_path: Option<String>,
    #[serde(default)]
    genesis: Vec<GenesisBalance>,
}

/// Command-line values that take precedence over the file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub program_id: Option<String>,
    pub ledger_path: Option<PathBuf>,
    pub keypair_path: Option<PathBuf>,
}

pub struct CliConfig {
    pub program_id: Pubkey,
    pub ledger_path: PathBuf,
    pub keypair: Keypair,
    pub keypair_path: PathBuf,
    pub genesis: Vec<GenesisBalance>,
}

impl CliConfig {
    /// Load the config file (if any), apply overrides and load the keypair.
    ///
    /// An explicitly named config file must exist; the default one is optional.
    pub fn load(config_path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let file = match config_path {
            Some(path) => read_config_file(path)?,
            None => {
                let default = expand_path(DEFAULT_CONFIG_PATH)?;
                if default.exists() {
                    read_config_file(&default)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let program_id = match overrides.program_id.or(file.program_id) {
            Some(id) => Pubkey::from_str(&id).with_context(|| format!("Invalid program id: {}", id))?,
            None => DEFAULT_PROGRAM_ID,
        };

        let ledger_path = match overrides.ledger_path {
            Some(path) => path,
            None => expand_path(file.ledger_path.as_deref().unwrap_or(DEFAULT_LEDGER_PATH))?,
        };

        let keypair_path = match overrides.keypair_path {
            Some(path) => path,
            None => expand_path(file.keypair_path.as_deref().unwrap_or(DEFAULT_KEYPAIR_PATH))?,
        };

        let keypair = load_keypair(&keypair_path)?;

        Ok(Self {
            program_id,
            ledger_path,
            keypair,
            keypair_path,
            genesis: file.genesis,
        })
    }

    /// The authenticated caller
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Genesis entries with owners and mints resolved
    pub fn genesis_balances(&self) -> Result<Vec<(Pubkey, Pubkey, u64)>> {
        self.genesis
            .iter()
            .map(|entry| -> Result<(Pubkey, Pubkey, u64)> {
                let owner = match &entry.owner {
                    Some(owner) => parse_pubkey(owner)?,
                    None => self.pubkey(),
                };
                Ok((owner, parse_pubkey(&entry.mint)?, entry.amount))
            })
            .collect()
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    toml::from_str(&data).with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Expand `~` and environment variables in a path
pub fn expand_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(path).with_context(|| format!("Failed to expand path: {}", path))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

pub fn parse_pubkey(value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value).with_context(|| format!("Invalid pubkey: {}", value))
}

/// Load a keypair from a JSON file
pub fn load_keypair(path: &Path) -> Result<Keypair> {
    if !path.exists() {
        anyhow::bail!(
            "Keypair file not found: {}\n\
             Create one with: solana-keygen new --outfile {}",
            path.display(),
            path.display()
        );
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read keypair file: {}", path.display()))?;

    let bytes: Vec<u8> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse keypair JSON: {}", path.display()))?;

    Keypair::from_bytes(&bytes).with_context(|| format!("Invalid keypair data in: {}", path.display()))
}
