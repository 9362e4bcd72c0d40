//! JSON ledger: pools, claim-token mints and custody balances between runs

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use cpamm::{MemoryAmmEngine, MemoryCustody, MintInfo, Pool, ProgramDerivation};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::config::parse_pubkey;

const LEDGER_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolEntry {
    pub address: String,
    pub seed: u64,
    pub mint_x: String,
    pub mint_y: String,
    pub fee_bps: u16,
    pub authority: Option<String>,
    pub locked: bool,
    pub lp_mint: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintEntry {
    pub mint: String,
    pub authority: String,
    pub decimals: u8,
    pub supply: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub owner: String,
    pub mint: String,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub version: u32,
    pub program_id: String,
    pub updated_at: DateTime<Utc>,
    pub pools: Vec<PoolEntry>,
    pub mints: Vec<MintEntry>,
    pub balances: Vec<BalanceEntry>,
}

impl Ledger {
    /// Capture the engine's full state
    pub fn capture(engine: &MemoryAmmEngine, program_id: &Pubkey) -> Self {
        let pools = engine
            .pools()
            .map(|pool| PoolEntry {
                address: pool.address.to_string(),
                seed: pool.seed,
                mint_x: pool.mint_x.to_string(),
                mint_y: pool.mint_y.to_string(),
                fee_bps: pool.fee_bps,
                authority: pool.authority.map(|a| a.to_string()),
                locked: pool.locked,
                lp_mint: pool.lp_mint.to_string(),
            })
            .collect();

        let mints = engine
            .custody()
            .mints()
            .map(|(mint, info)| MintEntry {
                mint: mint.to_string(),
                authority: info.authority.to_string(),
                decimals: info.decimals,
                supply: info.supply,
            })
            .collect();

        let balances = engine
            .custody()
            .holdings()
            .map(|(owner, mint, amount)| BalanceEntry {
                owner: owner.to_string(),
                mint: mint.to_string(),
                amount,
            })
            .collect();

        Self {
            version: LEDGER_VERSION,
            program_id: program_id.to_string(),
            updated_at: Utc::now(),
            pools,
            mints,
            balances,
        }
    }

    /// Rebuild an engine from the ledger
    pub fn restore(&self) -> Result<MemoryAmmEngine> {
        if self.version != LEDGER_VERSION {
            anyhow::bail!("Unsupported ledger version {} (expected {})", self.version, LEDGER_VERSION);
        }

        let program_id = parse_pubkey(&self.program_id)?;

        let mut store = BTreeMap::new();
        for entry in &self.pools {
            let pool = Pool {
                address: parse_pubkey(&entry.address)?,
                seed: entry.seed,
                mint_x: parse_pubkey(&entry.mint_x)?,
                mint_y: parse_pubkey(&entry.mint_y)?,
                fee_bps: entry.fee_bps,
                authority: entry.authority.as_deref().map(parse_pubkey).transpose()?,
                locked: entry.locked,
                lp_mint: parse_pubkey(&entry.lp_mint)?,
            };
            store.insert(pool.address, pool);
        }

        let mints = self
            .mints
            .iter()
            .map(|entry| -> Result<(Pubkey, MintInfo)> {
                Ok((
                    parse_pubkey(&entry.mint)?,
                    MintInfo {
                        authority: parse_pubkey(&entry.authority)?,
                        decimals: entry.decimals,
                        supply: entry.supply,
                    },
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        let holdings = self
            .balances
            .iter()
            .map(|entry| -> Result<(Pubkey, Pubkey, u64)> {
                Ok((parse_pubkey(&entry.owner)?, parse_pubkey(&entry.mint)?, entry.amount))
            })
            .collect::<Result<Vec<_>>>()?;

        check_consistency(&store, &mints, &holdings)?;

        Ok(MemoryAmmEngine::new(
            store,
            MemoryCustody::from_parts(holdings, mints),
            ProgramDerivation::new(program_id),
        ))
    }

    /// Read a ledger, None if the file does not exist yet
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read ledger: {}", path.display()))?;

        let ledger = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse ledger: {}", path.display()))?;

        Ok(Some(ledger))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create ledger directory: {}", parent.display()))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize ledger")?;

        fs::write(path, data).with_context(|| format!("Failed to write ledger: {}", path.display()))
    }
}

/// Every mint's supply matches its holdings and every pool's LP mint is
/// issued under the pool's authority
fn check_consistency(
    store: &BTreeMap<Pubkey, Pool>,
    mints: &[(Pubkey, MintInfo)],
    holdings: &[(Pubkey, Pubkey, u64)],
) -> Result<()> {
    for (mint, info) in mints {
        let held: u128 = holdings
            .iter()
            .filter(|(_, asset, _)| asset == mint)
            .map(|(_, _, amount)| *amount as u128)
            .sum();
        if held != info.supply as u128 {
            anyhow::bail!("Mint {} records supply {} but holdings total {}", mint, info.supply, held);
        }
    }

    for pool in store.values() {
        match mints.iter().find(|(mint, _)| *mint == pool.lp_mint) {
            Some((_, info)) if info.authority == pool.address => {}
            Some((_, info)) => anyhow::bail!(
                "LP mint {} of pool {} is issued by {}",
                pool.lp_mint,
                pool.address,
                info.authority
            ),
            None => anyhow::bail!("LP mint {} of pool {} is missing", pool.lp_mint, pool.address),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpamm::{InitializeParams, SwapDirection};
    use tempfile::TempDir;

    fn busy_engine() -> (MemoryAmmEngine, Pool) {
        let mut engine = MemoryAmmEngine::default();
        let alice = Pubkey::new_unique();
        let pool = engine
            .initialize(
                &alice,
                InitializeParams {
                    seed: 11,
                    mint_x: Pubkey::new_unique(),
                    mint_y: Pubkey::new_unique(),
                    fee_bps: 25,
                    authority: Some(alice),
                },
            )
            .unwrap();
        engine.custody_mut().fund(alice, pool.mint_x, 100_000).unwrap();
        engine.custody_mut().fund(alice, pool.mint_y, 100_000).unwrap();
        engine.deposit(&pool.address, &alice, 10_000, 10_000, 10_000).unwrap();
        engine.swap(&pool.address, &alice, SwapDirection::XToY, 500, 0).unwrap();
        engine.set_locked(&pool.address, &alice, true).unwrap();
        (engine, pool)
    }

    #[test]
    fn test_save_and_restore() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("ledger.json");
        let (engine, pool) = busy_engine();

        Ledger::capture(&engine, &cpamm::DEFAULT_PROGRAM_ID).save(&path).unwrap();
        let restored = Ledger::load(&path).unwrap().unwrap().restore().unwrap();

        assert_eq!(restored, engine);
        assert_eq!(restored.snapshot(&pool.address), engine.snapshot(&pool.address));
    }

    #[test]
    fn test_missing_ledger_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(Ledger::load(&dir.path().join("ledger.json")).unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_identity() {
        let (engine, _) = busy_engine();
        let mut ledger = Ledger::capture(&engine, &cpamm::DEFAULT_PROGRAM_ID);
        ledger.pools[0].mint_x = "not-a-key".to_string();
        assert!(ledger.restore().is_err());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let (engine, _) = busy_engine();
        let mut ledger = Ledger::capture(&engine, &cpamm::DEFAULT_PROGRAM_ID);
        ledger.version = 2;
        assert!(ledger.restore().is_err());
    }

    #[test]
    fn test_rejects_inflated_supply() {
        let (engine, pool) = busy_engine();
        let mut ledger = Ledger::capture(&engine, &cpamm::DEFAULT_PROGRAM_ID);
        let lp = pool.lp_mint.to_string();
        let entry = ledger.mints.iter_mut().find(|m| m.mint == lp).unwrap();
        entry.supply += 1;
        assert!(ledger.restore().is_err());
    }

    #[test]
    fn test_rejects_unbacked_balance() {
        let (engine, pool) = busy_engine();
        let mut ledger = Ledger::capture(&engine, &cpamm::DEFAULT_PROGRAM_ID);
        ledger.balances.push(BalanceEntry {
            owner: Pubkey::new_unique().to_string(),
            mint: pool.lp_mint.to_string(),
            amount: 1000,
        });
        assert!(ledger.restore().is_err());
    }

    #[test]
    fn test_rejects_missing_lp_mint() {
        let (engine, pool) = busy_engine();
        let mut ledger = Ledger::capture(&engine, &cpamm::DEFAULT_PROGRAM_ID);
        let lp = pool.lp_mint.to_string();
        ledger.mints.retain(|m| m.mint != lp);
        ledger.balances.retain(|b| b.mint != lp);
        assert!(ledger.restore().is_err());
    }

    #[test]
    fn test_rejects_foreign_lp_authority() {
        let (engine, pool) = busy_engine();
        let mut ledger = Ledger::capture(&engine, &cpamm::DEFAULT_PROGRAM_ID);
        let lp = pool.lp_mint.to_string();
        let entry = ledger.mints.iter_mut().find(|m| m.mint == lp).unwrap();
        entry.authority = Pubkey::new_unique().to_string();
        assert!(ledger.restore().is_err());
    }
}
