//! Host configuration loaded from TOML

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "$HOME/.aerial/data";

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    pub data_dir: Option<String>,
    pub genesis: Option<GenesisConfig>,
}

/// The twelve genesis values, by name instead of position.
/// Start times accept unix seconds or a `2018-Jan-01` style date.
#[derive(Debug, Clone, Deserialize)]
pub struct GenesisConfig {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
    pub chain_start_time: String,
    pub stake_start_time: String,
    #[serde(default)]
    pub chain_start_block: u64,
    pub stake_min_age_days: u64,
    pub stake_max_age_days: u64,
    pub max_mint_proof_of_stake: u64,
    pub total_supply: u64,
    pub max_total_supply: u64,
    pub total_initial_supply: u64,
}

impl GenesisConfig {
    /// Positional form expected by the contract's init
    pub fn to_init_args(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.symbol.clone(),
            self.decimals.to_string(),
            self.chain_start_time.clone(),
            self.stake_start_time.clone(),
            self.chain_start_block.to_string(),
            self.stake_min_age_days.to_string(),
            self.stake_max_age_days.to_string(),
            self.max_mint_proof_of_stake.to_string(),
            self.total_supply.to_string(),
            self.max_total_supply.to_string(),
            self.total_initial_supply.to_string(),
        ]
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(toml::from_str(contents)?)
    }

    /// Command-line override, then the config file, then the default
    pub fn resolve_data_dir(&self, cli_override: Option<&Path>) -> PathBuf {
        if let Some(dir) = cli_override {
            return dir.to_path_buf();
        }
        let dir = self.data_dir.as_deref().unwrap_or(DEFAULT_DATA_DIR);
        PathBuf::from(expand_path(dir))
    }
}

pub fn expand_path(path: &str) -> String {
    path.replace("$HOME", &std::env::var("HOME").unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
data_dir = "/var/lib/aerial"

[genesis]
name = "cryptorial"
symbol = "cri"
decimals = 18
chain_start_time = "2018-Jan-01"
stake_start_time = "1514937600"
stake_min_age_days = 3
stake_max_age_days = 90
max_mint_proof_of_stake = 100000000000000000
total_supply = 1000000
max_total_supply = 21000000
total_initial_supply = 1000000
"#;

    #[test]
    fn test_parse_genesis_table() {
        let config = Config::parse(SAMPLE).unwrap();
        let genesis = config.genesis.unwrap();

        let args = genesis.to_init_args();
        assert_eq!(args.len(), 12);
        assert_eq!(args[3], "2018-Jan-01");
        assert_eq!(args[5], "0");
        assert_eq!(args[8], "100000000000000000");
    }

    #[test]
    fn test_data_dir_precedence() {
        let config = Config::parse(SAMPLE).unwrap();
        assert_eq!(
            config.resolve_data_dir(None),
            PathBuf::from("/var/lib/aerial")
        );
        assert_eq!(
            config.resolve_data_dir(Some(Path::new("/tmp/override"))),
            PathBuf::from("/tmp/override")
        );
    }

    #[test]
    fn test_empty_config() {
        let config = Config::parse("").unwrap();
        assert!(config.genesis.is_none());
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(Config::parse("data_dir = ").is_err());
    }
}
