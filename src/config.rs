use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};
use tokio::fs;

/// Workload parameters. The defaults are the fixed signature external tools
/// observe; a config file only reshapes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// inclusive
    pub min_block_size: usize,
    /// exclusive
    pub max_block_size: usize,
    pub threshold: usize,
    pub interval_ms: u64,
    pub touch_pages: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_block_size: 256 * 1024,
            max_block_size: 512 * 1024,
            threshold: 200,
            interval_ms: 1000,
            touch_pages: true,
        }
    }
}

impl Config {
    pub async fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(&path).await?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> anyhow::Result<Self> {
        let conf = toml::from_str::<Config>(text)?;
        conf.validate()?;
        Ok(conf)
    }

    /// Falls back to the defaults when no file is given.
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::from_path(path).await,
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.min_block_size < self.max_block_size,
            "block size range is empty ({}..{})",
            self.min_block_size,
            self.max_block_size
        );
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
