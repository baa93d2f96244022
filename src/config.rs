//! Tunables, loadable from TOML.
//!
//! Every section and field is optional in the file; anything left out
//! takes its default, and the defaults reproduce the stock table.
//!
//! ```toml
//! [solver]
//! max_iterations = 2000
//!
//! [selection]
//! hard_tries = 80
//!
//! [table]
//! entry_fee = 10
//! ```

use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::difficulty::{DealGenerator, SelectionConfig};
use crate::error::{Error, Result};
use crate::score::ScoreWeights;
use crate::search::{Solver, SolverConfig};
use crate::session::TableConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverConfig,
    pub scoring: ScoreWeights,
    pub selection: SelectionConfig,
    pub table: TableConfig,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn solver(&self) -> Solver {
        Solver::new(self.solver)
    }

    pub fn generator(&self) -> DealGenerator {
        DealGenerator {
            solver: self.solver(),
            weights: self.scoring,
            selection: self.selection,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.solver.max_iterations == 0 {
            return Err(Error::InvalidConfig {
                field: "solver.max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.table.autoplay_batch == 0 {
            return Err(Error::InvalidConfig {
                field: "table.autoplay_batch",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.table.win_payout < self.table.entry_fee {
            return Err(Error::InvalidConfig {
                field: "table.win_payout",
                reason: format!(
                    "{} is below the entry fee {}",
                    self.table.win_payout, self.table.entry_fee
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_the_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.solver.max_iterations, 1200);
        assert_eq!(config.table.entry_fee, 6);
        assert_eq!(config.table.win_payout, 18);
        assert_eq!(config.scoring.baseline, 300);
        assert_eq!(config.selection.fallback_tries, 50);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [solver]
            max_iterations = 2000

            [selection]
            hard_tries = 80
            "#,
        )
        .unwrap();
        assert_eq!(config.solver.max_iterations, 2000);
        assert_eq!(config.selection.hard_tries, 80);
        assert_eq!(config.selection.easy_tries, 60);
        assert_eq!(config.generator().solver.config.max_iterations, 2000);
    }

    #[test]
    fn bad_values_are_rejected() {
        assert!(matches!(
            Config::from_toml_str("[solver]\nmax_iterations = 0\n"),
            Err(Error::InvalidConfig { field: "solver.max_iterations", .. })
        ));
        assert!(matches!(
            Config::from_toml_str("[table]\nentry_fee = 50\n"),
            Err(Error::InvalidConfig { field: "table.win_payout", .. })
        ));
        assert!(matches!(
            Config::from_toml_str("[solver]\nmax_iterations = \"lots\"\n"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn defaults_survive_a_write_and_read() {
        let text = Config::default().to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), Config::default());
    }
}
