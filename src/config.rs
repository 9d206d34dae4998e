//! Runtime settings.
//!
//! Values come from built-in defaults, then an optional `vitrine.{toml,json,yaml}`
//! file in the working directory, then `VITRINE_*` environment variables
//! (for example `VITRINE_DATABASE=/data/lux.sqlite`).

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::aggregate::{DEFAULT_RESULT_LIMIT, MAX_RESULT_LIMIT};
use crate::error::{Result, VitrineError};
use crate::format::Grid;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// SQLite file holding the collection.
    pub database: PathBuf,
    /// Address the HTTP server listens on.
    pub bind: String,
    /// Maximum number of flat rows a search may read.
    pub result_limit: usize,
    /// Widest a rendered text column may grow.
    pub column_width: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database: PathBuf::from("lux.sqlite"),
            bind: "127.0.0.1:5000".to_string(),
            result_limit: DEFAULT_RESULT_LIMIT,
            column_width: Grid::DEFAULT_WIDTH,
        }
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    let fallback = Settings::default();
    Ok(Config::builder()
        .set_default("database", fallback.database.to_string_lossy().into_owned())?
        .set_default("bind", fallback.bind)?
        .set_default("result_limit", fallback.result_limit as u64)?
        .set_default("column_width", fallback.column_width as u64)?)
}

impl Settings {
    /// Defaults, then `vitrine.*` if present, then the environment.
    pub fn load() -> Result<Self> {
        let settings: Settings = defaults()?
            .add_source(File::with_name("vitrine").required(false))
            .add_source(Environment::with_prefix("VITRINE").try_parsing(true))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Defaults overlaid with one explicit file; the environment is ignored.
    pub fn load_file(path: &Path) -> Result<Self> {
        let settings: Settings = defaults()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database.as_os_str().is_empty() {
            return Err(VitrineError::Config("database must be non-empty.".to_string()));
        }
        if self.bind.trim().is_empty() {
            return Err(VitrineError::Config("bind must be non-empty.".to_string()));
        }
        if self.result_limit == 0 {
            return Err(VitrineError::Config(
                "result_limit must be greater than zero.".to_string(),
            ));
        }
        if self.result_limit > MAX_RESULT_LIMIT {
            return Err(VitrineError::Config(format!(
                "result_limit must be at most {MAX_RESULT_LIMIT}."
            )));
        }
        if self.column_width < 4 {
            return Err(VitrineError::Config(
                "column_width must be at least 4.".to_string(),
            ));
        }
        Ok(())
    }
}
