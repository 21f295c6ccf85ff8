use crate::core::input::{DAY_MINUTES, check_break};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the database path.
pub const DB_ENV: &str = "TIMEPORTAL_DB";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database")]
    pub database: String,
    /// Break applied to submitted days that leave it empty.
    #[serde(default)]
    pub default_break_minutes: i64,
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}

pub fn default_log_filter() -> String {
    "timeportal=warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: default_database(),
            default_break_minutes: 0,
            log_filter: default_log_filter(),
        }
    }
}

impl Config {
    /// `~/.timeportal`, or `./.timeportal` when no home directory is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".timeportal")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timeportal.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timeportal.sqlite")
    }

    /// Load the configuration file, or defaults when there is none.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let cfg: Config = serde_yaml::from_str(&content)?;
        cfg.check()?;
        Ok(cfg)
    }

    fn check(&self) -> AppResult<()> {
        if self.database.trim().is_empty() {
            return Err(AppError::Config("'database' must not be empty".into()));
        }
        if check_break(self.default_break_minutes).is_err() {
            return Err(AppError::Config(format!(
                "'default_break_minutes' must be between 0 and {DAY_MINUTES}"
            )));
        }
        Ok(())
    }

    /// Database path precedence: command line, then `TIMEPORTAL_DB`, then
    /// the file.
    pub fn apply_overrides(&mut self, cli_db: Option<&str>) {
        if let Some(db) = cli_db {
            self.database = db.to_string();
        } else if let Ok(db) = env::var(DB_ENV)
            && !db.trim().is_empty()
        {
            self.database = db;
        }
    }

    /// Resolve the database location for `init`. Relative names live in the
    /// config directory.
    pub fn resolve_database(custom: Option<&str>) -> PathBuf {
        match custom {
            Some(name) => {
                let p = Path::new(name);
                if p.is_absolute() {
                    p.to_path_buf()
                } else {
                    Self::config_dir().join(p)
                }
            }
            None => Self::database_file(),
        }
    }

    /// Write the configuration file, creating its directory.
    pub fn save(&self) -> AppResult<PathBuf> {
        let path = Self::config_file();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, serde_yaml::to_string(self)?)?;
        Ok(path)
    }

    /// Render as YAML (used by `config --print`).
    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
