//! `condsql.toml` configuration.
//!
//! ```toml
//! schema = "db/schema.json"
//! validate = true
//! quoting = "mysql"   # or "ansi"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};
use crate::transpiler::{AnsiQuoter, MysqlQuoter, Quoter};

pub const CONFIG_FILE: &str = "condsql.toml";

/// Literal quoting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuotingStyle {
    #[default]
    Mysql,
    Ansi,
}

impl QuotingStyle {
    pub fn quoter(&self) -> &'static dyn Quoter {
        match self {
            QuotingStyle::Mysql => &MysqlQuoter,
            QuotingStyle::Ansi => &AnsiQuoter,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema file (`.json` or `.toml`).
    pub schema: Option<PathBuf>,
    pub validate: bool,
    pub quoting: QuotingStyle,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: None,
            validate: true,
            quoting: QuotingStyle::Mysql,
        }
    }
}

impl Config {
    pub fn from_toml(input: &str) -> CompileResult<Self> {
        toml::from_str(input).map_err(|e| CompileError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> CompileResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CompileError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        let mut config = Self::from_toml(&content)?;
        // Relative schema paths are relative to the config file.
        if let (Some(schema), Some(dir)) = (&config.schema, path.parent()) {
            if schema.is_relative() {
                config.schema = Some(dir.join(schema));
            }
        }
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Config file lookup: `./condsql.toml`, then the user config directory.
    pub fn locate() -> Option<PathBuf> {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::config_dir()
            .map(|dir| dir.join("condsql").join(CONFIG_FILE))
            .filter(|path| path.exists())
    }

    /// Load from `path`, or from the located file, or defaults.
    pub fn load(path: Option<&Path>) -> CompileResult<Self> {
        match path.map(Path::to_path_buf).or_else(Self::locate) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }
}
