//! Configuration with multi-source loading.
//!
//! Priority: CLI flags > `MODSHIFT_*` environment variables > `modshift.toml`
//! (or the file given with `--config`) > defaults.

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format as _, Serialized, Toml},
};
use modshift_core::TransformOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, Result};

/// Config file looked up in the working directory when `--config` is absent.
pub const CONFIG_FILE: &str = "modshift.toml";

const ENV_PREFIX: &str = "MODSHIFT_";

const KEYS: &[&str] = &[
    "delimiter",
    "modules_store",
    "build_dir",
    "extensions",
    "exclude_dirs",
    "formatter",
    "format_batch_size",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModshiftConfig {
    /// Marks a deep import into a package's build output
    pub delimiter: String,
    /// Root under which package entry files are looked up
    pub modules_store: PathBuf,
    /// Directory segment dropped from derived import names
    pub build_dir: String,
    /// File extensions picked up when traversing a directory
    pub extensions: Vec<String>,
    /// Directory names never descended into
    pub exclude_dirs: Vec<String>,
    /// Formatter command line; file paths are appended
    pub formatter: Vec<String>,
    /// Files handed to one formatter invocation
    pub format_batch_size: usize,
}

impl Default for ModshiftConfig {
    fn default() -> Self {
        Self {
            delimiter: "/dist".to_string(),
            modules_store: PathBuf::from("node_modules"),
            build_dir: "dist".to_string(),
            extensions: vec!["ts".to_string(), "tsx".to_string()],
            exclude_dirs: vec!["dist".to_string(), "node_modules".to_string()],
            formatter: ["pnpm", "exec", "prettier", "--write"]
                .map(String::from)
                .to_vec(),
            format_batch_size: 350,
        }
    }
}

/// Values given as command-line flags. Unset flags leave lower layers alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delimiter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modules_store: Option<PathBuf>,
}

impl ModshiftConfig {
    /// Load configuration from defaults, the config file, the environment and
    /// `overrides`, in increasing priority.
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            Some(path) => Some(path.to_path_buf()),
            None => {
                let default_path = Path::new(CONFIG_FILE);
                default_path.is_file().then(|| default_path.to_path_buf())
            }
        };

        if let Some(path) = &config_file {
            debug!(path = %path.display(), "reading config file");
            figment = figment.merge(Toml::file(path));
        }

        figment = figment
            .merge(Env::prefixed(ENV_PREFIX).only(KEYS))
            .merge(Serialized::defaults(overrides));

        let config: Self = figment.extract().map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delimiter.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "delimiter".to_string(),
                value: "\"\"".to_string(),
                hint: "Use a non-empty path fragment such as /dist".to_string(),
            });
        }
        if self.format_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "format_batch_size".to_string(),
                value: "0".to_string(),
                hint: "Use a positive number of files per formatter run".to_string(),
            });
        }
        if self.extensions.iter().any(|ext| ext.is_empty() || ext.starts_with('.')) {
            return Err(ConfigError::InvalidValue {
                field: "extensions".to_string(),
                value: format!("{:?}", self.extensions),
                hint: "List extensions without the leading dot, e.g. [\"ts\", \"tsx\"]".to_string(),
            });
        }
        Ok(())
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            delimiter: self.delimiter.clone(),
            modules_store: self.modules_store.clone(),
            build_dir: self.build_dir.clone(),
        }
    }
}
