//! CLI configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use stp_core::config::DEFAULT_PROFILES_TABLE;
use stp_core::BackendConfig;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Hosted backend URL.
    pub backend_url: Option<String>,

    /// Hosted backend public API key.
    pub anon_key: Option<String>,

    /// Table holding profile rows.
    #[serde(default = "default_profiles_table")]
    pub profiles_table: String,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
}

fn default_profiles_table() -> String {
    DEFAULT_PROFILES_TABLE.to_string()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            anon_key: None,
            profiles_table: default_profiles_table(),
            timeout_secs: None,
            output_format: OutputFormat::default(),
        }
    }
}

impl CliConfig {
    /// Loads configuration from the default file.
    pub fn load() -> crate::CliResult<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from a file, falling back to defaults if it
    /// does not exist.
    pub fn load_from(path: &Path) -> crate::CliResult<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content).map_err(|e| {
                crate::CliError::Config(format!("failed to parse config: {e}"))
            })?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to the default file.
    pub fn save(&self) -> crate::CliResult<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves configuration to a file.
    pub fn save_to(&self, path: &Path) -> crate::CliResult<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::CliError::Config(format!("failed to serialize config: {e}"))
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Gets the configuration file path.
    pub fn config_path() -> crate::CliResult<PathBuf> {
        let home = dirs_next::home_dir()
            .ok_or_else(|| crate::CliError::Config("could not determine home directory".to_string()))?;
        Ok(home.join(".stp").join("stp.toml"))
    }

    /// Builds the backend settings, preferring command-line overrides.
    pub fn backend(
        &self,
        url_override: Option<&str>,
        key_override: Option<&str>,
    ) -> crate::CliResult<BackendConfig> {
        let url = url_override
            .map(str::to_string)
            .or_else(|| self.backend_url.clone())
            .ok_or_else(|| {
                crate::CliError::Config(
                    "no backend URL; pass --backend-url or run `stp config set backend_url <url>`"
                        .to_string(),
                )
            })?;
        let key = key_override
            .map(str::to_string)
            .or_else(|| self.anon_key.clone())
            .unwrap_or_default();

        let mut backend = BackendConfig::new(url, key).with_profiles_table(&self.profiles_table);
        if let Some(secs) = self.timeout_secs {
            backend = backend.with_timeout_secs(secs);
        }
        backend.validate()?;
        Ok(backend)
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON format.
    Json,
    /// Quiet (minimal output).
    Quiet,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "quiet" => Ok(Self::Quiet),
            _ => Err(crate::CliError::InvalidArgument(format!(
                "Unknown output format: {s}. Supported: table, json, quiet"
            ))),
        }
    }
}
