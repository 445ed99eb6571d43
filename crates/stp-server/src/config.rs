//! Server configuration.
//!
//! Configuration is loaded from environment variables with sensible defaults.

use std::str::FromStr;
use std::time::Duration;

use stp_core::BackendConfig;
use stp_model::Role;

/// Where sessions and profiles come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// The hosted auth/database service.
    Hosted,
    /// In-process providers seeded from configuration.
    Memory,
}

impl FromStr for BackendMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hosted" => Ok(Self::Hosted),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown backend mode '{other}' (expected hosted or memory)"),
        }
    }
}

/// An account provisioned at startup in memory mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedUser {
    /// Sign-in email.
    pub email: String,
    /// Sign-in password.
    pub password: String,
    /// Profile role.
    pub role: Role,
}

impl SeedUser {
    /// Creates a seed account.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: impl Into<Role>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role: role.into(),
        }
    }
}

/// Parses `email:password:Role` entries separated by commas.
///
/// # Errors
///
/// Returns an error naming the first malformed entry.
pub fn parse_memory_users(raw: &str) -> anyhow::Result<Vec<SeedUser>> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            // Passwords may contain ':'; the email and role may not.
            let parsed = entry
                .split_once(':')
                .and_then(|(email, rest)| Some((email, rest.rsplit_once(':')?)));
            match parsed {
                Some((email, (password, role))) if !email.is_empty() && !role.is_empty() => {
                    Ok(SeedUser::new(email, password, role))
                }
                _ => anyhow::bail!("invalid memory user entry '{entry}' (expected email:password:Role)"),
            }
        })
        .collect()
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host to bind to.
    pub host: String,

    /// Server port.
    pub port: u16,

    /// Backend mode.
    pub backend: BackendMode,

    /// Hosted backend settings; required in hosted mode.
    pub backend_config: Option<BackendConfig>,

    /// Accounts provisioned in memory mode.
    pub memory_users: Vec<SeedUser>,

    /// Lifetime of sessions issued in memory mode.
    pub session_ttl: Duration,

    /// Mark the access token cookie `Secure`.
    pub cookie_secure: bool,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Log level.
    pub log_level: String,
}

impl ServerConfig {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary variable source.
    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let host = var("STP_HOST").unwrap_or(defaults.host);
        let port = match var("STP_PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| anyhow::anyhow!("STP_PORT is not a valid port: {p}"))?,
            None => defaults.port,
        };

        let backend = match var("STP_BACKEND") {
            Some(mode) => mode.parse()?,
            None => defaults.backend,
        };

        let backend_config = match var("STP_BACKEND_URL") {
            Some(url) => {
                let mut config = BackendConfig::new(url, var("STP_BACKEND_ANON_KEY").unwrap_or_default());
                if let Some(table) = var("STP_PROFILES_TABLE") {
                    config = config.with_profiles_table(table);
                }
                if let Some(secs) = var("STP_BACKEND_TIMEOUT_SECS") {
                    let secs = secs.parse().map_err(|_| {
                        anyhow::anyhow!("STP_BACKEND_TIMEOUT_SECS is not a number: {secs}")
                    })?;
                    config = config.with_timeout_secs(secs);
                }
                config.validate()?;
                Some(config)
            }
            None if backend == BackendMode::Hosted => {
                anyhow::bail!("STP_BACKEND_URL environment variable is required in hosted mode")
            }
            None => None,
        };

        let memory_users = match var("STP_MEMORY_USERS") {
            Some(raw) => parse_memory_users(&raw)?,
            None => Vec::new(),
        };

        let session_ttl = var("STP_SESSION_TTL_SECS")
            .and_then(|v| v.parse().ok())
            .map_or(defaults.session_ttl, Duration::from_secs);

        let cookie_secure = var("STP_COOKIE_SECURE")
            .is_some_and(|v| v.eq_ignore_ascii_case("true") || v == "1");

        let cors_origins = var("STP_CORS_ORIGINS")
            .map(|s| s.split(',').map(str::trim).map(String::from).collect())
            .unwrap_or(defaults.cors_origins);

        let log_level = var("RUST_LOG").unwrap_or(defaults.log_level);

        Ok(Self {
            host,
            port,
            backend,
            backend_config,
            memory_users,
            session_ttl,
            cookie_secure,
            cors_origins,
            log_level,
        })
    }

    /// Creates a memory-mode configuration for testing.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Random port
            backend: BackendMode::Memory,
            log_level: "debug".to_string(),
            ..Self::default()
        }
    }

    /// Adds an account provisioned in memory mode.
    #[must_use]
    pub fn with_memory_user(mut self, email: &str, password: &str, role: impl Into<Role>) -> Self {
        self.memory_users.push(SeedUser::new(email, password, role));
        self
    }

    /// Switches to hosted mode against the given backend.
    #[must_use]
    pub fn with_hosted_backend(mut self, config: BackendConfig) -> Self {
        self.backend = BackendMode::Hosted;
        self.backend_config = Some(config);
        self
    }

    /// Returns the bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            backend: BackendMode::Hosted,
            backend_config: None,
            memory_users: Vec::new(),
            session_ttl: Duration::from_secs(3600),
            cookie_secure: false,
            cors_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
        }
    }
}
