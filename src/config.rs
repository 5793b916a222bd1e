use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure for the Calricula workflow client
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct CalriculaConfig {
    /// Backend API settings
    pub api: ApiConfig,
    /// Logging settings
    pub observability: ObservabilityConfig,
    /// Terminal rendering defaults
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the Calricula REST API
    pub base_url: String,
    /// Bearer token (can be set via env var)
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout_ms: u64,
    /// Sustained outbound request rate
    pub requests_per_second: u32,
    /// Burst capacity on top of the sustained rate
    pub burst_capacity: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api".to_string(),
            token: None, // Read from CALRICULA_API_TOKEN when unset
            timeout_ms: 15_000,
            requests_per_second: 10,
            burst_capacity: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set
    pub log_level: String,
    /// Emit JSON log lines instead of human readable ones
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            json_logs: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show step labels on the progress bar
    pub show_labels: bool,
    /// Use the compact linear progress bar
    pub compact: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_labels: true,
            compact: false,
        }
    }
}

impl CalriculaConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration files (calricula.toml, .calricula-rc)
    /// 3. Environment variables (prefixed with CALRICULA_, `__` between sections)
    pub fn load() -> Result<Self> {
        let mut builder = Config::builder();

        if Path::new("calricula.toml").exists() {
            builder = builder.add_source(File::with_name("calricula"));
        }

        if Path::new(".calricula-rc").exists() {
            builder = builder.add_source(File::new(".calricula-rc", config::FileFormat::Toml));
        }

        Self::finish(builder)
    }

    /// Load from an explicit file, still honouring environment overrides.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            anyhow::bail!("Configuration file not found: {}", path.display());
        }

        let builder = Config::builder().add_source(File::from(path));
        Self::finish(builder)
    }

    fn finish(builder: config::ConfigBuilder<config::builder::DefaultState>) -> Result<Self> {
        let builder = builder.add_source(
            Environment::with_prefix("CALRICULA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let mut calricula_config: CalriculaConfig = builder.build()?.try_deserialize()?;

        // Special handling for the API token
        if calricula_config.api.token.is_none() {
            if let Ok(token) = std::env::var("CALRICULA_API_TOKEN") {
                calricula_config.api.token = Some(token);
            }
        }

        calricula_config.validate()?;
        Ok(calricula_config)
    }

    fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            anyhow::bail!("api.base_url must not be empty");
        }
        if self.api.timeout_ms == 0 {
            anyhow::bail!("api.timeout_ms must be greater than zero");
        }
        if self.api.requests_per_second == 0 {
            anyhow::bail!("api.requests_per_second must be greater than zero");
        }
        Ok(())
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::info!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

/// Global configuration instance
static CONFIG: std::sync::LazyLock<Result<CalriculaConfig, anyhow::Error>> =
    std::sync::LazyLock::new(|| {
        // Load .env file first
        let _ = CalriculaConfig::load_env_file();
        CalriculaConfig::load()
    });

/// Get the global configuration
pub fn config() -> Result<&'static CalriculaConfig> {
    CONFIG
        .as_ref()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
}

/// Initialize configuration (called at startup)
pub fn init_config() -> Result<()> {
    let _config = config()?;
    tracing::info!("Configuration loaded successfully");
    Ok(())
}
