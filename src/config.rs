use config::{Config, ConfigError, Environment, File};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;

/// Absolute drift (native units) between the persisted capital and the
/// observed on-chain total above which the ledger is corrected.
pub const DRIFT_THRESHOLD: Decimal = dec!(0.1);

/// Hard ceiling on a single trade execution call.
pub const EXECUTION_TIMEOUT_SECS: u64 = 90;

/// Floor applied to any caller-supplied evaluation interval.
pub const MIN_INTERVAL_FLOOR_MS: u64 = 60_000;

/// Maximum number of tokens considered in one cycle.
pub const MAX_UNIVERSE_TOKENS: usize = 10;

/// How many default-list tokens to fall back to when discovery and the
/// caller both provide nothing.
pub const FALLBACK_TOKEN_SLICE: usize = 5;

/// Maximum diversity tokens sampled from the secondary registry.
pub const MAX_DIVERSITY_TOKENS: usize = 3;

/// Slippage applied when an agent does not configure its own.
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Per-agent cooldown between evaluations in milliseconds
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Re-trigger the next cycle automatically after each one completes
    #[serde(default)]
    pub auto_loop: bool,
    /// Delay between self-triggered cycles in milliseconds
    #[serde(default = "default_loop_delay_ms")]
    pub loop_delay_ms: u64,
    /// Capital drift above which the ledger is rewritten (native units)
    #[serde(default = "default_drift_threshold")]
    pub drift_threshold: Decimal,
    /// Hard timeout on a single trade execution call
    #[serde(default = "default_execution_timeout_secs")]
    pub execution_timeout_secs: u64,
    /// Token addresses used when discovery and the caller provide nothing
    #[serde(default = "default_tokens")]
    pub default_tokens: Vec<String>,
    /// Secondary registry sampled for venue/router diversity
    #[serde(default = "default_diversity_tokens")]
    pub diversity_tokens: Vec<String>,
}

fn default_min_interval_ms() -> u64 {
    300_000
}

fn default_loop_delay_ms() -> u64 {
    300_000
}

fn default_drift_threshold() -> Decimal {
    DRIFT_THRESHOLD
}

fn default_execution_timeout_secs() -> u64 {
    EXECUTION_TIMEOUT_SECS
}

fn default_tokens() -> Vec<String> {
    [
        "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", // WETH
        "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", // USDC
        "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", // WBTC
        "0x6B175474E89094C44Da98b954EedeAC495271d0F", // DAI
        "0x514910771AF9Ca656af840dff83E8264EcF986CA", // LINK
        "0x1f9840a85d5aF5bf1D1762F925BDADdC4201F984", // UNI
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_diversity_tokens() -> Vec<String> {
    [
        "0x7Fc66500c84A76Ad7e9c93437bFc5Ac33E2DDaE9", // AAVE
        "0xD533a949740bb3306d119CC777fa900bA034cd52", // CRV
        "0x9f8F72aA9304c8B593d555F12eF6589cC3A579A2", // MKR
        "0xC011a73ee8576Fb46F5E1c5751cA3B9Fe0af2a6F", // SNX
        "0xc00e94Cb662C3520282E6f5717214004A7f26888", // COMP
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            auto_loop: false,
            loop_delay_ms: default_loop_delay_ms(),
            drift_threshold: DRIFT_THRESHOLD,
            execution_timeout_secs: EXECUTION_TIMEOUT_SECS,
            default_tokens: default_tokens(),
            diversity_tokens: default_diversity_tokens(),
        }
    }
}

impl SchedulerConfig {
    /// Effective evaluation interval for a cycle, clamped to the floor.
    pub fn effective_interval_ms(&self, requested: Option<u64>) -> u64 {
        requested
            .unwrap_or(self.min_interval_ms)
            .max(MIN_INTERVAL_FLOOR_MS)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            // Start with default values
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .set_default("scheduler.min_interval_ms", default_min_interval_ms())?
            .set_default("scheduler.auto_loop", false)?
            .set_default("scheduler.loop_delay_ms", default_loop_delay_ms())?
            // Load default config file
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Load environment-specific config (e.g., config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("STEWARD_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // Override with environment variables (STEWARD_SCHEDULER__MIN_INTERVAL_MS, etc.)
            .add_source(
                Environment::with_prefix("STEWARD")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.scheduler.min_interval_ms < MIN_INTERVAL_FLOOR_MS {
            errors.push(format!(
                "min_interval_ms {} is below the {}ms floor",
                self.scheduler.min_interval_ms, MIN_INTERVAL_FLOOR_MS
            ));
        }

        if self.scheduler.loop_delay_ms == 0 {
            errors.push("loop_delay_ms must be positive".to_string());
        }

        if self.scheduler.drift_threshold < Decimal::ZERO {
            errors.push("drift_threshold must be non-negative".to_string());
        }

        if self.scheduler.execution_timeout_secs == 0 {
            errors.push("execution_timeout_secs must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
