use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

/// Distinguishes runtime behavior for different stages of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the dashboard.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub data: DataConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let data = DataConfig {
            vendor_data_path: optional_path("VENDOR_DATA_PATH")?,
            thresholds_path: optional_path("VENDOR_THRESHOLDS_PATH")?,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            data,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

fn optional_path(var: &'static str) -> Result<Option<PathBuf>, ConfigError> {
    match env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { var }),
        Ok(value) => {
            let path = PathBuf::from(value.trim());
            if path.is_file() {
                Ok(Some(path))
            } else {
                Err(ConfigError::MissingFile { var, path })
            }
        }
        Err(_) => Ok(None),
    }
}

/// Where vendor data and threshold overrides come from. `None` selects the
/// bundled sample and the standard threshold table.
#[derive(Debug, Clone, Default)]
pub struct DataConfig {
    pub vendor_data_path: Option<PathBuf>,
    pub thresholds_path: Option<PathBuf>,
}

impl DataConfig {
    /// Command-line path takes precedence over the environment.
    pub fn with_vendor_data(mut self, path: Option<&Path>) -> Self {
        if let Some(path) = path {
            self.vendor_data_path = Some(path.to_path_buf());
        }
        self
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    EmptyPath { var: &'static str },
    MissingFile { var: &'static str, path: PathBuf },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyPath { var } => write!(f, "{var} is set but empty"),
            ConfigError::MissingFile { var, path } => {
                write!(f, "{var} points to {} which is not a file", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("VENDOR_DATA_PATH");
        env::remove_var("VENDOR_THRESHOLDS_PATH");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert!(config.data.vendor_data_path.is_none());
        assert!(config.data.thresholds_path.is_none());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn accepts_existing_data_file() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let sample = concat!(env!("CARGO_MANIFEST_DIR"), "/data/sample_vendors.json");
        env::set_var("VENDOR_DATA_PATH", sample);
        env::set_var("APP_ENV", "prod");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.data.vendor_data_path, Some(PathBuf::from(sample)));
        reset_env();
    }

    #[test]
    fn rejects_blank_and_missing_paths() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("VENDOR_THRESHOLDS_PATH", "  ");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::EmptyPath {
                var: "VENDOR_THRESHOLDS_PATH"
            })
        ));

        reset_env();
        env::set_var("VENDOR_DATA_PATH", "/nonexistent/vendors.json");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::MissingFile {
                var: "VENDOR_DATA_PATH",
                ..
            })
        ));
        reset_env();
    }

    #[test]
    fn cli_path_overrides_environment() {
        let data = DataConfig {
            vendor_data_path: Some(PathBuf::from("from-env.json")),
            thresholds_path: None,
        };
        let data = data.with_vendor_data(Some(Path::new("from-cli.json")));
        assert_eq!(data.vendor_data_path, Some(PathBuf::from("from-cli.json")));
        assert_eq!(
            DataConfig::default().with_vendor_data(None).vendor_data_path,
            None
        );
    }
}
