use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";
pub const DEFAULT_PROCEED_MODEL: &str = "proceed_to_mediation.model.json";
pub const DEFAULT_SETTLED_MODEL: &str = "settled_given_mediation.model.json";
pub const DEFAULT_INTAKE_ENCODER: &str = "intake.encoder.json";
pub const DEFAULT_DISPUTE_ENCODER: &str = "dispute.encoder.json";

/// Distinguishes runtime behavior for different stages of the service.
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

/// Top-level configuration for the predictor service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub artifacts: ArtifactConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let artifacts = ArtifactConfig {
            dir: env_path("APP_ARTIFACT_DIR", DEFAULT_ARTIFACT_DIR)?,
            proceed_model: env_path("APP_PROCEED_MODEL", DEFAULT_PROCEED_MODEL)?,
            settled_model: env_path("APP_SETTLED_MODEL", DEFAULT_SETTLED_MODEL)?,
            intake_encoder: env_path("APP_INTAKE_ENCODER", DEFAULT_INTAKE_ENCODER)?,
            dispute_encoder: env_path("APP_DISPUTE_ENCODER", DEFAULT_DISPUTE_ENCODER)?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            artifacts,
        })
    }
}

fn env_path(key: &'static str, default: &str) -> Result<PathBuf, ConfigError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyPath { key }),
        Ok(value) => Ok(PathBuf::from(value.trim())),
        Err(_) => Ok(PathBuf::from(default)),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Log filter directive handed to the fmt subscriber.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Where the four serialized artifacts live.
///
/// Model and encoder entries may be bare file names, relative paths, or
/// absolute paths; anything relative is resolved against `dir`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub proceed_model: PathBuf,
    pub settled_model: PathBuf,
    pub intake_encoder: PathBuf,
    pub dispute_encoder: PathBuf,
}

impl ArtifactConfig {
    /// Default file names rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            proceed_model: PathBuf::from(DEFAULT_PROCEED_MODEL),
            settled_model: PathBuf::from(DEFAULT_SETTLED_MODEL),
            intake_encoder: PathBuf::from(DEFAULT_INTAKE_ENCODER),
            dispute_encoder: PathBuf::from(DEFAULT_DISPUTE_ENCODER),
        }
    }

    pub fn proceed_model_path(&self) -> PathBuf {
        self.resolve(&self.proceed_model)
    }

    pub fn settled_model_path(&self) -> PathBuf {
        self.resolve(&self.settled_model)
    }

    pub fn intake_encoder_path(&self) -> PathBuf {
        self.resolve(&self.intake_encoder)
    }

    pub fn dispute_encoder_path(&self) -> PathBuf {
        self.resolve(&self.dispute_encoder)
    }

    fn resolve(&self, entry: &Path) -> PathBuf {
        if entry.is_absolute() {
            entry.to_path_buf()
        } else {
            self.dir.join(entry)
        }
    }
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_ARTIFACT_DIR)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyPath { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyPath { key } => write!(f, "{key} must not be empty when set"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::EmptyPath { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
