use serde::Deserialize;
use std::net::SocketAddr;

use domain::models::PlatformConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Seed values for the in-memory platform configuration. Everything here
    /// except the token settings is admin-mutable at runtime.
    pub platform: PlatformSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Secret for HS256 session tokens.
    pub token_secret: String,

    #[serde(default = "default_token_expiry")]
    pub token_expiry_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlatformSettings {
    #[serde(default = "default_platform_name")]
    pub name: String,

    #[serde(default = "default_platform_subtitle")]
    pub subtitle: String,

    /// Default fee percent applied to newly created raffles.
    #[serde(default = "default_fee_percent")]
    pub fee_percent: f64,

    /// PIX key organizers pay platform fees to; empty until configured.
    #[serde(default)]
    pub pix_key: String,

    #[serde(default)]
    pub pix_name: String,

    /// Minimum paid numbers required before a draw is allowed.
    #[serde(default = "default_min_draw_eligible")]
    pub min_draw_eligible: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn default_token_expiry() -> i64 {
    3600
}

fn default_platform_name() -> String {
    "Rifas Online".to_string()
}

fn default_platform_subtitle() -> String {
    "Plataforma de Rifas Digital".to_string()
}

fn default_fee_percent() -> f64 {
    5.0
}

fn default_min_draw_eligible() -> usize {
    2
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::Environment::with_prefix("RIFA").separator("__"))
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(config::ConfigError::Message)?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), String> {
        if self.security.token_secret.len() < 32 {
            return Err("security.token_secret must be at least 32 bytes".into());
        }
        shared::validation::validate_fee_percent(self.platform.fee_percent)
            .map_err(|e| e.to_string())?;
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], self.server.port)))
    }

    /// Builds the initial in-memory platform configuration from the file
    /// config. Admin credential starts unset until first-time setup.
    pub fn platform_config(&self) -> PlatformConfig {
        PlatformConfig {
            name: self.platform.name.clone(),
            subtitle: self.platform.subtitle.clone(),
            fee_percent: self.platform.fee_percent,
            pix_key: self.platform.pix_key.clone(),
            pix_name: self.platform.pix_name.clone(),
            min_draw_eligible: self.platform.min_draw_eligible,
            ..PlatformConfig::default()
        }
    }

    /// Config for tests, built from embedded defaults plus overrides, so no
    /// file system access is needed.
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "127.0.0.1"
            port = 0
            request_timeout_secs = 30

            [logging]
            level = "warn"
            format = "pretty"

            [security]
            cors_origins = []
            token_secret = "test-secret-0123456789-0123456789-ok"
            token_expiry_secs = 3600

            [platform]
            name = "Rifas Online"
            subtitle = "Plataforma de Rifas Digital"
            fee_percent = 5.0
            pix_key = "admin@pix"
            pix_name = "Plataforma"
            min_draw_eligible = 2
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }
}
