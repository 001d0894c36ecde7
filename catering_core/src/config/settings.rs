use crate::booking::GuestMinimums;
use crate::pricing::PriceList;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub rate_limit: RateLimitConfig,
    pub sink: SinkConfig,
    pub booking: BookingConfig,
    pub pricing: PriceList,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enable: bool,
    pub max_requests: usize,
    pub window_seconds: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Memory,
    Sqlite,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SinkConfig {
    pub kind: SinkKind,
    pub database_url: String,
    pub endpoint: String,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingConfig {
    pub guest_minimums: GuestMinimums,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_requests: 20,
            window_seconds: 60,
        }
    }
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            kind: SinkKind::Memory,
            database_url: "sqlite:./bookings.db?mode=rwc".to_string(),
            endpoint: String::new(),
            timeout_seconds: 10,
        }
    }
}

impl AppConfig {
    /// Defaults, then `config.toml` if present, then `APP__SECTION__KEY`
    /// environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        let minimums = &self.booking.guest_minimums;
        if minimums.pizza == 0 || minimums.bar == 0 {
            return Err(ConfigError::Message(
                "Pizza and bar guest minimums must be at least 1".to_string(),
            ));
        }

        match self.sink.kind {
            SinkKind::Sqlite if self.sink.database_url.is_empty() => {
                return Err(ConfigError::Message(
                    "Database URL cannot be empty for the sqlite sink".to_string(),
                ));
            }
            SinkKind::Http if self.sink.endpoint.is_empty() => {
                return Err(ConfigError::Message(
                    "Endpoint cannot be empty for the http sink".to_string(),
                ));
            }
            _ => {}
        }

        if self.sink.timeout_seconds == 0 {
            return Err(ConfigError::Message(
                "Sink timeout must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit.enable && self.rate_limit.window_seconds == 0 {
            return Err(ConfigError::Message(
                "Rate limit window must be greater than 0".to_string(),
            ));
        }

        if self.pricing.deposit_percent > 100 {
            return Err(ConfigError::Message(
                "Deposit percent cannot exceed 100".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.sink.kind, SinkKind::Memory);
        assert_eq!(config.booking.guest_minimums.hog_roast, 50);
        assert_eq!(config.booking.guest_minimums.buffet, 20);
        assert_eq!(config.pricing.hog_roast_per_person, 850);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.booking.guest_minimums.pizza = 0;
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.sink.kind = SinkKind::Http;
        assert!(config.validate().is_err());
        config.sink.endpoint = "https://hooks.example.com/bookings".to_string();
        assert!(config.validate().is_ok());

        config = AppConfig::default();
        config.sink.kind = SinkKind::Sqlite;
        config.sink.database_url = String::new();
        assert!(config.validate().is_err());

        config = AppConfig::default();
        config.rate_limit.window_seconds = 0;
        assert!(config.validate().is_err());
        config.rate_limit.enable = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_bind_address() {
        let mut config = AppConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 8080;
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_sink_kind_names() {
        let kind: SinkKind = serde_json::from_value(serde_json::json!("sqlite")).unwrap();
        assert_eq!(kind, SinkKind::Sqlite);
    }

    #[test]
    fn test_config_loading() {
        let config = AppConfig::load().expect("Should load default configuration");

        assert!(!config.server.host.is_empty());
        assert!(config.server.port > 0);
        assert!(config.booking.guest_minimums.pizza >= 1);
    }
}
