//! Server configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

use jelantah_core::{
    RateSchedule, DEFAULT_CUSTOMER_RATE, DEFAULT_KURIR_RATE, DEFAULT_REFERRAL_RATE,
};

/// Dashboard server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// Load the demo dataset into the empty store at startup
    pub seed_demo: bool,

    /// Object storage endpoint for proof uploads (uploads disabled when unset)
    pub storage_endpoint: Option<String>,

    /// Public base URL for uploaded objects (defaults to the endpoint)
    pub storage_public_base: Option<String>,

    /// Customer payout rate in rupiah per liter
    pub customer_rate: i64,

    /// Kurir fee in rupiah per liter
    pub kurir_rate: i64,

    /// Referral fee in rupiah per liter
    pub referral_rate: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let config = ServerConfig {
            http_port: env::var("JELANTAH_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JELANTAH_PORT".to_string()))?,

            seed_demo: env::var("JELANTAH_SEED_DEMO")
                .unwrap_or_else(|_| "true".to_string())
                .parse()
                .unwrap_or(true),

            storage_endpoint: env::var("JELANTAH_STORAGE_ENDPOINT").ok(),

            storage_public_base: env::var("JELANTAH_STORAGE_PUBLIC_BASE").ok(),

            customer_rate: env::var("JELANTAH_CUSTOMER_RATE")
                .unwrap_or_else(|_| DEFAULT_CUSTOMER_RATE.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JELANTAH_CUSTOMER_RATE".to_string()))?,

            kurir_rate: env::var("JELANTAH_KURIR_RATE")
                .unwrap_or_else(|_| DEFAULT_KURIR_RATE.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JELANTAH_KURIR_RATE".to_string()))?,

            referral_rate: env::var("JELANTAH_REFERRAL_RATE")
                .unwrap_or_else(|_| DEFAULT_REFERRAL_RATE.to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("JELANTAH_REFERRAL_RATE".to_string()))?,
        };

        Ok(config)
    }

    /// Builds the rate schedule bills will derive from.
    pub fn rate_schedule(&self) -> Result<RateSchedule, ConfigError> {
        RateSchedule::flat(self.customer_rate, self.kurir_rate, self.referral_rate)
            .map_err(|e| ConfigError::InvalidRates(e.to_string()))
    }

    /// The public base URL for uploaded objects.
    pub fn public_base(&self) -> Option<&str> {
        self.storage_public_base
            .as_deref()
            .or(self.storage_endpoint.as_deref())
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Invalid rate configuration: {0}")]
    InvalidRates(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schedule_from_defaults() {
        let config = ServerConfig {
            http_port: 8080,
            seed_demo: true,
            storage_endpoint: None,
            storage_public_base: None,
            customer_rate: DEFAULT_CUSTOMER_RATE,
            kurir_rate: DEFAULT_KURIR_RATE,
            referral_rate: DEFAULT_REFERRAL_RATE,
        };

        let schedule = config.rate_schedule().unwrap();
        assert_eq!(schedule.customer_rate(30), 6000);
        assert_eq!(schedule.kurir_rate, 750);
    }

    #[test]
    fn test_bad_rates_rejected() {
        let config = ServerConfig {
            http_port: 8080,
            seed_demo: true,
            storage_endpoint: None,
            storage_public_base: None,
            customer_rate: 0,
            kurir_rate: DEFAULT_KURIR_RATE,
            referral_rate: DEFAULT_REFERRAL_RATE,
        };

        assert!(config.rate_schedule().is_err());
    }

    #[test]
    fn test_public_base_falls_back_to_endpoint() {
        let config = ServerConfig {
            http_port: 8080,
            seed_demo: true,
            storage_endpoint: Some("https://storage.example".to_string()),
            storage_public_base: None,
            customer_rate: DEFAULT_CUSTOMER_RATE,
            kurir_rate: DEFAULT_KURIR_RATE,
            referral_rate: DEFAULT_REFERRAL_RATE,
        };

        assert_eq!(config.public_base(), Some("https://storage.example"));
    }
}
