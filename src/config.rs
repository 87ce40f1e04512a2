use crate::client::api::DEFAULT_BASE_URL;
use anyhow::{bail, Context, Result};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => bail!("Unknown environment: {}", s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,

    // Shared API client
    pub api_base_url: String,

    // Payment relay
    pub payload_pretty: bool,
    pub simulator_can_make_payments: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            host: "127.0.0.1".to_string(),
            port: 8787,
            api_base_url: DEFAULT_BASE_URL.to_string(),
            payload_pretty: true,
            simulator_can_make_payments: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let environment = std::env::var("ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .parse()?;

        let config = Self {
            environment,
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse()
                .context("Invalid PORT")?,

            api_base_url: std::env::var("API_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),

            payload_pretty: Self::parse_flag("PAYLOAD_PRETTY", true)?,
            simulator_can_make_payments: Self::parse_flag("SIMULATOR_CAN_MAKE_PAYMENTS", true)?,
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_flag(var: &str, default: bool) -> Result<bool> {
        match std::env::var(var) {
            Ok(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid {} (expected true or false)", var)),
            Err(_) => Ok(default),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            bail!("API_BASE_URL must be HTTP(S) URL");
        }
        if self.port == 0 {
            bail!("PORT must be non-zero");
        }

        tracing::info!(
            "Configuration validated for {:?} environment",
            self.environment
        );

        Ok(())
    }
}
