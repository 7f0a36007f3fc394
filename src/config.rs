use std::{env, fmt, net::IpAddr, time::Duration};

use crate::error::AppError;

#[derive(Clone)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    pub app_env: AppEnv,
    pub price_api_url: String,
    pub price_api_timeout: Duration,
    pub request_timeout: Duration,
    pub api_key: String,
    pub database_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEnv {
    Development,
    Production,
    Test,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup, so tests need not touch the process env.
    pub fn from_source<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.into());

        // Server config
        let port = var("PORT", "8080")
            .parse::<u16>()
            .map_err(|_| AppError::ConfigError("Invalid PORT".into()))?;

        let host = var("HOST", "0.0.0.0")
            .parse::<IpAddr>()
            .map_err(|_| AppError::ConfigError("Invalid HOST".into()))?;

        let app_env = match var("APP_ENV", "development").to_lowercase().as_str() {
            "production" => AppEnv::Production,
            "test" => AppEnv::Test,
            _ => AppEnv::Development,
        };

        let request_timeout = parse_duration(&var("REQUEST_TIMEOUT", "30s"))
            .map_err(|_| AppError::ConfigError("Invalid REQUEST_TIMEOUT format".into()))?;

        // Upstream config
        let price_api_url = var("PRICE_API_URL", "http://localhost:8081");

        let price_api_timeout = parse_duration(&var("PRICE_API_TIMEOUT", "10s"))
            .map_err(|_| AppError::ConfigError("Invalid PRICE_API_TIMEOUT format".into()))?;

        // Carried for deployment parity, not read by the gateway
        let api_key = var("API_KEY", "");
        let database_url = var("DATABASE_URL", "");

        Ok(Self {
            port,
            host,
            app_env,
            price_api_url,
            price_api_timeout,
            request_timeout,
            api_key,
            database_url,
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("host", &self.host)
            .field("app_env", &self.app_env)
            .field("price_api_url", &self.price_api_url)
            .field("price_api_timeout", &self.price_api_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("api_key", &"<redacted>")
            .field("database_url", &"<redacted>")
            .finish()
    }
}

fn parse_duration(duration_str: &str) -> Result<Duration, &'static str> {
    let duration_str = duration_str.trim();

    if duration_str.is_empty() {
        return Err("Duration string is empty");
    }

    // Extract the number and unit parts
    let len = duration_str.len();
    let (num_part, unit_part) = duration_str.split_at(
        duration_str
            .chars()
            .position(|c| !c.is_ascii_digit())
            .unwrap_or(len),
    );

    let num = num_part.parse::<u64>().map_err(|_| "Invalid number")?;

    if num == 0 {
        return Err("Duration must be greater than zero");
    }

    match unit_part {
        "ms" => Ok(Duration::from_millis(num)),
        "s" => Ok(Duration::from_secs(num)),
        "m" => num
            .checked_mul(60)
            .map(Duration::from_secs)
            .ok_or("Duration is too large"),
        _ => Err("Unknown time unit, use ms, s, or m"),
    }
}
