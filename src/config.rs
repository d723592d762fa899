use std::env;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use crate::error::{AppError, Result};

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: SocketAddr,
    /// Upper bound on a single page fetch, body included.
    pub fetch_timeout: Duration,
    pub connect_timeout: Duration,
    /// Upper bound on one whole analysis request.
    pub request_timeout: Duration,
    /// Size of the ranked top list.
    pub top_n: usize,
    /// How much of the extracted page text is echoed back.
    pub text_preview_chars: usize,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            fetch_timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            top_n: 20,
            text_preview_chars: 2000,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load environment variables from .env file if it exists
        dotenv::dotenv().ok();

        let defaults = Config::default();

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let ip = IpAddr::from_str(&host)
            .map_err(|e| AppError::ConfigError(format!("Invalid host address: {}", e)))?;
        let port = parse_var("PORT", defaults.server_addr.port())?;

        let user_agent = match env::var("USER_AGENT") {
            Ok(ua) if !ua.trim().is_empty() => ua,
            _ => defaults.user_agent,
        };

        let top_n = parse_var("TOP_N", defaults.top_n)?;
        if top_n == 0 {
            return Err(AppError::ConfigError("TOP_N must be at least 1".to_string()));
        }

        Ok(Config {
            server_addr: SocketAddr::new(ip, port),
            fetch_timeout: secs_var("FETCH_TIMEOUT_SECS", defaults.fetch_timeout)?,
            connect_timeout: secs_var("CONNECT_TIMEOUT_SECS", defaults.connect_timeout)?,
            request_timeout: secs_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout)?,
            top_n,
            text_preview_chars: parse_var("TEXT_PREVIEW_CHARS", defaults.text_preview_chars)?,
            user_agent,
        })
    }
}

fn parse_var<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| AppError::ConfigError(format!("Invalid {}: {}", key, e))),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(AppError::ConfigError(format!("Invalid {}: {}", key, e))),
    }
}

fn secs_var(key: &str, default: Duration) -> Result<Duration> {
    let secs = parse_var(key, default.as_secs())?;
    if secs == 0 {
        return Err(AppError::ConfigError(format!("{} must be at least 1 second", key)));
    }
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bound_the_fetch() {
        let config = Config::default();
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.top_n, 20);
        assert!(config.user_agent.starts_with("wordfreq-charts/"));
    }

    #[test]
    fn missing_variable_falls_back_to_default() {
        let value = parse_var("WORDFREQ_CHARTS_TEST_UNSET_KEY", 7usize).unwrap();
        assert_eq!(value, 7);
    }
}
