use crate::infrastructure::providers::SmtpSettings;
use chrono_tz::Tz;
use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub server_host: String,
    pub server_port: u16,
    pub timezone: Tz,
    pub holiday_api_base_url: String,
    pub holiday_fetch_timeout: Duration,
    pub smtp: Option<SmtpSettings>,
    pub completion_interval: Duration,
    pub otel_exporter_endpoint: Option<String>,
    pub service_name: String,
    pub metrics_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://shelter_walks.db?mode=rwc".to_string());

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPort)?;

        let timezone_name = env::var("TIMEZONE").unwrap_or_else(|_| "Europe/Berlin".to_string());
        let timezone = timezone_name
            .parse::<Tz>()
            .map_err(|_| ConfigError::InvalidTimezone(timezone_name.clone()))?;

        let holiday_api_base_url = env::var("HOLIDAY_API_BASE_URL")
            .unwrap_or_else(|_| "https://feiertage-api.de".to_string());

        let holiday_fetch_timeout = Duration::from_secs(parse_secs("HOLIDAY_FETCH_TIMEOUT_SECS", 5)?);

        let completion_interval = Duration::from_secs(parse_secs("COMPLETION_INTERVAL_SECS", 3600)?);

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) if !host.is_empty() => Some(SmtpSettings {
                host,
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
                from: env::var("SMTP_FROM").map_err(|_| ConfigError::MissingSmtpFrom)?,
            }),
            _ => None,
        };

        let otel_exporter_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();

        let service_name = env::var("SERVICE_NAME").unwrap_or_else(|_| "shelter-walks".to_string());

        let metrics_port = env::var("METRICS_PORT")
            .unwrap_or_else(|_| "9000".to_string())
            .parse()
            .unwrap_or(9000);

        Ok(Config {
            database_url,
            server_host,
            server_port,
            timezone,
            holiday_api_base_url,
            holiday_fetch_timeout,
            smtp,
            completion_interval,
            otel_exporter_endpoint,
            service_name,
            metrics_port,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_secs(name: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(ConfigError::InvalidDuration(name)),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Unknown timezone '{0}'")]
    InvalidTimezone(String),

    #[error("{0} must be a positive number of seconds")]
    InvalidDuration(&'static str),

    #[error("SMTP_FROM must be set when SMTP_HOST is configured")]
    MissingSmtpFrom,
}
