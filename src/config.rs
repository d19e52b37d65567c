use std::env;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} is not a valid number: {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Runtime configuration, read once at startup from the environment
/// (after `.env` has been loaded).
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_connect_timeout: Duration,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub jwt_ttl: Duration,
    pub cors_origins: Vec<String>,
    pub geolocation_url: String,
    pub static_dir: String,
    pub run_migrations: bool,
}

const DEFAULT_CORS_ORIGINS: &str = "https://vinexpert-management.vercel.app,http://localhost:8080";

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes `std::env`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let database_url = match lookup("DATABASE_URL") {
            Some(url) => url,
            None => {
                let password = var("DB_PASSWORD", "");
                let credentials = if password.is_empty() {
                    var("DB_USER", "root")
                } else {
                    format!("{}:{}", var("DB_USER", "root"), password)
                };
                format!(
                    "mysql://{}@{}:{}/{}",
                    credentials,
                    var("DB_HOST", "localhost"),
                    var("DB_PORT", "3306"),
                    var("DB_NAME", "vinexpert"),
                )
            }
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        Ok(Self {
            database_url,
            db_max_connections: parse_number(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            db_connect_timeout: Duration::from_secs(parse_number(
                &lookup,
                "DB_CONNECT_TIMEOUT_SECS",
                8,
            )?),
            host: var("HOST", "0.0.0.0"),
            port: parse_number(&lookup, "PORT", 5000)?,
            jwt_secret,
            jwt_ttl: Duration::from_secs(parse_number::<u64, _>(&lookup, "JWT_TTL_HOURS", 24)? * 3600),
            cors_origins: var("CORS_ORIGINS", DEFAULT_CORS_ORIGINS)
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            geolocation_url: var("GEOLOCATION_URL", "https://ipapi.co")
                .trim_end_matches('/')
                .to_string(),
            static_dir: var("STATIC_DIR", "./public"),
            run_migrations: var("RUN_MIGRATIONS", "true") != "false",
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_number<T, F>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}
