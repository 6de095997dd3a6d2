use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

pub const DATABASE_URL: &str = "DATABASE_URL";
pub const HOST: &str = "HOST";
pub const PORT: &str = "PORT";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const DATABASE_ACQUIRE_TIMEOUT_SECS: &str = "DATABASE_ACQUIRE_TIMEOUT_SECS";
pub const RUN_MIGRATIONS: &str = "RUN_MIGRATIONS";
pub const LOG_LEVEL: &str = "LOG_LEVEL";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub run_migrations: bool,
    pub log_level: String,
}

impl Config {
    /// Reads the process environment after `.env` has been loaded.
    pub fn from_env() -> Result<Self, Error> {
        let database_url = dotenv::var(DATABASE_URL)?;
        Self::from_lookup(database_url, |key| dotenv::var(key).ok())
    }

    fn from_lookup<F>(database_url: String, lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Config {
            database_url,
            host: lookup(HOST).unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&lookup, PORT, 8000)?,
            max_connections: parse_or(&lookup, DATABASE_MAX_CONNECTIONS, 5)?,
            acquire_timeout: Duration::from_secs(parse_or(&lookup, DATABASE_ACQUIRE_TIMEOUT_SECS, 10)?),
            run_migrations: parse_or(&lookup, RUN_MIGRATIONS, true)?,
            log_level: lookup(LOG_LEVEL).unwrap_or_else(|| "info".into()),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, Error>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("environment variable {} has an invalid value: {:?}", key, raw))),
        None => Ok(default),
    }
}
