use std::{env, fmt::Display, str::FromStr};

use log::{info, warn};

use crate::constants::{DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS, DEFAULT_SESSION_SECRET};

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub session_secret: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            database_url: try_load("DATABASE_URL", DEFAULT_DATABASE_URL),
            max_connections: try_load("DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS),
            session_secret: try_load("SESSION_SECRET", DEFAULT_SESSION_SECRET),
        }
    }

    /// A private, single connection database that lives as long as the pool.
    pub fn in_memory() -> Self {
        Self {
            database_url: String::from("sqlite::memory:"),
            max_connections: 1,
            session_secret: String::from(DEFAULT_SESSION_SECRET),
        }
    }
}

fn try_load<T, D>(key: &str, default: D) -> T
where
    T: FromStr + From<D>,
    T::Err: Display,
    D: Display,
{
    match env::var(key) {
        Ok(value) => value.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value ({e}), using default: {default}");
            T::from(default)
        }),
        Err(_) => {
            info!("{key} not set, using default: {default}");
            T::from(default)
        }
    }
}
