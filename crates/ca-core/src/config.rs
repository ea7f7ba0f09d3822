//! Environment lookup helpers shared by the per-crate `*Config::from_env`
//! constructors

use std::env;
use std::str::FromStr;

use crate::{Error, Result};

/// Read an environment variable, treating empty values as unset
pub fn env_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// Parse `key` from `lookup`, falling back to `default` when it is absent
pub fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse::<T>().map_err(|e| {
            Error::Configuration(format!("{} has invalid value '{}': {}", key, raw, e))
        }),
        None => Ok(default),
    }
}

/// Parse a boolean flag the way `.env` files usually spell them
pub fn parse_flag<F>(lookup: &F, key: &str, default: bool) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(Error::Configuration(format!(
                "{} has invalid boolean value '{}'",
                key, raw
            ))),
        },
        None => Ok(default),
    }
}
