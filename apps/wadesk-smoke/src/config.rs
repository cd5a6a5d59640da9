//! Environment-backed runtime configuration for `wadesk-smoke`.

use std::{env, error::Error, fmt};

use session_core::DEFAULT_MESSAGE_FETCH_LIMIT;

const DEFAULT_EVENT_BUFFER: usize = 16;

/// Runtime configuration used by the smoke binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmokeConfig {
    /// Bounded count for message history fetches.
    pub message_fetch_limit: u16,
    /// Buffer size of the bridge event channel.
    pub event_buffer: usize,
}

impl SmokeConfig {
    /// Parse configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(mut lookup: F) -> Result<Self, ConfigError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let message_fetch_limit = parse_optional_u16(
            "WADESK_MESSAGE_FETCH_LIMIT",
            DEFAULT_MESSAGE_FETCH_LIMIT,
            &mut lookup,
        )?;
        let event_buffer =
            parse_optional_usize("WADESK_SMOKE_EVENT_BUFFER", DEFAULT_EVENT_BUFFER, &mut lookup)?;

        if message_fetch_limit == 0 {
            return Err(ConfigError::InvalidValue {
                key: "WADESK_MESSAGE_FETCH_LIMIT",
                value: "0".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        Ok(Self {
            message_fetch_limit,
            event_buffer,
        })
    }
}

/// Errors produced while parsing runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment value failed validation or parsing.
    InvalidValue {
        /// Environment key.
        key: &'static str,
        /// Raw rejected value.
        value: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue { key, value, reason } => {
                write!(f, "invalid value '{value}' for {key}: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

fn parse_optional_u16<F>(
    key: &'static str,
    default: u16,
    lookup: &mut F,
) -> Result<u16, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value,
            reason: "expected an unsigned 16-bit integer".to_owned(),
        }),
    }
}

fn parse_optional_usize<F>(
    key: &'static str,
    default: usize,
    lookup: &mut F,
) -> Result<usize, ConfigError>
where
    F: FnMut(&str) -> Option<String>,
{
    match lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty()) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key,
            value,
            reason: "expected an unsigned integer".to_owned(),
        }),
    }
}
