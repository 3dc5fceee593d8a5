//! Environment configuration for the relay server and the chat client

use crate::llm::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Relay listens here unless `TRAVELPAL_PORT` says otherwise
pub const DEFAULT_PORT: u16 = 5000;

/// Where the chat client expects the relay
pub const DEFAULT_RELAY_URL: &str = "http://localhost:5000";

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 60;

/// Configuration for the relay server
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Upstream API key; empty when unset
    pub api_key: String,
    pub model: String,
    /// Upstream base URL (`LLM_GATEWAY` overrides the Groq default)
    pub base_url: String,
    pub upstream_timeout: Duration,
    pub port: u16,
}

impl RelayConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_key: lookup("GROQ_API_KEY").unwrap_or_default(),
            model: non_empty(lookup("GROQ_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: non_empty(lookup("LLM_GATEWAY"))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            upstream_timeout: Duration::from_secs(parse_or(
                &lookup,
                "GROQ_TIMEOUT_SECS",
                DEFAULT_UPSTREAM_TIMEOUT_SECS,
            )),
            port: parse_or(&lookup, "TRAVELPAL_PORT", DEFAULT_PORT),
        }
    }

    #[must_use]
    pub fn has_api_key(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Configuration for the terminal chat client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub relay_url: String,
    pub log_path: PathBuf,
}

impl ClientConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            relay_url: non_empty(lookup("TRAVELPAL_RELAY_URL"))
                .unwrap_or_else(|| DEFAULT_RELAY_URL.to_string()),
            log_path: non_empty(lookup("TRAVELPAL_CHAT_LOG"))
                .map_or_else(|| std::env::temp_dir().join("travelpal-chat.log"), PathBuf::from),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!(key, value = %raw, error = %e, default = %default, "Invalid value, using default");
            default
        }),
        None => default,
    }
}
