use std::{env, net::IpAddr, str::FromStr};

use quest_model::DEFAULT_COLLECTION;
use quest_observe::{LoggerConfig, LoggerFormat, LoggerLevel};
use quest_store::FirestoreConfig;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value '{value}' for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Which document store backs the service.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Memory,
    Firestore(FirestoreConfig),
}

impl StoreConfig {
    pub fn name(&self) -> &'static str {
        match self {
            StoreConfig::Memory => "memory",
            StoreConfig::Firestore(_) => "firestore",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    pub collection: String,
    pub store: StoreConfig,
    pub logger: LoggerConfig,
}

impl ServerConfig {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read settings through `lookup`; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let logger = LoggerConfig {
            level: match get("QUEST_LOG_LEVEL") {
                Some(level) => LoggerLevel::new(level.clone())
                    .map_err(|e| invalid("QUEST_LOG_LEVEL", level, e))?,
                None => LoggerLevel::default(),
            },
            format: parse_or(
                get("QUEST_LOG_FORMAT"),
                "QUEST_LOG_FORMAT",
                LoggerFormat::Text,
            )?,
            ..LoggerConfig::default()
        };

        let store_kind = get("QUEST_STORE").map(|v| v.to_ascii_lowercase());
        let store = match store_kind.as_deref() {
            None | Some("memory") => StoreConfig::Memory,
            Some("firestore") => StoreConfig::Firestore(firestore_config(&get)?),
            Some(other) => {
                return Err(invalid("QUEST_STORE", other, "expected memory|firestore"));
            }
        };

        Ok(Self {
            bind: parse_or(get("QUEST_BIND"), "QUEST_BIND", IpAddr::from([0, 0, 0, 0]))?,
            port: parse_or(get("PORT"), "PORT", 8000)?,
            collection: get("QUEST_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            store,
            logger,
        })
    }
}

fn firestore_config<G>(get: &G) -> Result<FirestoreConfig, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    let project = get("FIRESTORE_PROJECT_ID")
        .ok_or(ConfigError::Missing("FIRESTORE_PROJECT_ID"))?;
    let mut cfg = FirestoreConfig::new(project);

    if let Some(endpoint) = get("FIRESTORE_ENDPOINT") {
        cfg = cfg.with_endpoint(endpoint);
    }
    if let Some(host) = get("FIRESTORE_EMULATOR_HOST") {
        cfg = cfg.with_emulator(&host);
    }
    if let Some(token) = get("FIRESTORE_TOKEN") {
        cfg = cfg.with_token(token);
    }
    if let Some(timeout) = get("FIRESTORE_TIMEOUT_MS") {
        cfg = cfg.with_timeout_ms(parse("FIRESTORE_TIMEOUT_MS", timeout)?);
    }
    Ok(cfg)
}

fn invalid(key: &'static str, value: impl Into<String>, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.into(),
        reason: reason.to_string(),
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| invalid(key, value.clone(), e))
}

fn parse_or<T>(value: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
{
    value.map_or(Ok(default), |v| parse(key, v))
}
