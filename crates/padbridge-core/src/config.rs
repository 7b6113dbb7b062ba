//! Configuration module
//!
//! Environment-driven settings for the bridge service: server, security,
//! feature flags, the editor location and the file store.

use std::env;

use crate::storage_types::StorageBackend;

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_DOCUMENT_SIZE_MB: usize = 50;
const EDITOR_POLL_INTERVAL_MS: u64 = 100;
const EDITOR_LOAD_TIMEOUT_MS: u64 = 10_000;
const PUBLIC_BASE_URL: &str = "http://localhost:3000/";
const LOCAL_STORAGE_PATH: &str = "./data/files";

/// Base configuration shared by every binary
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub jwt_secret: String,
    pub environment: String,
}

/// Bridge configuration
#[derive(Clone, Debug)]
pub struct BridgeConfig {
    pub base: BaseConfig,
    /// Public URL of this service, used as the import URL prefix. Always ends with `/`.
    pub public_base_url: String,
    /// Editor base URL, trimmed. Empty means the editor package is missing.
    pub cryptpad_base_url: String,
    pub feature_cryptpad_docs: bool,
    pub feature_file_galleries: bool,
    pub anonymous_can_view: bool,
    pub storage_backend: StorageBackend,
    pub local_storage_path: String,
    pub max_document_size_bytes: usize,
    pub editor_poll_interval_ms: u64,
    pub editor_load_timeout_ms: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<BridgeConfig>);

impl Config {
    pub fn new(config: BridgeConfig) -> Self {
        Config(Box::new(config))
    }

    fn as_bridge(&self) -> &BridgeConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_bridge().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        let config = BridgeConfig::from_lookup(|key| env::var(key).ok())?;
        Ok(Config::new(config))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_bridge().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_bridge().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_bridge().base.jwt_secret
    }

    pub fn environment(&self) -> &str {
        &self.as_bridge().base.environment
    }

    pub fn public_base_url(&self) -> &str {
        &self.as_bridge().public_base_url
    }

    /// Editor base URL, if one is configured.
    pub fn cryptpad_base_url(&self) -> Option<&str> {
        let url = self.as_bridge().cryptpad_base_url.as_str();
        if url.is_empty() {
            None
        } else {
            Some(url)
        }
    }

    pub fn feature_cryptpad_docs(&self) -> bool {
        self.as_bridge().feature_cryptpad_docs
    }

    pub fn feature_file_galleries(&self) -> bool {
        self.as_bridge().feature_file_galleries
    }

    pub fn anonymous_can_view(&self) -> bool {
        self.as_bridge().anonymous_can_view
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_bridge().storage_backend
    }

    pub fn local_storage_path(&self) -> &str {
        &self.as_bridge().local_storage_path
    }

    pub fn max_document_size_bytes(&self) -> usize {
        self.as_bridge().max_document_size_bytes
    }

    pub fn editor_poll_interval_ms(&self) -> u64 {
        self.as_bridge().editor_poll_interval_ms
    }

    pub fn editor_load_timeout_ms(&self) -> u64 {
        self.as_bridge().editor_load_timeout_ms
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    match value {
        Some(v) => match v.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => true,
            "0" | "false" | "no" | "n" | "off" => false,
            _ => default,
        },
        None => default,
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

impl BridgeConfig {
    /// Build the configuration from a key lookup (the process environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .or_else(|| lookup("APP_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let base = BaseConfig {
            server_port: parse_or(lookup("SERVER_PORT"), SERVER_PORT),
            jwt_secret: lookup("JWT_SECRET")
                .ok_or_else(|| anyhow::anyhow!("JWT_SECRET must be set for token signing"))?,
            environment,
        };

        let mut public_base_url = lookup("PUBLIC_BASE_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| PUBLIC_BASE_URL.to_string());
        if !public_base_url.ends_with('/') {
            public_base_url.push('/');
        }

        let max_document_size_mb: usize =
            parse_or(lookup("MAX_DOCUMENT_SIZE_MB"), MAX_DOCUMENT_SIZE_MB);
        let max_document_size_bytes = max_document_size_mb
            .checked_mul(1024 * 1024)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "MAX_DOCUMENT_SIZE_MB={} does not fit in memory",
                    max_document_size_mb
                )
            })?;

        let storage_backend = match lookup("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::Local,
        };

        Ok(BridgeConfig {
            base,
            public_base_url,
            cryptpad_base_url: lookup("CRYPTPAD_BASE_URL")
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
            feature_cryptpad_docs: parse_bool(lookup("FEATURE_CRYPTPAD_DOCS"), true),
            feature_file_galleries: parse_bool(lookup("FEATURE_FILE_GALLERIES"), true),
            anonymous_can_view: parse_bool(lookup("ANONYMOUS_CAN_VIEW"), false),
            storage_backend,
            local_storage_path: lookup("LOCAL_STORAGE_PATH")
                .unwrap_or_else(|| LOCAL_STORAGE_PATH.to_string()),
            max_document_size_bytes,
            editor_poll_interval_ms: parse_or(
                lookup("EDITOR_POLL_INTERVAL_MS"),
                EDITOR_POLL_INTERVAL_MS,
            ),
            editor_load_timeout_ms: parse_or(
                lookup("EDITOR_LOAD_TIMEOUT_MS"),
                EDITOR_LOAD_TIMEOUT_MS,
            ),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.public_base_url.starts_with("http://")
            && !self.public_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "PUBLIC_BASE_URL must be an absolute http(s) URL"
            ));
        }

        if !self.cryptpad_base_url.is_empty()
            && !self.cryptpad_base_url.starts_with("http://")
            && !self.cryptpad_base_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "CRYPTPAD_BASE_URL must be an absolute http(s) URL"
            ));
        }

        if self.editor_poll_interval_ms == 0
            || self.editor_load_timeout_ms < self.editor_poll_interval_ms
        {
            return Err(anyhow::anyhow!(
                "EDITOR_LOAD_TIMEOUT_MS must be at least EDITOR_POLL_INTERVAL_MS, which must be positive"
            ));
        }

        if self.max_document_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_DOCUMENT_SIZE_MB must be positive"));
        }

        Ok(())
    }
}
