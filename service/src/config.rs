#![allow(dead_code)]

use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::env;
use std::fmt;
use std::path::Path;

/// Top-level service configuration, assembled from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub tigerbeetle: TigerBeetleConfig,
    pub server: ServerConfig,
    pub cache: CacheConfig,
}

/// Database configuration.
#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

/// Custom Debug that redacts the database URL (carries credentials).
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

/// TigerBeetle cluster configuration.
#[derive(Clone, Deserialize)]
pub struct TigerBeetleConfig {
    pub cluster_id: u128,
    /// Comma-separated list of replica addresses, e.g. "3000,3001,3002".
    pub addresses: Vec<String>,
    #[serde(default = "default_tb_timeout_ms")]
    pub call_timeout_ms: u64,
}

impl fmt::Debug for TigerBeetleConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TigerBeetleConfig")
            .field("cluster_id", &self.cluster_id)
            .field("addresses", &self.addresses)
            .field("call_timeout_ms", &self.call_timeout_ms)
            .finish()
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_bind_port")]
    pub port: u16,
}

/// In-process cache configuration (idempotency keys, FX quote locks).
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_idempotency_cache_size")]
    pub idempotency_cache_size: usize,
    #[serde(default = "default_idempotency_ttl_secs")]
    pub idempotency_ttl_secs: u64,
    #[serde(default = "default_quote_cache_size")]
    pub quote_cache_size: usize,
    #[serde(default = "default_quote_ttl_secs")]
    pub quote_ttl_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_tb_timeout_ms() -> u64 {
    5_000
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    8080
}

fn default_idempotency_cache_size() -> usize {
    50_000
}

fn default_idempotency_ttl_secs() -> u64 {
    86_400
}

fn default_quote_cache_size() -> usize {
    10_000
}

fn default_quote_ttl_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables, loading a `.env` file
    /// first if one is present.
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env").or_else(|_| Self::load_from_env())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Self::load_from_env()
    }

    fn load_from_env() -> Result<Self> {
        let database = DatabaseConfig {
            url: env::var("DATABASE_URL")
                .map_err(|_| eyre!("DATABASE_URL environment variable is required"))?,
            max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_max_connections()),
        };

        let tb_cluster_id = env::var("TIGERBEETLE_CLUSTER_ID")
            .map_err(|_| eyre!("TIGERBEETLE_CLUSTER_ID environment variable is required"))?
            .parse()
            .wrap_err("TIGERBEETLE_CLUSTER_ID must be a valid u128")?;

        let tb_addresses_raw = env::var("TIGERBEETLE_ADDRESSES")
            .map_err(|_| eyre!("TIGERBEETLE_ADDRESSES environment variable is required"))?;
        let addresses = parse_addresses(&tb_addresses_raw);
        if addresses.is_empty() {
            return Err(eyre!("TIGERBEETLE_ADDRESSES cannot be empty"));
        }

        let tigerbeetle = TigerBeetleConfig {
            cluster_id: tb_cluster_id,
            addresses,
            call_timeout_ms: env::var("TIGERBEETLE_CALL_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_tb_timeout_ms()),
        };

        let server = ServerConfig {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| default_bind_addr()),
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_bind_port()),
        };

        let cache = CacheConfig {
            idempotency_cache_size: env::var("IDEMPOTENCY_CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_idempotency_cache_size()),
            idempotency_ttl_secs: env::var("IDEMPOTENCY_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_idempotency_ttl_secs()),
            quote_cache_size: env::var("QUOTE_CACHE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_quote_cache_size()),
            quote_ttl_secs: env::var("QUOTE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default_quote_ttl_secs()),
        };

        let config = Config {
            database,
            tigerbeetle,
            server,
            cache,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.database.url.is_empty() {
            return Err(eyre!("database.url cannot be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(eyre!("database.max_connections must be at least 1"));
        }
        if self.tigerbeetle.addresses.is_empty() {
            return Err(eyre!("tigerbeetle.addresses cannot be empty"));
        }
        for addr in &self.tigerbeetle.addresses {
            if addr.is_empty() {
                return Err(eyre!("tigerbeetle.addresses contains an empty entry"));
            }
        }
        if self.server.port == 0 {
            return Err(eyre!("server.port cannot be 0"));
        }
        Ok(())
    }
}

/// Parse a comma-separated list of TigerBeetle replica addresses, trimming
/// whitespace around each entry.
fn parse_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_addresses() {
        let addrs = parse_addresses("3000, 3001,3002");
        assert_eq!(addrs, vec!["3000", "3001", "3002"]);
    }

    #[test]
    fn empty_address_list_rejected_by_parse() {
        assert!(parse_addresses("").is_empty());
    }

    fn sample_config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgres://localhost/kovra".to_string(),
                max_connections: 10,
            },
            tigerbeetle: TigerBeetleConfig {
                cluster_id: 0,
                addresses: vec!["3000".to_string()],
                call_timeout_ms: 5000,
            },
            server: ServerConfig {
                bind_addr: "0.0.0.0".to_string(),
                port: 8080,
            },
            cache: CacheConfig {
                idempotency_cache_size: 1000,
                idempotency_ttl_secs: 3600,
                quote_cache_size: 1000,
                quote_ttl_secs: 30,
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn empty_database_url_rejected() {
        let mut config = sample_config();
        config.database.url.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = sample_config();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_tigerbeetle_addresses_rejected() {
        let mut config = sample_config();
        config.tigerbeetle.addresses.clear();
        assert!(config.validate().is_err());
    }
}
