//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config error: {0}")]
    Invalid(String),
}

/// Configuration for the taskgate daemon.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Secrets normally arrive via
/// environment variables merged in by the CLI layer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port the HTTP API listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Shared secret required in `X-API-SECRET` on verification routes.
    #[serde(default)]
    pub api_secret: Option<String>,

    /// Explicitly run without authentication. Refused implicitly: a
    /// missing secret without this flag is a startup error.
    #[serde(default)]
    pub insecure_allow_unauthenticated: bool,

    /// Neynar API key for Farcaster lookups.
    #[serde(default)]
    pub neynar_api_key: String,

    /// Twitter API v2 app bearer token.
    #[serde(default)]
    pub twitter_bearer_token: String,

    /// EVM JSON-RPC endpoint.
    #[serde(default)]
    pub rpc_url: String,

    /// Chain id the verifier wallet signs for.
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Rewards contract address.
    #[serde(default)]
    pub contract_address: String,

    /// Private key of the wallet holding `VERIFIER_ROLE`.
    #[serde(default)]
    pub verifier_private_key: String,

    /// Entries examined per follower/reaction scan before `Inconclusive`.
    #[serde(default = "default_collection_scan_cap")]
    pub collection_scan_cap: usize,

    /// Recent posts examined per quote/reply/proof scan.
    #[serde(default = "default_timeline_scan_cap")]
    pub timeline_scan_cap: usize,

    /// Reserved: per-client request budget. Declared for parity with the
    /// deployment environment; not enforced yet.
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_minute: u32,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_listen_port() -> u16 {
    8787
}

fn default_chain_id() -> u64 {
    8453
}

fn default_collection_scan_cap() -> usize {
    100
}

fn default_timeline_scan_cap() -> usize {
    50
}

fn default_rate_limit() -> u32 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "human".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Check that the configuration is runnable.
    ///
    /// Auth fails closed: no secret and no explicit insecure opt-in is an
    /// error, never a silent fallback to accepting everything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_secret.is_none() && !self.insecure_allow_unauthenticated {
            return Err(ConfigError::Invalid(
                "api_secret is not set; set it or opt in with \
                 insecure_allow_unauthenticated = true"
                    .into(),
            ));
        }
        if let Some(secret) = &self.api_secret {
            if secret.is_empty() {
                return Err(ConfigError::Invalid("api_secret is empty".into()));
            }
        }
        for (name, value) in [
            ("neynar_api_key", &self.neynar_api_key),
            ("twitter_bearer_token", &self.twitter_bearer_token),
            ("rpc_url", &self.rpc_url),
            ("contract_address", &self.contract_address),
            ("verifier_private_key", &self.verifier_private_key),
        ] {
            if value.is_empty() {
                return Err(ConfigError::Invalid(format!("{name} is not set")));
            }
        }
        if self.collection_scan_cap == 0 || self.timeline_scan_cap == 0 {
            return Err(ConfigError::Invalid("scan caps must be positive".into()));
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            api_secret: None,
            insecure_allow_unauthenticated: false,
            neynar_api_key: String::new(),
            twitter_bearer_token: String::new(),
            rpc_url: String::new(),
            chain_id: default_chain_id(),
            contract_address: String::new(),
            verifier_private_key: String::new(),
            collection_scan_cap: default_collection_scan_cap(),
            timeline_scan_cap: default_timeline_scan_cap(),
            rate_limit_per_minute: default_rate_limit(),
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runnable() -> ServiceConfig {
        ServiceConfig {
            api_secret: Some("s3cret".into()),
            neynar_api_key: "neynar".into(),
            twitter_bearer_token: "bearer".into(),
            rpc_url: "http://localhost:8545".into(),
            contract_address: "0x5FbDB2315678afecb367f032d93F642f64180aa3".into(),
            verifier_private_key: "0xkey".into(),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.listen_port, 8787);
        assert_eq!(config.collection_scan_cap, 100);
        assert_eq!(config.timeline_scan_cap, 50);
        assert_eq!(config.log_format, "human");
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            listen_port = 9999
            collection_scan_cap = 500
        "#;
        let config = ServiceConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.listen_port, 9999);
        assert_eq!(config.collection_scan_cap, 500);
        assert_eq!(config.timeline_scan_cap, 50); // default
    }

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = ServiceConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed = ServiceConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.listen_port, config.listen_port);
        assert_eq!(parsed.chain_id, config.chain_id);
    }

    #[test]
    fn runnable_config_validates() {
        assert!(runnable().validate().is_ok());
    }

    #[test]
    fn missing_secret_without_opt_in_fails_closed() {
        let mut config = runnable();
        config.api_secret = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api_secret"));
    }

    #[test]
    fn missing_secret_with_explicit_opt_in_is_allowed() {
        let mut config = runnable();
        config.api_secret = None;
        config.insecure_allow_unauthenticated = true;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_upstream_credentials_are_rejected() {
        let mut config = runnable();
        config.neynar_api_key = String::new();
        assert!(config.validate().is_err());

        let mut config = runnable();
        config.verifier_private_key = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_scan_cap_is_rejected() {
        let mut config = runnable();
        config.collection_scan_cap = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = ServiceConfig::from_toml_file("/nonexistent/taskgate.toml");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
