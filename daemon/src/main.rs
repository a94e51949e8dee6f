//! taskgate daemon — entry point for running the verification oracle.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use taskgate_chain::{EvmTaskMarker, MarkerConfig};
use taskgate_farcaster::NeynarClient;
use taskgate_rpc::{AppState, AuthMode, GateMetrics, RpcServer};
use taskgate_store::{MemoryLinkageStore, MemoryVerificationStore};
use taskgate_twitter::TwitterClient;
use taskgate_verification::Orchestrator;

use config::ServiceConfig;

#[derive(Parser)]
#[command(name = "taskgate-daemon", about = "Social-task verification oracle")]
struct Cli {
    /// Port for the HTTP API.
    #[arg(long, env = "TASKGATE_PORT")]
    port: Option<u16>,

    /// Shared secret required in the X-API-SECRET header.
    #[arg(long, env = "API_SECRET")]
    api_secret: Option<String>,

    /// Run without authentication (local development only).
    #[arg(long, env = "TASKGATE_INSECURE")]
    insecure_allow_unauthenticated: bool,

    /// Neynar API key.
    #[arg(long, env = "NEYNAR_API_KEY")]
    neynar_api_key: Option<String>,

    /// Twitter API v2 bearer token.
    #[arg(long, env = "TWITTER_BEARER_TOKEN")]
    twitter_bearer_token: Option<String>,

    /// EVM JSON-RPC endpoint.
    #[arg(long, env = "TASKGATE_RPC_URL")]
    rpc_url: Option<String>,

    /// Chain id for transaction signing.
    #[arg(long, env = "TASKGATE_CHAIN_ID")]
    chain_id: Option<u64>,

    /// Rewards contract address.
    #[arg(long, env = "TASKGATE_CONTRACT_ADDRESS")]
    contract_address: Option<String>,

    /// Private key of the verifier wallet.
    #[arg(long, env = "VERIFIER_PRIVATE_KEY")]
    verifier_private_key: Option<String>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, env = "TASKGATE_LOG_LEVEL")]
    log_level: Option<String>,

    /// Path to a TOML configuration file. If provided, file settings
    /// are used as the base; CLI flags and env vars override them.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Cli {
    /// Layer CLI/env values over the file config.
    fn merge_into(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(port) = self.port {
            config.listen_port = port;
        }
        if self.api_secret.is_some() {
            config.api_secret = self.api_secret;
        }
        if self.insecure_allow_unauthenticated {
            config.insecure_allow_unauthenticated = true;
        }
        if let Some(key) = self.neynar_api_key {
            config.neynar_api_key = key;
        }
        if let Some(token) = self.twitter_bearer_token {
            config.twitter_bearer_token = token;
        }
        if let Some(url) = self.rpc_url {
            config.rpc_url = url;
        }
        if let Some(id) = self.chain_id {
            config.chain_id = id;
        }
        if let Some(addr) = self.contract_address {
            config.contract_address = addr;
        }
        if let Some(key) = self.verifier_private_key {
            config.verifier_private_key = key;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let file_config = match &cli.config {
        Some(path) => ServiceConfig::from_toml_file(&path.display().to_string())?,
        None => ServiceConfig::default(),
    };
    let config = cli.merge_into(file_config);

    taskgate_utils::init_tracing_with(&config.log_level, config.log_format == "json");
    config.validate()?;

    let marker = EvmTaskMarker::connect(&MarkerConfig {
        rpc_url: config.rpc_url.clone(),
        chain_id: config.chain_id,
        contract_address: config.contract_address.clone(),
        verifier_private_key: config.verifier_private_key.clone(),
    })?;

    let neynar = NeynarClient::new(config.neynar_api_key.clone())
        .with_scan_caps(config.collection_scan_cap, config.timeline_scan_cap);
    let twitter = TwitterClient::new(config.twitter_bearer_token.clone())
        .with_scan_caps(config.collection_scan_cap, config.timeline_scan_cap);

    let orchestrator = Orchestrator::new(
        Arc::new(MemoryVerificationStore::new()),
        Arc::new(MemoryLinkageStore::new()),
        Arc::new(neynar),
        Arc::new(twitter),
        Arc::new(marker),
    );

    let auth = match config.api_secret.clone() {
        Some(secret) => AuthMode::Secret(secret),
        // validate() already required the explicit opt-in for this.
        None => AuthMode::Insecure,
    };

    let state = Arc::new(AppState {
        orchestrator,
        metrics: GateMetrics::new(),
        auth,
    });

    tracing::info!(
        port = config.listen_port,
        chain_id = config.chain_id,
        contract = %config.contract_address,
        collection_scan_cap = config.collection_scan_cap,
        timeline_scan_cap = config.timeline_scan_cap,
        "starting taskgate"
    );

    RpcServer::new(config.listen_port, state).start().await?;

    tracing::info!("taskgate daemon exited cleanly");
    Ok(())
}
