//! Configuration loading, env vars, optional TOML overlay.

use alloy_primitives::Address;
use serde::Deserialize;
use std::env;
use std::time::Duration;
use tracing::info;

const DEFAULT_ROUTER: &str = "0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D";
const DEFAULT_FACTORY: &str = "0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f";

/// Quiescence window for per-side quote debouncing.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;
/// Decimal places shown in the engine-filled opposite input.
pub const DEFAULT_DISPLAY_DECIMALS: u32 = 4;
/// Far-future transaction deadline offset, seconds from now.
pub const DEFAULT_DEADLINE_OFFSET_SECS: i64 = 200_000;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub chain_id: u64,
    pub rpc_url: Option<String>,
    pub ws_url: Option<String>,
    pub router_address: Address,
    pub factory_address: Address,
    pub native_symbol: String,
    pub debounce_ms: u64,
    pub display_decimals: u32,
    pub deadline_offset_secs: i64,
    pub tokens_file: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    pub chain_id: Option<u64>,
    pub rpc_url: Option<String>,
    pub ws_url: Option<String>,
    pub router_address: Option<String>,
    pub factory_address: Option<String>,
    pub native_symbol: Option<String>,
    pub debounce_ms: Option<u64>,
    pub display_decimals: Option<u32>,
    pub deadline_offset_secs: Option<i64>,
    pub tokens_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chain_id: 1,
            rpc_url: None,
            ws_url: None,
            router_address: DEFAULT_ROUTER.parse().expect("valid router address"),
            factory_address: DEFAULT_FACTORY.parse().expect("valid factory address"),
            native_symbol: "WETH".to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            display_decimals: DEFAULT_DISPLAY_DECIMALS,
            deadline_offset_secs: DEFAULT_DEADLINE_OFFSET_SECS,
            tokens_file: None,
        }
    }
}

impl AppConfig {
    /// Load from environment variables, falling back to mainnet defaults.
    pub fn load() -> Self {
        let defaults = Self::default();
        let rpc_url = env::var("RPC_URL").ok();
        let ws_url = env::var("WS_URL").ok();
        if rpc_url.is_none() {
            info!("RPC_URL not set; engine will only work with an injected provider");
        }
        Self {
            chain_id: env::var("CHAIN_ID").ok().and_then(|s| s.parse().ok()).unwrap_or(1),
            rpc_url,
            ws_url,
            router_address: env::var("ROUTER_ADDRESS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.router_address),
            factory_address: env::var("FACTORY_ADDRESS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.factory_address),
            native_symbol: env::var("NATIVE_SYMBOL").unwrap_or(defaults.native_symbol),
            debounce_ms: env::var("DEBOUNCE_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DEBOUNCE_MS),
            display_decimals: env::var("DISPLAY_DECIMALS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DISPLAY_DECIMALS),
            deadline_offset_secs: env::var("DEADLINE_OFFSET_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_DEADLINE_OFFSET_SECS),
            tokens_file: env::var("TOKENS_FILE").ok(),
        }
    }

    /// Load env config with a TOML file overlay. File values win over env.
    pub fn load_with_file(path: &str) -> Self {
        let mut config = Self::load();
        let file_config = std::fs::read_to_string(path)
            .ok()
            .and_then(|contents| toml::from_str::<FileConfig>(&contents).ok())
            .unwrap_or_default();

        if let Some(chain_id) = file_config.chain_id {
            config.chain_id = chain_id;
        }
        if file_config.rpc_url.is_some() {
            config.rpc_url = file_config.rpc_url;
        }
        if file_config.ws_url.is_some() {
            config.ws_url = file_config.ws_url;
        }
        if let Some(addr) = file_config.router_address.and_then(|s| s.parse().ok()) {
            config.router_address = addr;
        }
        if let Some(addr) = file_config.factory_address.and_then(|s| s.parse().ok()) {
            config.factory_address = addr;
        }
        if let Some(symbol) = file_config.native_symbol {
            config.native_symbol = symbol;
        }
        if let Some(ms) = file_config.debounce_ms {
            config.debounce_ms = ms;
        }
        if let Some(places) = file_config.display_decimals {
            config.display_decimals = places;
        }
        if let Some(offset) = file_config.deadline_offset_secs {
            config.deadline_offset_secs = offset;
        }
        if file_config.tokens_file.is_some() {
            config.tokens_file = file_config.tokens_file;
        }
        config
    }

    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
