use std::env;

use crate::error::Error;

/// Alchemy endpoint for Ethereum Sepolia, without the trailing API key.
pub const SEPOLIA_BASE_URL: &str = "https://eth-sepolia.g.alchemy.com/v2";

/// Runtime configuration read from the process environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Token API endpoint, API key included.
    pub provider_url: String,

    /// JSON-RPC endpoint answering `eth_requestAccounts`.
    pub wallet_rpc_url: Option<String>,
}

impl Config {
    /// Load `.env` if present, then read the environment.
    pub fn from_env() -> Result<Self, Error> {
        // A missing .env file is fine; real environment variables still apply.
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider_url = match non_empty("ALCHEMY_URL") {
            Some(url) => url,
            None => {
                let api_key = non_empty("ALCHEMY_API_KEY").ok_or_else(|| {
                    Error::Config("ALCHEMY_API_KEY or ALCHEMY_URL must be set".to_string())
                })?;
                format!("{SEPOLIA_BASE_URL}/{api_key}")
            }
        };

        Ok(Self {
            provider_url,
            wallet_rpc_url: non_empty("WALLET_RPC_URL"),
        })
    }
}
