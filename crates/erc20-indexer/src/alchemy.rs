use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::SEPOLIA_BASE_URL;
use crate::error::FetchError;
use crate::provider::TokenDataProvider;
use crate::rpc::JsonRpcClient;
use crate::types::token::{TokenBalanceRecord, TokenMetadata};

/// Token data provider backed by the Alchemy token API.
pub struct AlchemyProvider {
    rpc: JsonRpcClient,
}

#[derive(Debug, Deserialize)]
struct TokenBalancesResponse {
    #[serde(rename = "tokenBalances")]
    token_balances: Vec<TokenBalanceEntry>,
}

#[derive(Debug, Deserialize)]
struct TokenBalanceEntry {
    #[serde(rename = "contractAddress")]
    contract_address: String,

    #[serde(rename = "tokenBalance")]
    token_balance: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenMetadataResponse {
    symbol: Option<String>,
    decimals: Option<u8>,
    logo: Option<String>,
    name: Option<String>,
}

impl From<TokenMetadataResponse> for TokenMetadata {
    fn from(raw: TokenMetadataResponse) -> Self {
        Self {
            symbol: raw.symbol.unwrap_or_default(),
            decimals: raw.decimals.unwrap_or(0),
            logo: raw.logo,
            name: raw.name,
        }
    }
}

impl AlchemyProvider {
    /// Provider for the default network using `api_key`.
    pub fn new(api_key: &str) -> Self {
        Self::with_url(format!("{SEPOLIA_BASE_URL}/{api_key}"))
    }

    /// Provider for an explicit endpoint URL (API key included).
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            rpc: JsonRpcClient::new(url),
        }
    }
}

#[async_trait]
impl TokenDataProvider for AlchemyProvider {
    async fn get_token_balances(
        &self,
        address: &str,
    ) -> Result<Vec<TokenBalanceRecord>, FetchError> {
        let response: TokenBalancesResponse = self
            .rpc
            .call("alchemy_getTokenBalances", json!([address, "erc20"]))
            .await?;

        Ok(response
            .token_balances
            .into_iter()
            .map(|entry| TokenBalanceRecord {
                contract_address: entry.contract_address,
                raw_balance: entry.token_balance.unwrap_or_else(|| "0x0".to_string()),
            })
            .collect())
    }

    async fn get_token_metadata(
        &self,
        contract_address: &str,
    ) -> Result<TokenMetadata, FetchError> {
        let response: TokenMetadataResponse = self
            .rpc
            .call("alchemy_getTokenMetadata", json!([contract_address]))
            .await?;
        Ok(response.into())
    }
}
