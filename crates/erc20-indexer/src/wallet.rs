use async_trait::async_trait;

use crate::error::Error;

/// Trait for wallets that can hand over the user's account addresses.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for its accounts. The first entry is the active one.
    async fn request_accounts(&self) -> Result<Vec<String>, Error>;
}

/// Wallet with a fixed account list.
pub struct StaticWallet {
    accounts: Vec<String>,
}

impl StaticWallet {
    pub fn new(accounts: Vec<String>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl WalletProvider for StaticWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, Error> {
        Ok(self.accounts.clone())
    }
}

/// Wallet reached over JSON-RPC (`eth_requestAccounts`).
#[cfg(feature = "http")]
pub struct RpcWallet {
    rpc: crate::rpc::JsonRpcClient,
}

#[cfg(feature = "http")]
impl RpcWallet {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            rpc: crate::rpc::JsonRpcClient::new(url),
        }
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl WalletProvider for RpcWallet {
    async fn request_accounts(&self) -> Result<Vec<String>, Error> {
        self.rpc
            .call("eth_requestAccounts", serde_json::json!([]))
            .await
            .map_err(|e| Error::Wallet(e.to_string()))
    }
}
