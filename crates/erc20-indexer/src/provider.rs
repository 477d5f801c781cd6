use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::FetchError;
use crate::types::token::{TokenBalanceRecord, TokenMetadata};

/// Trait for upstream token data providers (Alchemy, in-memory, etc.).
#[async_trait]
pub trait TokenDataProvider: Send + Sync {
    /// List the ERC-20 balances held by `address`, in provider order.
    async fn get_token_balances(&self, address: &str)
        -> Result<Vec<TokenBalanceRecord>, FetchError>;

    /// Look up display metadata for one token contract.
    async fn get_token_metadata(&self, contract_address: &str)
        -> Result<TokenMetadata, FetchError>;
}

/// In-memory provider for testing and offline use.
///
/// Unknown wallets hold no tokens; unknown contracts fail the metadata lookup.
/// Every call is counted so callers can assert on network traffic.
#[derive(Default)]
pub struct StaticProvider {
    balances: HashMap<String, Vec<TokenBalanceRecord>>,
    metadata: HashMap<String, TokenMetadata>,
    unreachable: HashSet<String>,
    balance_calls: AtomicUsize,
    metadata_calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the balances reported for a wallet.
    pub fn insert_balances(&mut self, address: &str, balances: Vec<TokenBalanceRecord>) {
        self.balances.insert(address.to_string(), balances);
    }

    /// Set the metadata reported for a contract.
    pub fn insert_metadata(&mut self, contract_address: &str, metadata: TokenMetadata) {
        self.metadata.insert(contract_address.to_string(), metadata);
    }

    /// Make balance lookups for `address` fail with a network error.
    pub fn set_unreachable(&mut self, address: &str) {
        self.unreachable.insert(address.to_string());
    }

    pub fn balance_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
    }

    pub fn metadata_calls(&self) -> usize {
        self.metadata_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenDataProvider for StaticProvider {
    async fn get_token_balances(
        &self,
        address: &str,
    ) -> Result<Vec<TokenBalanceRecord>, FetchError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        if self.unreachable.contains(address) {
            return Err(FetchError::Network(format!("{address} unreachable")));
        }
        Ok(self.balances.get(address).cloned().unwrap_or_default())
    }

    async fn get_token_metadata(
        &self,
        contract_address: &str,
    ) -> Result<TokenMetadata, FetchError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.metadata.get(contract_address).cloned().ok_or_else(|| {
            FetchError::Network(format!("no metadata for {contract_address}"))
        })
    }
}
