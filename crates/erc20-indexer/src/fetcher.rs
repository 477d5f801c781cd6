use std::sync::Arc;

use futures::future::try_join_all;
use log::{debug, info};

use crate::error::FetchError;
use crate::provider::TokenDataProvider;
use crate::types::query::CachedQueryResult;

/// Fetches one wallet's balances and the metadata of every token it holds.
#[derive(Clone)]
pub struct BalanceFetcher {
    provider: Arc<dyn TokenDataProvider>,
}

impl BalanceFetcher {
    pub fn new(provider: Arc<dyn TokenDataProvider>) -> Self {
        Self { provider }
    }

    /// Fetch balances for `address`, then look up metadata for every
    /// returned contract concurrently.
    ///
    /// Metadata is joined by position, not completion order. The first
    /// failed lookup fails the whole fetch and the remaining lookups are
    /// dropped.
    pub async fn fetch(&self, address: &str) -> Result<CachedQueryResult, FetchError> {
        if address.is_empty() {
            return Err(FetchError::InvalidAddress(address.to_string()));
        }

        let balances = self.provider.get_token_balances(address).await?;
        if balances.is_empty() {
            debug!("{address} holds no tokens");
            return Ok(CachedQueryResult::empty());
        }

        debug!(
            "looking up metadata for {} tokens held by {address}",
            balances.len()
        );
        let lookups = balances.iter().map(|record| {
            let provider = &self.provider;
            async move {
                provider
                    .get_token_metadata(&record.contract_address)
                    .await
                    .map_err(|e| FetchError::PartialMetadataFailure {
                        contract_address: record.contract_address.clone(),
                        source: Box::new(e),
                    })
            }
        });
        let metadata = try_join_all(lookups).await?;

        info!("fetched {} token balances for {address}", balances.len());
        CachedQueryResult::new(balances, metadata).ok_or_else(|| {
            FetchError::InvalidResponse("metadata count does not match balances".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::provider::StaticProvider;
    use crate::types::token::{TokenBalanceRecord, TokenMetadata};

    fn meta(symbol: &str, decimals: u8) -> TokenMetadata {
        TokenMetadata {
            symbol: symbol.to_string(),
            decimals,
            logo: None,
            name: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_single_token() {
        let mut provider = StaticProvider::new();
        provider.insert_balances("0xABC", vec![TokenBalanceRecord::new("0x1", "0x64")]);
        provider.insert_metadata("0x1", meta("TKN", 2));
        let provider = Arc::new(provider);

        let fetcher = BalanceFetcher::new(provider.clone());
        let result = fetcher.fetch("0xABC").await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.metadata()[0].symbol, "TKN");
        assert_eq!(provider.balance_calls(), 1);
        assert_eq!(provider.metadata_calls(), 1);
    }

    #[tokio::test]
    async fn test_fetch_empty_skips_metadata() {
        let provider = Arc::new(StaticProvider::new());
        let fetcher = BalanceFetcher::new(provider.clone());

        let result = fetcher.fetch("0xABC").await.unwrap();

        assert!(result.is_empty());
        assert_eq!(provider.balance_calls(), 1);
        assert_eq!(provider.metadata_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_empty_address_makes_no_calls() {
        let provider = Arc::new(StaticProvider::new());
        let fetcher = BalanceFetcher::new(provider.clone());

        let result = fetcher.fetch("").await;

        assert!(matches!(result, Err(FetchError::InvalidAddress(_))));
        assert_eq!(provider.balance_calls(), 0);
    }

    #[tokio::test]
    async fn test_fetch_fails_when_any_metadata_fails() {
        let mut provider = StaticProvider::new();
        provider.insert_balances(
            "0xABC",
            vec![
                TokenBalanceRecord::new("0x1", "0x64"),
                TokenBalanceRecord::new("0x2", "0x64"),
            ],
        );
        provider.insert_metadata("0x1", meta("ONE", 2));
        let fetcher = BalanceFetcher::new(Arc::new(provider));

        let err = fetcher.fetch("0xABC").await.unwrap_err();

        match err {
            FetchError::PartialMetadataFailure {
                contract_address, ..
            } => assert_eq!(contract_address, "0x2"),
            other => panic!("expected PartialMetadataFailure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_balance_failure() {
        let mut provider = StaticProvider::new();
        provider.set_unreachable("0xABC");
        let fetcher = BalanceFetcher::new(Arc::new(provider));

        let result = fetcher.fetch("0xABC").await;
        assert!(matches!(result, Err(FetchError::Network(_))));
    }

    /// Answers metadata lookups after a per-contract delay so completion
    /// order is the reverse of request order.
    struct SlowFirstProvider;

    #[async_trait]
    impl TokenDataProvider for SlowFirstProvider {
        async fn get_token_balances(
            &self,
            _address: &str,
        ) -> Result<Vec<TokenBalanceRecord>, FetchError> {
            Ok((0..5u64)
                .map(|i| TokenBalanceRecord::new(format!("0x{i}"), format!("{i}")))
                .collect())
        }

        async fn get_token_metadata(
            &self,
            contract_address: &str,
        ) -> Result<TokenMetadata, FetchError> {
            let index: u64 = contract_address.trim_start_matches("0x").parse().unwrap();
            tokio::time::sleep(Duration::from_millis((5 - index) * 20)).await;
            Ok(meta(&format!("T{index}"), 0))
        }
    }

    /// Every metadata lookup waits until all of them have started.
    struct RendezvousProvider {
        tokens: usize,
        barrier: tokio::sync::Barrier,
    }

    #[async_trait]
    impl TokenDataProvider for RendezvousProvider {
        async fn get_token_balances(
            &self,
            _address: &str,
        ) -> Result<Vec<TokenBalanceRecord>, FetchError> {
            Ok((0..self.tokens)
                .map(|i| TokenBalanceRecord::new(format!("0x{i}"), "1"))
                .collect())
        }

        async fn get_token_metadata(
            &self,
            contract_address: &str,
        ) -> Result<TokenMetadata, FetchError> {
            self.barrier.wait().await;
            Ok(meta(contract_address, 0))
        }
    }

    #[tokio::test]
    async fn test_fetch_runs_all_lookups_at_once() {
        let tokens = 8;
        let fetcher = BalanceFetcher::new(Arc::new(RendezvousProvider {
            tokens,
            barrier: tokio::sync::Barrier::new(tokens),
        }));

        let result = tokio::time::timeout(Duration::from_secs(5), fetcher.fetch("0xABC"))
            .await
            .expect("metadata lookups did not all run concurrently")
            .unwrap();

        assert_eq!(result.len(), tokens);
        assert_eq!(result.metadata()[7].symbol, "0x7");
    }

    #[tokio::test]
    async fn test_fetch_joins_by_position() {
        let fetcher = BalanceFetcher::new(Arc::new(SlowFirstProvider));

        let result = fetcher.fetch("0xABC").await.unwrap();

        for (balance, metadata) in result.entries() {
            let index = balance.contract_address.trim_start_matches("0x");
            assert_eq!(metadata.symbol, format!("T{index}"));
        }
    }
}
