#[cfg(feature = "http")]
pub mod alchemy;
pub mod amount;
pub mod cache;
pub mod config;
pub mod controller;
pub mod error;
pub mod fetcher;
pub mod provider;
#[cfg(feature = "http")]
pub mod rpc;
pub mod types;
pub mod view;
pub mod wallet;

use std::sync::Arc;

use error::Error;

// Re-exports for convenience
#[cfg(feature = "http")]
pub use alchemy::AlchemyProvider;
pub use cache::QueryCache;
pub use config::Config;
pub use controller::{QueryController, QueryState};
pub use fetcher::BalanceFetcher;
pub use provider::{StaticProvider, TokenDataProvider};
pub use types::query::CachedQueryResult;
pub use types::token::{TokenBalanceRecord, TokenMetadata};
pub use view::TokenRow;
pub use wallet::{StaticWallet, WalletProvider};

/// Fetch every token balance held by `address` and render it for display.
///
/// One-shot convenience without caching; use [`QueryController`] to keep
/// results across queries.
pub async fn fetch_token_rows(
    provider: Arc<dyn TokenDataProvider>,
    address: &str,
) -> Result<Vec<TokenRow>, Error> {
    let result = BalanceFetcher::new(provider).fetch(address).await?;
    view::token_rows(&result)
}
