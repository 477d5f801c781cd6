use thiserror::Error;

/// Unified error type for the indexer library.
#[derive(Debug, Error)]
pub enum Error {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("config error: {0}")]
    Config(String),

    #[error("amount error: {0}")]
    Amount(String),

    #[error("wallet error: {0}")]
    Wallet(String),
}

/// Errors raised while fetching balances and metadata from the provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("provider error {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("metadata lookup failed for {contract_address}: {source}")]
    PartialMetadataFailure {
        contract_address: String,
        source: Box<FetchError>,
    },
}
