use serde::Serialize;

use super::token::{TokenBalanceRecord, TokenMetadata};

/// Result of one successful balance query.
///
/// `metadata[i]` describes `balances[i].contract_address`. The two sequences
/// always have the same length; construction goes through [`CachedQueryResult::new`]
/// so a mismatched pair can never be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CachedQueryResult {
    balances: Vec<TokenBalanceRecord>,
    metadata: Vec<TokenMetadata>,
}

impl CachedQueryResult {
    /// Pair balances with their metadata by position.
    ///
    /// Returns `None` if the lengths differ.
    pub fn new(balances: Vec<TokenBalanceRecord>, metadata: Vec<TokenMetadata>) -> Option<Self> {
        if balances.len() != metadata.len() {
            return None;
        }
        Some(Self { balances, metadata })
    }

    /// A result for an address that holds no tokens.
    pub fn empty() -> Self {
        Self {
            balances: Vec::new(),
            metadata: Vec::new(),
        }
    }

    pub fn balances(&self) -> &[TokenBalanceRecord] {
        &self.balances
    }

    pub fn metadata(&self) -> &[TokenMetadata] {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.balances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }

    /// Iterate balance/metadata pairs in provider order.
    pub fn entries(&self) -> impl Iterator<Item = (&TokenBalanceRecord, &TokenMetadata)> {
        self.balances.iter().zip(self.metadata.iter())
    }

    /// Serialize the result to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
