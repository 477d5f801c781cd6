use serde::{Deserialize, Serialize};

/// Raw balance of one token held by a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalanceRecord {
    /// Token contract address, verbatim as reported by the provider.
    #[serde(rename = "contractAddress")]
    pub contract_address: String,

    /// Integer balance in the token's smallest unit, as a hex (`0x`-prefixed)
    /// or decimal string. May exceed 64 bits.
    #[serde(rename = "rawBalance")]
    pub raw_balance: String,
}

impl TokenBalanceRecord {
    pub fn new(contract_address: impl Into<String>, raw_balance: impl Into<String>) -> Self {
        Self {
            contract_address: contract_address.into(),
            raw_balance: raw_balance.into(),
        }
    }
}

/// Display metadata for a token contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub symbol: String,

    pub decimals: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
