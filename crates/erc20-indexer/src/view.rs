use crate::amount::format_units;
use crate::error::Error;
use crate::types::query::CachedQueryResult;

/// One token as presented to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRow {
    pub symbol: String,
    pub name: Option<String>,
    /// Balance scaled by the token's decimals.
    pub balance: String,
    pub logo: Option<String>,
    pub contract_address: String,
}

/// Build display rows for a query result, in provider order.
pub fn token_rows(result: &CachedQueryResult) -> Result<Vec<TokenRow>, Error> {
    result
        .entries()
        .map(|(balance, metadata)| {
            Ok(TokenRow {
                symbol: metadata.symbol.clone(),
                name: metadata.name.clone(),
                balance: format_units(&balance.raw_balance, metadata.decimals)?,
                logo: metadata.logo.clone(),
                contract_address: checksum_address(&balance.contract_address),
            })
        })
        .collect()
}

/// Render one display line per token.
///
/// A balance that cannot be formatted is reported on its own line; the other
/// tokens still render.
pub fn render_lines(result: &CachedQueryResult) -> Vec<String> {
    result
        .entries()
        .map(|(balance, metadata)| {
            let contract = checksum_address(&balance.contract_address);
            match format_units(&balance.raw_balance, metadata.decimals) {
                Ok(amount) => format!("{:<10} {:>32}  {}", metadata.symbol, amount, contract),
                Err(e) => format!("{:<10} {:>32}  {}", metadata.symbol, format!("<{e}>"), contract),
            }
        })
        .collect()
}

/// EIP-55 mixed-case form of a 20-byte hex address.
///
/// Anything that is not `0x` followed by 40 hex digits is returned unchanged.
pub fn checksum_address(address: &str) -> String {
    let Some(digits) = address.strip_prefix("0x") else {
        return address.to_string();
    };
    match hex::decode(digits) {
        Ok(bytes) if bytes.len() == 20 => {
            let mut addr = [0u8; 20];
            addr.copy_from_slice(&bytes);
            eip55_checksum(&addr)
        }
        _ => address.to_string(),
    }
}

fn eip55_checksum(addr: &[u8; 20]) -> String {
    use tiny_keccak::{Hasher, Keccak};

    let hex_addr = hex::encode(addr);
    let mut hasher = Keccak::v256();
    hasher.update(hex_addr.as_bytes());
    let mut hash = [0u8; 32];
    hasher.finalize(&mut hash);

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (i, c) in hex_addr.chars().enumerate() {
        let hash_nibble = if i % 2 == 0 {
            (hash[i / 2] >> 4) & 0x0f
        } else {
            hash[i / 2] & 0x0f
        };
        if hash_nibble >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::token::{TokenBalanceRecord, TokenMetadata};

    #[test]
    fn test_checksum_address() {
        assert_eq!(
            checksum_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
        assert_eq!(
            checksum_address("0x5AAEB6053F3E94C9B9A09F33669435E7EF1BEAED"),
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_checksum_address_passes_through_other_input() {
        assert_eq!(checksum_address("0x1"), "0x1");
        assert_eq!(checksum_address("vitalik.eth"), "vitalik.eth");
    }

    #[test]
    fn test_token_rows() {
        let result = CachedQueryResult::new(
            vec![
                TokenBalanceRecord::new("0x1", "0x64"),
                TokenBalanceRecord::new("0x2", "1500000"),
            ],
            vec![
                TokenMetadata {
                    symbol: "TKN".to_string(),
                    decimals: 2,
                    logo: Some("https://example.com/tkn.png".to_string()),
                    name: Some("Token".to_string()),
                },
                TokenMetadata {
                    symbol: "USDC".to_string(),
                    decimals: 6,
                    logo: None,
                    name: None,
                },
            ],
        )
        .unwrap();

        let rows = token_rows(&result).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].symbol, "TKN");
        assert_eq!(rows[0].balance, "1");
        assert_eq!(rows[0].logo.as_deref(), Some("https://example.com/tkn.png"));
        assert_eq!(rows[1].balance, "1.5");
    }

    #[test]
    fn test_token_rows_bad_balance() {
        let result = CachedQueryResult::new(
            vec![TokenBalanceRecord::new("0x1", "not-a-number")],
            vec![TokenMetadata {
                symbol: "TKN".to_string(),
                decimals: 2,
                logo: None,
                name: None,
            }],
        )
        .unwrap();

        assert!(matches!(token_rows(&result), Err(Error::Amount(_))));
    }

    #[test]
    fn test_render_lines_keeps_going_past_bad_balance() {
        let meta = |symbol: &str| TokenMetadata {
            symbol: symbol.to_string(),
            decimals: 2,
            logo: None,
            name: None,
        };
        let oversized = format!("0x1{}", "0".repeat(64));
        let result = CachedQueryResult::new(
            vec![
                TokenBalanceRecord::new("0x1", oversized),
                TokenBalanceRecord::new("0x2", "0x64"),
            ],
            vec![meta("BAD"), meta("GOOD")],
        )
        .unwrap();

        let lines = render_lines(&result);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("BAD"));
        assert!(lines[0].contains("exceeds 256 bits"));
        assert!(lines[1].starts_with("GOOD"));
        assert!(lines[1].contains(" 1  0x2"));
    }
}
