use num_bigint::BigUint;

use crate::error::Error;

/// Widest balance an ERC-20 contract can report (`uint256`).
const MAX_BALANCE_BITS: u64 = 256;

/// Parse a raw token balance.
///
/// Accepts `0x`-prefixed hex (the provider's encoding) or plain decimal.
/// A bare `0x` is zero.
pub fn parse_raw_balance(raw: &str) -> Result<BigUint, Error> {
    let amount = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some("") => BigUint::default(),
        Some(digits) if digits.bytes().all(|b| b.is_ascii_hexdigit()) => {
            BigUint::parse_bytes(digits.as_bytes(), 16)
                .ok_or_else(|| Error::Amount(format!("invalid hex balance {raw:?}")))?
        }
        Some(_) => return Err(Error::Amount(format!("invalid hex balance {raw:?}"))),
        None if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => {
            BigUint::parse_bytes(raw.as_bytes(), 10)
                .ok_or_else(|| Error::Amount(format!("invalid decimal balance {raw:?}")))?
        }
        None => return Err(Error::Amount(format!("invalid decimal balance {raw:?}"))),
    };

    if amount.bits() > MAX_BALANCE_BITS {
        return Err(Error::Amount(format!(
            "balance {raw:?} exceeds {MAX_BALANCE_BITS} bits"
        )));
    }
    Ok(amount)
}

/// Scale a raw balance by `10^decimals` for display.
pub fn format_units(raw: &str, decimals: u8) -> Result<String, Error> {
    let amount = parse_raw_balance(raw)?;
    Ok(format_with_decimals(&amount, decimals))
}

/// Format a BigUint with decimal places, trimming trailing fractional zeros.
pub fn format_with_decimals(amount: &BigUint, decimals: u8) -> String {
    let s = amount.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return s;
    }

    if s.len() <= decimals {
        let zeros = decimals - s.len();
        let mut result = String::from("0.");
        result.extend(std::iter::repeat_n('0', zeros));
        result.push_str(&s);
        let trimmed = result.trim_end_matches('0');
        if trimmed.ends_with('.') {
            return format!("{trimmed}0");
        }
        return trimmed.to_string();
    }

    let (integer_part, decimal_part) = s.split_at(s.len() - decimals);
    let trimmed = decimal_part.trim_end_matches('0');
    if trimmed.is_empty() {
        integer_part.to_string()
    } else {
        format!("{integer_part}.{trimmed}")
    }
}
