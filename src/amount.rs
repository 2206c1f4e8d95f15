//! Token amount parsing and decimal scaling

use crate::error::{BootstrapError, BootstrapResult};

use ethers::types::U256;
use ethers::utils::parse_units;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref INTEGER: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref DECIMAL: Regex = Regex::new(r"^[0-9]+(\.[0-9]*)?$").unwrap();
}

/// Parse the initial supply. The parent token mints its supply with 0 decimals,
/// so only whole numbers are accepted.
pub fn parse_supply(value: &str) -> Result<U256, String> {
    let value = value.trim();
    if !INTEGER.is_match(value) {
        return Err(format!("'{}' is not a whole number", value));
    }
    U256::from_dec_str(value).map_err(|e| format!("'{}' does not fit in uint256: {}", value, e))
}

/// Check that a human-readable amount is a plain non-negative decimal
pub fn validate_decimal(value: &str) -> Result<(), String> {
    if DECIMAL.is_match(value.trim()) {
        Ok(())
    } else {
        Err(format!("'{}' is not a non-negative decimal number", value))
    }
}

/// Scale a human-readable amount into base units using the token's on-chain decimals
pub fn scale_amount(value: &str, decimals: u8) -> BootstrapResult<U256> {
    let value = value.trim();
    validate_decimal(value).map_err(invalid)?;

    let normalized = trim_fraction(value);
    let fraction_digits = normalized.split_once('.').map(|(_, f)| f.len()).unwrap_or(0);
    if fraction_digits > decimals as usize {
        return Err(invalid(format!(
            "'{}' has {} significant fractional digits but the token only has {} decimals",
            value, fraction_digits, decimals
        )));
    }

    let scaled = parse_units(normalized, decimals as u32).map_err(|e| invalid(e.to_string()))?;
    Ok(scaled.into())
}

/// Drop trailing zeros of the fraction, and the point itself when nothing is left
fn trim_fraction(value: &str) -> &str {
    match value.split_once('.') {
        Some((whole, fraction)) => {
            let significant = fraction.trim_end_matches('0');
            if significant.is_empty() {
                whole
            } else {
                &value[..whole.len() + 1 + significant.len()]
            }
        }
        None => value,
    }
}

fn invalid(reason: String) -> BootstrapError {
    BootstrapError::InvalidParameter {
        name: crate::config::BRIDGE_AMOUNT_ENV,
        reason,
    }
}
