//! Decimal amount parsing and display.
//!
//! Operators type amounts in whole tokens (`"1.5"`); the ledger counts base
//! units with [`DECIMALS`] fractional digits. The same conversion is used for
//! the base asset.

use brb_ledger_core::{DECIMALS, UNIT};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("empty amount")]
    Empty,

    #[error("invalid amount: {0:?}")]
    Invalid(String),

    #[error("too many decimal places (max {max}): {input:?}")]
    TooPrecise { input: String, max: u32 },

    #[error("amount out of range: {0:?}")]
    Overflow(String),
}

/// Parse a decimal token amount into base units.
pub fn parse_amount(input: &str) -> Result<u128, AmountError> {
    let trimmed = input.trim().replace('_', "");
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (whole, frac) = match trimmed.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (trimmed.as_str(), ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(AmountError::Invalid(input.to_string()));
    }
    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits_only(whole) || !digits_only(frac) {
        return Err(AmountError::Invalid(input.to_string()));
    }
    if frac.len() > DECIMALS as usize {
        return Err(AmountError::TooPrecise {
            input: input.to_string(),
            max: DECIMALS,
        });
    }

    let overflow = || AmountError::Overflow(input.to_string());
    let whole_units = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(UNIT)
            .ok_or_else(overflow)?
    };
    let frac_units = if frac.is_empty() {
        0
    } else {
        let scale = 10u128.pow(DECIMALS - frac.len() as u32);
        frac.parse::<u128>().map_err(|_| overflow())? * scale
    };

    whole_units.checked_add(frac_units).ok_or_else(overflow)
}

/// Render base units as a decimal token amount, trimming trailing zeros.
pub fn format_amount(units: u128) -> String {
    let whole = units / UNIT;
    let frac = units % UNIT;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = DECIMALS as usize);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}
