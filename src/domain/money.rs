use thiserror::Error;

use super::LedgerError;

/// Monetary amounts are plain floating point values in the bank's single currency.
pub type Amount = f64;

/// Currency label used when presenting amounts.
pub const CURRENCY: &str = "SEK";

/// Accept only amounts that can move money: finite and strictly positive.
pub fn validate_amount(amount: Amount) -> Result<Amount, LedgerError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(LedgerError::InvalidAmount { amount })
    }
}

/// Format an amount as a human-readable currency string.
/// Example: 50.0 -> "SEK 50.00", -12.25 -> "SEK -12.25"
pub fn format_amount(amount: Amount) -> String {
    format!("{} {:.2}", CURRENCY, amount)
}

/// Parse a decimal string typed by a user into an amount.
/// Example: "50.00" -> 50.0, "12.5" -> 12.5, " 100 " -> 100.0
pub fn parse_amount(input: &str) -> Result<Amount, ParseAmountError> {
    let trimmed = input.trim();
    let amount: Amount = trimmed
        .parse()
        .map_err(|_| ParseAmountError::InvalidFormat(trimmed.to_string()))?;

    if !amount.is_finite() {
        return Err(ParseAmountError::NotFinite(trimmed.to_string()));
    }
    Ok(amount)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseAmountError {
    #[error("invalid money format: '{0}'")]
    InvalidFormat(String),

    #[error("amount is not a finite number: '{0}'")]
    NotFinite(String),
}
