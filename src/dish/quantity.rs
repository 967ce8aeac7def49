//! Decimal quantity helpers. Quantities live in records as strings and are
//! only ever parsed, doubled, and stringified here, backed by `bigdecimal`
//! so growth is exact at any magnitude.

use bigdecimal::{BigDecimal, Zero};
use std::str::FromStr;

use crate::dish::errors::DishError;

/// Parse a stored quantity string, rejecting anything that is not a
/// non-negative decimal number.
pub fn parse_quantity(text: &str) -> Result<BigDecimal, DishError> {
    let value = BigDecimal::from_str(text.trim())
        .map_err(|_| DishError::InvalidQuantity(text.to_string()))?;
    if value < BigDecimal::zero() {
        return Err(DishError::InvalidQuantity(text.to_string()));
    }
    Ok(value)
}

/// Double a stored quantity string, returning the doubled value as text.
pub fn double(text: &str) -> Result<String, DishError> {
    let value = parse_quantity(text)?;
    Ok((value * BigDecimal::from(2)).normalized().to_string())
}
