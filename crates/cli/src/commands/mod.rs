//! CLI command implementations.
//!
//! Each submodule owns one command group: its clap `Subcommand` enum and a
//! `run` function that executes an action against [`AppState`] and writes
//! human-readable output.
//!
//! [`AppState`]: tavola_storefront::AppState

pub mod cart;
pub mod favorites;
pub mod tenant;

use rust_decimal::Decimal;
use serde_json::Value;

use tavola_core::{Product, ProductId};
use tavola_storefront::AppError;

/// Parse a `key=value` catalog field. Values that parse as JSON keep their
/// type (`spicy=true`, `kcal=820`); anything else is stored as a string.
pub fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("field name missing in '{raw}'"));
    }
    if matches!(key, "id" | "name" | "price" | "quantity" | "tenantId") {
        return Err(format!("'{key}' is set by its own flag"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_owned()));
    Ok((key.to_owned(), value))
}

/// Build a product from CLI flags.
pub fn build_product(
    id: i64,
    name: String,
    price: Option<Decimal>,
    fields: Vec<(String, Value)>,
) -> Result<Product, AppError> {
    let price = price.unwrap_or_default();
    if price.is_sign_negative() {
        return Err(AppError::BadRequest(format!("price cannot be negative: {price}")));
    }
    let product = fields.into_iter().fold(
        Product::new(ProductId::new(id), name, price),
        |product, (key, value)| product.with_field(key, value),
    );
    Ok(product)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_field_json_value() {
        let (key, value) = parse_field("spicy=true").unwrap();
        assert_eq!(key, "spicy");
        assert_eq!(value, Value::Bool(true));
    }

    #[test]
    fn test_parse_field_string_fallback() {
        let (_, value) = parse_field("category=pizza bianca").unwrap();
        assert_eq!(value, Value::String("pizza bianca".to_owned()));
    }

    #[test]
    fn test_parse_field_rejects_reserved_and_malformed() {
        assert!(parse_field("price=3").is_err());
        assert!(parse_field("no-equals").is_err());
        assert!(parse_field("=value").is_err());
    }

    #[test]
    fn test_build_product_rejects_negative_price() {
        let result = build_product(1, "Dish".to_owned(), Some(Decimal::new(-1, 0)), Vec::new());
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[test]
    fn test_build_product_with_fields() {
        let product = build_product(
            2,
            "Diavola".to_owned(),
            Some(Decimal::new(1200, 2)),
            vec![("spicy".to_owned(), Value::Bool(true))],
        )
        .unwrap();
        assert_eq!(product.extra["spicy"], Value::Bool(true));
    }
}
