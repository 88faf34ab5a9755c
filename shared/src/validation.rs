//! Validation utilities for the StockWatch inventory platform
//!
//! Custom rules plugged into `validator` derives on input types.

use std::borrow::Cow;

use rust_decimal::Decimal;
use validator::ValidationError;

/// Maximum number of fractional digits accepted for prices
pub const PRICE_SCALE: u32 = 2;

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Validate SKU characters (ASCII alphanumeric, dash, underscore)
pub fn validate_sku(sku: &str) -> Result<(), ValidationError> {
    if sku.trim().is_empty() {
        return Err(invalid("sku", "SKU cannot be blank"));
    }
    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(invalid(
            "sku",
            "SKU may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(())
}

/// Validate a unit price: non-negative with at most two decimal places
pub fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid("price", "Price cannot be negative"));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(invalid("price", "Price must have at most 2 decimal places"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateProductInput;
    use std::str::FromStr;
    use validator::Validate;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn input() -> CreateProductInput {
        CreateProductInput {
            name: "Widget A".to_string(),
            sku: "WID-001".to_string(),
            price: dec("19.99"),
            warehouse_id: 1,
            initial_quantity: 10,
            low_stock_threshold: Some(5),
        }
    }

    #[test]
    fn test_validate_sku_valid() {
        assert!(validate_sku("WID-001").is_ok());
        assert!(validate_sku("abc_123").is_ok());
    }

    #[test]
    fn test_validate_sku_invalid() {
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("WID 001").is_err());
        assert!(validate_sku("WID/001").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(&dec("0")).is_ok());
        assert!(validate_price(&dec("19.99")).is_ok());
        // Trailing zeros don't count towards the scale
        assert!(validate_price(&dec("19.9900")).is_ok());
        assert!(validate_price(&dec("-0.01")).is_err());
        assert!(validate_price(&dec("19.999")).is_err());
    }

    #[test]
    fn test_create_product_input_valid() {
        assert!(input().validate().is_ok());

        let mut no_threshold = input();
        no_threshold.low_stock_threshold = None;
        assert!(no_threshold.validate().is_ok());
    }

    #[test]
    fn test_create_product_input_invalid_fields() {
        let mut bad = input();
        bad.name = String::new();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));

        let mut bad = input();
        bad.initial_quantity = -1;
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("initial_quantity"));

        let mut bad = input();
        bad.low_stock_threshold = Some(-5);
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("low_stock_threshold"));

        let mut bad = input();
        bad.price = dec("-1");
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("price"));

        let mut bad = input();
        bad.sku = "has space".to_string();
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("sku"));
    }
}
