//! Field rules shared by the create/update inputs.

use rust_decimal::Decimal;

use super::DomainError;

/// Maximum length of short text columns (titles, names, phone...).
pub const MAX_TEXT_LEN: usize = 255;
/// RFC 5321 limit.
pub const MAX_EMAIL_LEN: usize = 254;
/// Currency columns hold 6 digits, 2 of them after the point.
pub const PRICE_DECIMAL_PLACES: u32 = 2;
pub const PRICE_MAX_DIGITS: u32 = 6;

pub fn text(field: &str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::Validation(format!("{} cannot be empty", field)));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(DomainError::Validation(format!(
            "{} must be at most {} characters",
            field, MAX_TEXT_LEN
        )));
    }
    Ok(())
}

pub fn slug(value: &str) -> Result<(), DomainError> {
    text("slug", value)?;
    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !valid {
        return Err(DomainError::Validation(format!(
            "slug '{}' may only contain letters, digits, '-' and '_'",
            value
        )));
    }
    Ok(())
}

pub fn email(value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::Validation("email cannot be empty".into()));
    }
    if value.len() > MAX_EMAIL_LEN {
        return Err(DomainError::Validation(format!(
            "email must be at most {} characters",
            MAX_EMAIL_LEN
        )));
    }
    let mut parts = value.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(DomainError::Validation(format!(
            "'{}' is not a valid email address",
            value
        ))),
    }
}

pub fn price(field: &str, value: Decimal) -> Result<(), DomainError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::Validation(format!("{} cannot be negative", field)));
    }
    if value.normalize().scale() > PRICE_DECIMAL_PLACES {
        return Err(DomainError::Validation(format!(
            "{} must have at most {} decimal places",
            field, PRICE_DECIMAL_PLACES
        )));
    }
    let limit = Decimal::from(10_i64.pow(PRICE_MAX_DIGITS - PRICE_DECIMAL_PLACES));
    if value >= limit {
        return Err(DomainError::Validation(format!(
            "{} must be below {}",
            field, limit
        )));
    }
    Ok(())
}

pub fn quantity(value: i16) -> Result<(), DomainError> {
    if value < 0 {
        return Err(DomainError::Validation(format!(
            "quantity must not be negative (got {})",
            value
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn text_rejects_blank_and_long_values() {
        assert!(text("title", "Bread").is_ok());
        assert!(text("title", "   ").is_err());
        assert!(text("title", &"x".repeat(256)).is_err());
        assert!(text("title", &"x".repeat(255)).is_ok());
    }

    #[test]
    fn slug_charset() {
        assert!(slug("-").is_ok());
        assert!(slug("sour-dough_2").is_ok());
        assert!(slug("sour dough").is_err());
        assert!(slug("pain/au/levain").is_err());
        assert!(slug("").is_err());
    }

    #[test]
    fn email_shape() {
        assert!(email("ada@example.com").is_ok());
        assert!(email("first.last+tag@mail.co.uk").is_ok());
        assert!(email("").is_err());
        assert!(email("no-at-symbol").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("ada@").is_err());
        assert!(email("a@b@c").is_err());
    }

    #[test]
    fn price_precision_and_range() {
        assert!(price("unit_price", dec("0")).is_ok());
        assert!(price("unit_price", dec("19.90")).is_ok());
        assert!(price("unit_price", dec("9999.99")).is_ok());
        assert!(price("unit_price", dec("10000.00")).is_err());
        assert!(price("unit_price", dec("1.999")).is_err());
        assert!(price("unit_price", dec("-0.01")).is_err());
        // trailing zeros beyond two places are still two places
        assert!(price("unit_price", dec("4.5000")).is_ok());
    }

    #[test]
    fn quantity_bounds() {
        assert!(quantity(0).is_ok());
        assert!(quantity(i16::MAX).is_ok());
        assert!(quantity(-1).is_err());
    }
}
