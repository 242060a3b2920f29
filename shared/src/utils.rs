// Number helpers shared by the exchange parsers and the text renderer.
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Parses exchange decimals such as `"64123.45000000"` into f64.
pub fn parse_decimal(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    let value = f64::from_str(trimmed).map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
    if !value.is_finite() {
        return Err(anyhow!("Non-finite decimal '{}'", s));
    }
    Ok(value)
}

/// Renders a price with two decimals, or more for sub-unit coins so they don't collapse to `0.00`.
pub fn format_price(value: f64) -> String {
    if value != 0.0 && value.abs() < 1.0 {
        format!("{:.6}", value)
    } else {
        format!("{:.2}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_exchange_format() {
        assert_eq!(parse_decimal("64123.45000000").unwrap(), 64123.45);
        assert_eq!(parse_decimal(" 0.00001234 ").unwrap(), 0.00001234);
    }

    #[test]
    fn test_parse_decimal_rejects_garbage() {
        assert!(parse_decimal("abc").is_err());
        assert!(parse_decimal("").is_err());
        assert!(parse_decimal("NaN").is_err());
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(64123.456), "64123.46");
        assert_eq!(format_price(0.5), "0.500000");
        assert_eq!(format_price(0.0), "0.00");
    }
}
