//! Human-readable size parsing.
//!
//! The configured upload limit arrives as a string like `"10mb"` and is
//! parsed once per invocation into bytes. Units are 1024-based; fractional
//! values are allowed (`"1.5mb"`).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size limit: {0:?}")]
pub struct SizeParseError(pub String);

/// Parse a human-readable byte size (`"10mb"`, `"512kb"`, `"100"`) into bytes.
pub fn parse_size(input: &str) -> Result<u64, SizeParseError> {
    let s = input.trim().to_ascii_lowercase();
    if s.is_empty() {
        return Err(SizeParseError(input.to_string()));
    }

    let split = s
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);

    let value: f64 = number
        .parse()
        .map_err(|_| SizeParseError(input.to_string()))?;
    if value < 0.0 || !value.is_finite() {
        return Err(SizeParseError(input.to_string()));
    }

    let multiplier: u64 = match unit.trim() {
        "" | "b" => 1,
        "kb" => 1 << 10,
        "mb" => 1 << 20,
        "gb" => 1 << 30,
        _ => return Err(SizeParseError(input.to_string())),
    };

    Ok((value * multiplier as f64).round() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_units() {
        assert_eq!(parse_size("100").unwrap(), 100);
        assert_eq!(parse_size("100b").unwrap(), 100);
        assert_eq!(parse_size("2kb").unwrap(), 2048);
        assert_eq!(parse_size("10mb").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("1gb").unwrap(), 1024 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_fractional_and_whitespace() {
        assert_eq!(parse_size("1.5kb").unwrap(), 1536);
        assert_eq!(parse_size(" 10mb ").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("10 mb").unwrap(), 10 * 1024 * 1024);
        assert_eq!(parse_size("10MB").unwrap(), 10 * 1024 * 1024);
    }

    #[test]
    fn test_parse_size_rejects_garbage() {
        assert!(parse_size("").is_err());
        assert!(parse_size("mb").is_err());
        assert!(parse_size("ten mb").is_err());
        assert!(parse_size("10tb").is_err());
        assert!(parse_size("10..5mb").is_err());
    }
}
