//! Validation utilities and regex patterns

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use validator::ValidationError;

/// Regex pattern for validating hex color codes (e.g., #FFFFFF, #FF0000)
pub static HEX_COLOR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid hex color regex pattern")
});

/// Validate a log level string
pub fn validate_log_level(level: &str) -> Result<(), ValidationError> {
    match level {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new("invalid_log_level")),
    }
}

/// Validate a metric → color mapping: keys must be known metrics, values hex colors
pub fn validate_color_map(colors: &HashMap<String, String>) -> Result<(), ValidationError> {
    for (metric, color) in colors {
        if metric.parse::<ytgraph_common::Metric>().is_err() {
            return Err(ValidationError::new("unknown_metric_in_color_map"));
        }
        if !HEX_COLOR_REGEX.is_match(color) {
            return Err(ValidationError::new("invalid_hex_color_in_color_map"));
        }
    }
    Ok(())
}

/// Validate a socket bind address of the form host:port
pub fn validate_bind_address(address: &str) -> Result<(), ValidationError> {
    if address.is_empty() {
        return Err(ValidationError::new("empty_bind_address"));
    }
    match address.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => Ok(()),
        _ => Err(ValidationError::new("invalid_bind_address")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_regex() {
        // Valid hex colors
        assert!(HEX_COLOR_REGEX.is_match("#FFFFFF"));
        assert!(HEX_COLOR_REGEX.is_match("#000000"));
        assert!(HEX_COLOR_REGEX.is_match("#00D4AA"));
        assert!(HEX_COLOR_REGEX.is_match("#abc123"));

        // Invalid hex colors
        assert!(!HEX_COLOR_REGEX.is_match("FFFFFF")); // Missing #
        assert!(!HEX_COLOR_REGEX.is_match("#FFF")); // Too short
        assert!(!HEX_COLOR_REGEX.is_match("#FFFFFFF")); // Too long
        assert!(!HEX_COLOR_REGEX.is_match("#GGGGGG")); // Invalid characters
        assert!(!HEX_COLOR_REGEX.is_match("")); // Empty
    }

    #[test]
    fn test_validate_log_level() {
        for level in &["trace", "debug", "info", "warn", "error"] {
            assert!(validate_log_level(level).is_ok());
        }
        assert!(validate_log_level("verbose").is_err());
        assert!(validate_log_level("").is_err());
    }

    #[test]
    fn test_validate_color_map() {
        let mut colors = HashMap::new();
        colors.insert("subscribers".to_string(), "#FF0000".to_string());
        colors.insert("views".to_string(), "#00D4AA".to_string());
        assert!(validate_color_map(&colors).is_ok());

        colors.insert("plays".to_string(), "#FFFFFF".to_string());
        assert!(validate_color_map(&colors).is_err());

        colors.remove("plays");
        colors.insert("videos".to_string(), "orange".to_string());
        assert!(validate_color_map(&colors).is_err());
    }

    #[test]
    fn test_validate_bind_address() {
        assert!(validate_bind_address("127.0.0.1:8080").is_ok());
        assert!(validate_bind_address("0.0.0.0:80").is_ok());
        assert!(validate_bind_address("").is_err());
        assert!(validate_bind_address("localhost").is_err());
        assert!(validate_bind_address("localhost:notaport").is_err());
    }
}
