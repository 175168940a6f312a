//! Setting value validation.

use regex::Regex;
use std::sync::LazyLock;

use super::defaults;

// CUPS destination names: no whitespace, '/', '#'.
static RE_PRINTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^\s/#]{1,127}$").unwrap());

/// Validate a setting value. Returns `Ok(())` if valid, or an error message.
pub fn validate_setting(key: &str, value: &str) -> Result<(), String> {
    if defaults::find(key).is_none() {
        return Err(format!("unknown setting key: {key}"));
    }
    match key {
        "DATABASE" | "CODES_DIR" => {
            if value.trim().is_empty() {
                return Err("must not be empty".into());
            }
        }
        "PRINTER" => {
            if !value.is_empty() && !RE_PRINTER.is_match(value) {
                return Err("printer name must be 1-127 characters without spaces, '/' or '#'".into());
            }
        }
        "LARGE_BATCH_THRESHOLD" => validate_int_range(value, 1, 1_000_000)?,
        "CAPTION_SIZE" => {
            let v: f32 = value.parse().map_err(|_| "must be a number")?;
            if !(8.0..=200.0).contains(&v) {
                return Err("must be between 8 and 200".into());
            }
        }
        _ => {}
    }
    Ok(())
}

fn validate_int_range(value: &str, min: i64, max: i64) -> Result<(), String> {
    let v: i64 = value.parse().map_err(|_| "must be an integer")?;
    if !(min..=max).contains(&v) {
        return Err(format!("must be between {min} and {max}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_keys() {
        assert!(validate_setting("HOST", "localhost").is_err());
    }

    #[test]
    fn paths_must_not_be_empty() {
        assert!(validate_setting("CODES_DIR", "labels").is_ok());
        assert!(validate_setting("DATABASE", "  ").is_err());
    }

    #[test]
    fn printer_names() {
        assert!(validate_setting("PRINTER", "").is_ok());
        assert!(validate_setting("PRINTER", "Label_Printer").is_ok());
        assert!(validate_setting("PRINTER", "Label Printer").is_err());
        assert!(validate_setting("PRINTER", "a/b").is_err());
    }

    #[test]
    fn numeric_ranges() {
        assert!(validate_setting("LARGE_BATCH_THRESHOLD", "500").is_ok());
        assert!(validate_setting("LARGE_BATCH_THRESHOLD", "0").is_err());
        assert!(validate_setting("LARGE_BATCH_THRESHOLD", "many").is_err());
        assert!(validate_setting("CAPTION_SIZE", "24.5").is_ok());
        assert!(validate_setting("CAPTION_SIZE", "2").is_err());
    }
}
