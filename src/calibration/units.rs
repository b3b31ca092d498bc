//! Concentration strings such as `"2.5 mM"` or `"100 uM"`, normalised to
//! millimolar.

use super::CalibrationError;

/// Multiplier converting a unit suffix to millimolar. Matching is
/// case-insensitive; unknown or missing suffixes are treated as mM.
pub fn unit_multiplier(suffix: Option<&str>) -> f64 {
    match suffix.map(|s| s.to_ascii_lowercase()).as_deref() {
        Some("m") => 1e3,
        Some("mm") => 1.0,
        Some("um") => 1e-3,
        Some("nm") => 1e-9,
        Some("pm") => 1e-12,
        _ => 1.0,
    }
}

/// Parse a concentration string into millimolar.
///
/// Blank strings yield `Ok(None)`. Both `"2.5 mM"` and `"2.5mM"` are
/// accepted.
pub fn parse_concentration(text: &str) -> Result<Option<f64>, CalibrationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let (value, suffix) = match trimmed.split_once(char::is_whitespace) {
        Some((value, rest)) => (value, rest.split_whitespace().next()),
        None => {
            let split = trimmed
                .find(|c: char| c.is_ascii_alphabetic() && c != 'e' && c != 'E')
                .unwrap_or(trimmed.len());
            let (value, suffix) = trimmed.split_at(split);
            (value, (!suffix.is_empty()).then_some(suffix))
        }
    };

    let number: f64 = value
        .parse()
        .map_err(|_| CalibrationError::InvalidConcentration(text.to_string()))?;
    if !number.is_finite() {
        return Err(CalibrationError::InvalidConcentration(text.to_string()));
    }
    Ok(Some(number * unit_multiplier(suffix)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_table() {
        assert_eq!(parse_concentration("1 m").unwrap(), Some(1000.0));
        assert_eq!(parse_concentration("500 um").unwrap(), Some(0.5));
        assert_eq!(parse_concentration("3").unwrap(), Some(3.0));
        assert_eq!(parse_concentration("2.5 mM").unwrap(), Some(2.5));
        assert_eq!(parse_concentration("7 nM").unwrap(), Some(7e-9));
        assert_eq!(parse_concentration("4 pM").unwrap(), Some(4e-12));
    }

    #[test]
    fn test_unknown_suffix_defaults_to_mm() {
        assert_eq!(parse_concentration("5 mg").unwrap(), Some(5.0));
        assert_eq!(unit_multiplier(None), 1.0);
    }

    #[test]
    fn test_compact_form() {
        assert_eq!(parse_concentration("2.5mM").unwrap(), Some(2.5));
        assert_eq!(parse_concentration("100uM").unwrap(), Some(0.1));
        assert_eq!(parse_concentration("1e-3 mM").unwrap(), Some(1e-3));
    }

    #[test]
    fn test_blank_and_invalid() {
        assert_eq!(parse_concentration("   ").unwrap(), None);
        assert_eq!(
            parse_concentration("abc mM"),
            Err(CalibrationError::InvalidConcentration("abc mM".to_string()))
        );
    }
}
