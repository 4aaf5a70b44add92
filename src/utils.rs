use once_cell::sync::Lazy;
use regex::Regex;

// Longest leading decimal literal, the same prefix a browser's parseFloat accepts.
static NUMERIC_PREFIX_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?)").unwrap()
});

/// Parse the numeric prefix of a string the way the dashboard's data is read
/// in the browser: leading whitespace is skipped and trailing text ignored.
///
/// # Examples
/// ```
/// use fpl_polygon::utils::parse_float_prefix;
/// assert_eq!(parse_float_prefix("75%"), Some(75.0));
/// assert_eq!(parse_float_prefix("  3.5 pts"), Some(3.5));
/// assert_eq!(parse_float_prefix("Unavailable"), None);
/// ```
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let captures = NUMERIC_PREFIX_REGEX.captures(input)?;
    captures[1]
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Format a threshold for the readout under the chart.
pub fn format_threshold(value: f64) -> String {
    format!("{:.2}", value)
}

/// Best-effort message for a rejected JS promise or thrown value.
pub fn js_error_message(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_float_prefix("42"), Some(42.0));
        assert_eq!(parse_float_prefix("-1.25"), Some(-1.25));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("7."), Some(7.0));
        assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
    }

    #[test]
    fn ignores_trailing_text() {
        assert_eq!(parse_float_prefix("75%"), Some(75.0));
        assert_eq!(parse_float_prefix("\t12.5m"), Some(12.5));
        assert_eq!(parse_float_prefix("3e"), Some(3.0));
    }

    #[test]
    fn rejects_non_numeric() {
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("   "), None);
        assert_eq!(parse_float_prefix("Unavailable"), None);
        assert_eq!(parse_float_prefix("N/A 5"), None);
        assert_eq!(parse_float_prefix("Infinity"), None);
    }

    #[test]
    fn formats_two_decimals() {
        assert_eq!(format_threshold(3.5), "3.50");
        assert_eq!(format_threshold(87.456), "87.46");
    }
}
