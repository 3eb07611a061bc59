//! Text conversions for primitive values and XML name checks.

/// Converts a boolean to its XML Schema lexical form.
pub fn bool_to_string(b: bool) -> &'static str {
    if b { "true" } else { "false" }
}

/// Formats a double the way the data contract format does: shortest
/// round-trip digits, `INF`/`-INF`/`NaN` for non-finite values, and exponent
/// notation (`1E+15`, `1E-05`) when the decimal exponent is outside `[-4, 15)`.
pub fn format_double(value: f64) -> String {
    if let Some(special) = non_finite(value.is_nan(), value.is_infinite(), value.is_sign_negative()) {
        return special.to_string();
    }
    format_real(value.to_string(), format!("{value:e}"), 15)
}

/// Formats a float like [`format_double`], with the plain range `[-4, 7)`.
pub fn format_float(value: f32) -> String {
    if let Some(special) = non_finite(value.is_nan(), value.is_infinite(), value.is_sign_negative()) {
        return special.to_string();
    }
    format_real(value.to_string(), format!("{value:e}"), 7)
}

fn non_finite(nan: bool, infinite: bool, negative: bool) -> Option<&'static str> {
    match (nan, infinite, negative) {
        (true, _, _) => Some("NaN"),
        (false, true, false) => Some("INF"),
        (false, true, true) => Some("-INF"),
        _ => None,
    }
}

/// Picks between Rust's plain and `{:e}` renderings of the same shortest digits.
fn format_real(plain: String, scientific: String, upper: i32) -> String {
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return plain;
    };
    let Ok(exponent) = exponent.parse::<i32>() else {
        return plain;
    };
    if plain == "0" || plain == "-0" || (-4..upper).contains(&exponent) {
        return plain;
    }
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{:02}", exponent.unsigned_abs())
}

/// Checks that `name` is a valid non-colonized XML name (NCName).
pub fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || first.is_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '\u{B7}'))
}

/// The first character of `text` outside the XML 1.0 `Char` production.
pub fn find_invalid_char(text: &str) -> Option<char> {
    text.chars().find(|&c| {
        !matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
    })
}
