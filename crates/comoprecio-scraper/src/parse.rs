//! Price text parsing for Spanish storefront listings.

/// Parses a displayed price such as `"1.234,56 €"` into a number.
///
/// Every character other than digits, commas and periods is dropped first.
/// When a comma remains, the last comma is the decimal separator and any
/// other comma or period is a thousands separator. Without a comma the text
/// is read as a plain decimal. Only the leading numeric run counts, so
/// `"12.99.1"` yields `12.99`.
///
/// Returns `None` for empty or digit-free input.
#[must_use]
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = match cleaned.rfind(',') {
        Some(pos) => {
            let digits_only = |s: &str| s.chars().filter(char::is_ascii_digit).collect::<String>();
            format!(
                "{}.{}",
                digits_only(&cleaned[..pos]),
                digits_only(&cleaned[pos + 1..])
            )
        }
        None => cleaned,
    };

    leading_decimal(&normalized)?.parse::<f64>().ok()
}

/// Returns the longest `digits[.digits]` prefix of `s`, requiring at least
/// one digit.
fn leading_decimal(s: &str) -> Option<&str> {
    let bytes = s.as_bytes();
    let mut end = 0usize;
    let mut seen_dot = false;
    let mut seen_digit = false;

    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end += 1;
    }

    let prefix = s[..end].trim_end_matches('.');
    (seen_digit && !prefix.is_empty() && prefix != ".").then_some(prefix)
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
