use super::*;

#[test]
fn parses_spanish_thousands_and_decimal_comma() {
    assert_eq!(parse_price("1.234,56€"), Some(1234.56));
}

#[test]
fn empty_input_is_none() {
    assert_eq!(parse_price(""), None);
}

#[test]
fn letters_only_is_none() {
    assert_eq!(parse_price("abc"), None);
    assert_eq!(parse_price("€"), None);
    assert_eq!(parse_price(","), None);
}

#[test]
fn amazon_whole_and_fraction_concatenation() {
    // `.a-price-whole` renders "1.099," and `.a-price-fraction` "00".
    assert_eq!(parse_price("1.099,00"), Some(1099.0));
    assert_eq!(parse_price("899,99"), Some(899.99));
}

#[test]
fn plain_decimal_without_comma() {
    assert_eq!(parse_price("1199.9"), Some(1199.9));
    assert_eq!(parse_price("749"), Some(749.0));
}

#[test]
fn surrounding_text_is_ignored() {
    assert_eq!(parse_price("  Ahora 349,90 € IVA incl."), Some(349.9));
}

#[test]
fn only_leading_numeric_run_counts() {
    assert_eq!(parse_price("12.99.1"), Some(12.99));
}

#[test]
fn trailing_separator_is_tolerated() {
    assert_eq!(parse_price("5."), Some(5.0));
    assert_eq!(parse_price("5,"), Some(5.0));
}

#[test]
fn leading_decimal_requires_a_digit() {
    assert_eq!(leading_decimal("."), None);
    assert_eq!(leading_decimal("12.5x"), Some("12.5"));
    assert_eq!(leading_decimal(".5"), Some(".5"));
}
