use crate::error::{ExtractError, Result};

/// Symbols the registry appends to amounts.
pub const CURRENCY_SYMBOLS: [char; 4] = ['€', '$', '£', '¥'];

const GROUP_SEPARATOR: char = '.';
const DECIMAL_SEPARATOR: char = ',';

/// Magnitude abbreviations and their power of ten.
const UNIT_SUFFIXES: [(&str, usize); 2] = [("Mio", 6), ("Mrd", 9)];

pub fn ends_with_currency(token: &str) -> bool {
    token
        .trim_end()
        .chars()
        .last()
        .is_some_and(|c| CURRENCY_SYMBOLS.contains(&c))
}

/// Remove whitespace and one trailing currency symbol from a raw amount token.
pub fn strip_amount(token: &str) -> String {
    let mut compact: String = token.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.chars().last().is_some_and(|c| CURRENCY_SYMBOLS.contains(&c)) {
        compact.pop();
    }
    compact
}

/// Turn a German-formatted figure (`1.234`, `1,52Mio`, `0,051Mrd`) into a
/// plain integer string in the base currency unit.
///
/// Without a unit the decimal fraction is dropped. With a unit the fraction
/// digits are shifted into the integer part and the remaining power of ten is
/// appended as zeros, so `1,52Mio` and `1,5Mio` both land on the right scale.
pub fn normalize(raw: &str) -> Result<String> {
    let malformed = || ExtractError::MalformedAmount(raw.to_string());

    let value = raw.trim();
    let (negative, value) = match value.strip_prefix(['-', '−']) {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let (number, exponent) = UNIT_SUFFIXES
        .iter()
        .find_map(|(suffix, exp)| value.strip_suffix(*suffix).map(|n| (n, *exp)))
        .unwrap_or((value, 0));

    let number = number.replace(GROUP_SEPARATOR, "");
    let (integer, fraction) = match number.split_once(DECIMAL_SEPARATOR) {
        Some((i, f)) => (i, f),
        None => (number.as_str(), ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err(malformed());
    }
    if !integer.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(malformed());
    }

    let mut digits = String::with_capacity(integer.len() + exponent);
    digits.push_str(integer);
    if exponent > 0 {
        let kept = fraction.len().min(exponent);
        digits.push_str(&fraction[..kept]);
        digits.extend(std::iter::repeat_n('0', exponent - kept));
    }

    let trimmed = digits.trim_start_matches('0');
    let canonical = if trimmed.is_empty() { "0" } else { trimmed };

    if negative && canonical != "0" {
        Ok(format!("-{}", canonical))
    } else {
        Ok(canonical.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_amounts() {
        assert_eq!(normalize("1.000,0").unwrap(), "1000");
        assert_eq!(normalize("12.345").unwrap(), "12345");
        assert_eq!(normalize("730").unwrap(), "730");
        assert_eq!(normalize("1.234,56").unwrap(), "1234");
    }

    #[test]
    fn test_millions() {
        // one integer digit, two decimals: four zeros appended
        assert_eq!(normalize("1,52Mio").unwrap(), "1520000");
        // two integer digits, one decimal: five zeros appended
        assert_eq!(normalize("12,3Mio").unwrap(), "12300000");
        assert_eq!(normalize("1,5Mio").unwrap(), "1500000");
        assert_eq!(normalize("12Mio").unwrap(), "12000000");
    }

    #[test]
    fn test_billions() {
        // 0,0X pattern: two leading characters dropped, six zeros
        assert_eq!(normalize("0,051Mrd").unwrap(), "51000000");
        assert_eq!(normalize("0,123Mrd").unwrap(), "123000000");
        assert_eq!(normalize("1,23Mrd").unwrap(), "1230000000");
        assert_eq!(normalize("12,3Mrd").unwrap(), "12300000000");
    }

    #[test]
    fn test_negative_and_zero() {
        assert_eq!(normalize("-1.500").unwrap(), "-1500");
        assert_eq!(normalize("−2,5Mio").unwrap(), "-2500000");
        assert_eq!(normalize("0").unwrap(), "0");
        assert_eq!(normalize("-0").unwrap(), "0");
    }

    #[test]
    fn test_rejects_non_figures() {
        assert!(matches!(normalize("KeineAngabe"), Err(ExtractError::MalformedAmount(_))));
        assert!(normalize("").is_err());
        assert!(normalize("Mio").is_err());
        assert!(normalize("1,2,3").is_err());
    }

    #[test]
    fn test_output_is_digits_only() {
        for raw in ["1.000,0", "1,5Mio", "0,051Mrd", "9.999.999", "3,14", "0,9Mio"] {
            let out = normalize(raw).unwrap();
            assert!(out.chars().all(|c| c.is_ascii_digit()), "{} -> {}", raw, out);
        }
    }

    #[test]
    fn test_strip_amount() {
        assert_eq!(strip_amount("1.234 €"), "1.234");
        assert_eq!(strip_amount(" 1,5 Mio €"), "1,5Mio");
        assert_eq!(strip_amount("1.234"), "1.234");
        assert!(ends_with_currency("12 €"));
        assert!(!ends_with_currency("Umlaufvermögen"));
        assert!(!ends_with_currency(""));
    }
}
