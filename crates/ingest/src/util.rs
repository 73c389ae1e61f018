use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a monetary token as found in statements: thousands separators,
/// currency symbols, stray quotes, and accounting parentheses for negatives.
pub(crate) fn parse_amount(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    let (negative, s) = match s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, s),
    };
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, ',' | '"' | ' ' | '$' | '₹' | '€' | '£'))
        .collect();
    let dec = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -dec } else { dec })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn plain_and_signed() {
        assert_eq!(parse_amount("450"), Some(dec("450")));
        assert_eq!(parse_amount("450.50"), Some(dec("450.50")));
        assert_eq!(parse_amount("-2000"), Some(dec("-2000")));
        assert_eq!(parse_amount("+2000"), Some(dec("2000")));
    }

    #[test]
    fn thousands_separators_and_symbols() {
        assert_eq!(parse_amount("1,23,456.78"), Some(dec("123456.78")));
        assert_eq!(parse_amount("₹ 50,000"), Some(dec("50000")));
        assert_eq!(parse_amount("$1,234.56"), Some(dec("1234.56")));
        assert_eq!(parse_amount("\"2,450.00\""), Some(dec("2450.00")));
    }

    #[test]
    fn accounting_parentheses_are_negative() {
        assert_eq!(parse_amount("(75.25)"), Some(dec("-75.25")));
        assert_eq!(parse_amount("(1,000)"), Some(dec("-1000")));
    }

    #[test]
    fn garbage_and_blank_are_none() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("n/a"), None);
        assert_eq!(parse_amount("12.3.4"), None);
    }
}
