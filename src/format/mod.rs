//! Display formatting in Brazilian convention: "." groups thousands, "," is
//! the decimal separator. Separators are fixed here on purpose — output must
//! not depend on the host locale.

/// Insert a "." every three digits, right to left.
fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    grouped.chars().rev().collect()
}

/// Currency with two decimals: 1234.5 → "R$ 1.234,50".
///
/// Rounding rule: nearest, ties to even — the rule the standard float
/// formatter applies. Fixed by tests below.
pub fn format_currency(value: f64) -> String {
    let rendered = format!("{:.2}", value);
    let (sign, rest) = match rendered.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", rendered.as_str()),
    };
    let (int_part, frac) = rest.split_once('.').unwrap_or((rest, "00"));
    format!("R$ {}{},{}", sign, group_thousands(int_part), frac)
}

/// Quantity with zero decimals: 1234.5 → "1.234" (ties to even, as above).
pub fn format_quantity(value: f64) -> String {
    let rendered = format!("{:.0}", value);
    let (sign, digits) = match rendered.strip_prefix('-') {
        Some(r) => ("-", r),
        None => ("", rendered.as_str()),
    };
    format!("{}{}", sign, group_thousands(digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(1234.5), "R$ 1.234,50");
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(999.99), "R$ 999,99");
        assert_eq!(format_currency(1_234_567.891), "R$ 1.234.567,89");
        assert_eq!(format_currency(-42_000.1), "R$ -42.000,10");
    }

    #[test]
    fn test_format_quantity_ties_to_even() {
        assert_eq!(format_quantity(1234.5), "1.234");
        assert_eq!(format_quantity(1235.5), "1.236");
        assert_eq!(format_quantity(999.0), "999");
        assert_eq!(format_quantity(1_000_000.0), "1.000.000");
        assert_eq!(format_quantity(-1234.0), "-1.234");
    }
}
