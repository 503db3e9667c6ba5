//! Value formatting shared by summary cards, views and CSV export.

/// Format an amount with a currency symbol and thousands separators.
///
/// Amounts are rounded to two decimals with trailing zeros dropped, so
/// `1500.5` renders as `₦1,500.5` and `1500` as `₦1,500`. The sign goes
/// before the symbol.
pub fn currency(amount: f64, symbol: &str) -> String {
    if !amount.is_finite() {
        return format!("{}{}", symbol, amount);
    }
    let sign = if amount < 0.0 && amount.abs() >= 0.005 {
        "-"
    } else {
        ""
    };
    format!("{}{}{}", sign, symbol, grouped(amount.abs()))
}

/// Format a number with thousands separators and at most two decimals.
pub fn number(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value < 0.0 && value.abs() >= 0.005 {
        format!("-{}", grouped(value.abs()))
    } else {
        grouped(value.abs())
    }
}

/// Format a percentage value (already scaled to 0-100).
pub fn percent(value: f64) -> String {
    format!("{}%", trim_decimals(&format!("{:.2}", value)))
}

fn grouped(value: f64) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut out = String::with_capacity(fixed.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn trim_decimals(s: &str) -> String {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_formatting() {
        assert_eq!(currency(1500.5, "₦"), "₦1,500.5");
        assert_eq!(currency(1500.0, "₦"), "₦1,500");
        assert_eq!(currency(1234567.891, "₦"), "₦1,234,567.89");
        assert_eq!(currency(999.0, "$"), "$999");
        assert_eq!(currency(0.0, "₦"), "₦0");
        assert_eq!(currency(-1200.0, "₦"), "-₦1,200");
        assert_eq!(currency(-0.001, "₦"), "₦0");
    }

    #[test]
    fn test_number_and_percent() {
        assert_eq!(number(12500.0), "12,500");
        assert_eq!(number(-42.25), "-42.25");
        assert_eq!(percent(5.0), "5%");
        assert_eq!(percent(3.456), "3.46%");
    }
}
