/// Renders a price for display.
///
/// KRW prices are shown with a won sign and thousands separators. Any other
/// currency gets a rough USD estimate at a fixed 1300 KRW/USD rate.
#[must_use]
pub fn format_price(price: i64, currency: &str) -> String {
    if currency.eq_ignore_ascii_case("KRW") {
        return format!("₩{}", group_thousands(price));
    }
    let cents = (i128::from(price) * 100 + 650) / 1300;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("{sign}${}.{:02}", cents / 100, cents % 100)
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn krw_uses_thousands_separators() {
        assert_eq!(format_price(59_000, "KRW"), "₩59,000");
        assert_eq!(format_price(1_234_567, "KRW"), "₩1,234,567");
        assert_eq!(format_price(900, "KRW"), "₩900");
        assert_eq!(format_price(0, "KRW"), "₩0");
    }

    #[test]
    fn other_currencies_convert_to_usd_estimate() {
        assert_eq!(format_price(13_000, "USD"), "$10.00");
        assert_eq!(format_price(1_950, "USD"), "$1.50");
    }
}
