//! Price formatting for reminder lines and summaries.

/// Group digits in threes with `sep`.
fn group_digits(amount: u64, sep: char) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Rupiah amount the way the Indonesian locale prints it: `Rp 65.000`.
pub fn format_idr(amount: u64) -> String {
    format!("Rp {}", group_digits(amount, '.'))
}

/// Amount in `currency`, without fraction digits.
pub fn format_price(amount: u64, currency: &str) -> String {
    match currency.to_ascii_uppercase().as_str() {
        "IDR" => format_idr(amount),
        code => format!("{} {}", code, group_digits(amount, ',')),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_idr() {
        assert_eq!(format_idr(0), "Rp 0");
        assert_eq!(format_idr(999), "Rp 999");
        assert_eq!(format_idr(65000), "Rp 65.000");
        assert_eq!(format_idr(1_234_567), "Rp 1.234.567");
    }

    #[test]
    fn test_format_price_other_currency() {
        assert_eq!(format_price(300000, "idr"), "Rp 300.000");
        assert_eq!(format_price(1999, "USD"), "USD 1,999");
    }
}
