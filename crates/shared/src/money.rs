//! Currency formatting for display strings.
//!
//! Monetary values stay as full-precision `f64` inside the engines and are
//! rounded only here, at the display edge (receipts, share texts, dashboard
//! strings). Formatting follows pt-BR conventions: `R$ 1.234,56`.

/// Formats a monetary value as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn format_brl(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, frac)
}

/// Pads a ticket number for display: width 3 when the raffle has more than
/// 99 numbers, width 2 otherwise.
pub fn pad_number(number: u32, total_numbers: u32) -> String {
    if total_numbers > 99 {
        format!("{:03}", number)
    } else {
        format!("{:02}", number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl_simple() {
        assert_eq!(format_brl(5.0), "R$ 5,00");
        assert_eq!(format_brl(2.5), "R$ 2,50");
        assert_eq!(format_brl(0.0), "R$ 0,00");
    }

    #[test]
    fn test_format_brl_grouping() {
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(999.99), "R$ 999,99");
    }

    #[test]
    fn test_format_brl_rounds_to_cents() {
        assert_eq!(format_brl(0.005), "R$ 0,01");
        assert_eq!(format_brl(10.004), "R$ 10,00");
    }

    #[test]
    fn test_format_brl_negative() {
        assert_eq!(format_brl(-12.3), "-R$ 12,30");
    }

    #[test]
    fn test_pad_number() {
        assert_eq!(pad_number(7, 100), "007");
        assert_eq!(pad_number(7, 99), "07");
        assert_eq!(pad_number(42, 50), "42");
        assert_eq!(pad_number(100, 100), "100");
    }
}
