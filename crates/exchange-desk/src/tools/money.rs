use rust_decimal::{Decimal, RoundingStrategy};

/// Whole-dollar USD rendering, e.g. `$1,250,000`.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded.is_sign_negative() && !rounded.is_zero() {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_usd(dec!(0)), "$0");
        assert_eq!(format_usd(dec!(950)), "$950");
        assert_eq!(format_usd(dec!(12000)), "$12,000");
        assert_eq!(format_usd(dec!(1900000)), "$1,900,000");
    }

    #[test]
    fn rounds_to_whole_dollars() {
        assert_eq!(format_usd(dec!(15600.49)), "$15,600");
        assert_eq!(format_usd(dec!(15600.5)), "$15,601");
        assert_eq!(format_usd(dec!(999.999)), "$1,000");
    }

    #[test]
    fn keeps_sign_for_negative_amounts() {
        assert_eq!(format_usd(dec!(-2500)), "-$2,500");
        assert_eq!(format_usd(dec!(-0.2)), "$0");
    }
}
