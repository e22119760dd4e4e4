//! Text helpers for narratives

use rust_decimal::{Decimal, RoundingStrategy};

/// Comma-grouped amount with up to three decimals: `1234567.5` → `1,234,567.5`
pub fn grouped(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Rupee amount: `₹100,000`
pub fn rupees(amount: Decimal) -> String {
    format!("₹{}", grouped(amount))
}

/// First character lowercased, for splicing a sentence into another
pub fn lower_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// The first `n` names joined with ", "
pub fn join_first<'a>(names: impl IntoIterator<Item = &'a str>, n: usize) -> String {
    names.into_iter().take(n).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_grouping() {
        assert_eq!(rupees(dec!(100000)), "₹100,000");
        assert_eq!(rupees(dec!(999)), "₹999");
        assert_eq!(rupees(dec!(1000)), "₹1,000");
        assert_eq!(grouped(dec!(1234567.5)), "1,234,567.5");
        assert_eq!(grouped(dec!(150000.00)), "150,000");
        assert_eq!(grouped(dec!(-2500)), "-2,500");
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("Your portfolio"), "your portfolio");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn test_join_first() {
        assert_eq!(join_first(["A", "B", "C", "D"], 3), "A, B, C");
        assert_eq!(join_first([], 3), "");
    }
}
