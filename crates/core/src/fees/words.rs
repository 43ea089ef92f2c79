//! Amount-in-words formatting for receipts.
//!
//! Uses the Indian numbering scale (crore, lakh, thousand). The output is
//! the full receipt phrase: `"One Thousand Five Hundred Rupees Only"`, with
//! an `"and Fifty Paise"` clause when the fractional part is non-zero.

use rust_decimal::Decimal;

use gurukul_shared::types::split_rupees_paise;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u64 = 10_000_000;
const LAKH: u64 = 100_000;

/// Formats a rupee amount as the words printed on a receipt.
///
/// The amount is rounded to paise first; negative inputs read as zero.
///
/// ```
/// use gurukul_core::fees::amount_in_words;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(amount_in_words(dec!(0)), "Zero Rupees Only");
/// assert_eq!(
///     amount_in_words(dec!(1500.00)),
///     "One Thousand Five Hundred Rupees Only"
/// );
/// assert_eq!(
///     amount_in_words(dec!(100000.50)),
///     "One Lakh Rupees and Fifty Paise Only"
/// );
/// ```
#[must_use]
pub fn amount_in_words(amount: Decimal) -> String {
    let (rupees, paise) = split_rupees_paise(amount);

    let mut phrase = format!("{} Rupees", integer_words(rupees));
    if paise > 0 {
        phrase.push_str(&format!(" and {} Paise", two_digit_words(u64::from(paise))));
    }
    phrase.push_str(" Only");
    phrase
}

/// Spells out a non-negative integer on the Indian scale.
///
/// Crores recurse, so amounts past 100 crore read naturally
/// ("One Hundred Crore ...").
fn integer_words(n: u64) -> String {
    if n == 0 {
        return "Zero".to_string();
    }

    let mut parts: Vec<String> = Vec::new();
    let mut rest = n;

    let crores = rest / CRORE;
    rest %= CRORE;
    if crores > 0 {
        parts.push(format!("{} Crore", integer_words(crores)));
    }

    let lakhs = rest / LAKH;
    rest %= LAKH;
    if lakhs > 0 {
        parts.push(format!("{} Lakh", two_digit_words(lakhs)));
    }

    let thousands = rest / 1000;
    rest %= 1000;
    if thousands > 0 {
        parts.push(format!("{} Thousand", two_digit_words(thousands)));
    }

    let hundreds = rest / 100;
    rest %= 100;
    if hundreds > 0 {
        parts.push(format!("{} Hundred", ONES[hundreds as usize]));
    }

    if rest > 0 {
        parts.push(two_digit_words(rest));
    }

    parts.join(" ")
}

/// Spells out 1..=99.
fn two_digit_words(n: u64) -> String {
    debug_assert!(n < 100);
    if n < 20 {
        ONES[n as usize].to_string()
    } else {
        let tens = TENS[(n / 10) as usize];
        match n % 10 {
            0 => tens.to_string(),
            ones => format!("{tens} {}", ONES[ones as usize]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0), "Zero Rupees Only")]
    #[case(dec!(1), "One Rupees Only")]
    #[case(dec!(19), "Nineteen Rupees Only")]
    #[case(dec!(20), "Twenty Rupees Only")]
    #[case(dec!(21), "Twenty One Rupees Only")]
    #[case(dec!(105), "One Hundred Five Rupees Only")]
    #[case(dec!(710), "Seven Hundred Ten Rupees Only")]
    #[case(dec!(1500.00), "One Thousand Five Hundred Rupees Only")]
    #[case(dec!(45000), "Forty Five Thousand Rupees Only")]
    #[case(dec!(100000), "One Lakh Rupees Only")]
    #[case(dec!(100000.50), "One Lakh Rupees and Fifty Paise Only")]
    #[case(dec!(2350075), "Twenty Three Lakh Fifty Thousand Seventy Five Rupees Only")]
    #[case(dec!(10000000), "One Crore Rupees Only")]
    #[case(
        dec!(12345678.90),
        "One Crore Twenty Three Lakh Forty Five Thousand Six Hundred Seventy Eight Rupees and Ninety Paise Only"
    )]
    fn amount_formats_as_expected(#[case] amount: Decimal, #[case] expected: &str) {
        assert_eq!(amount_in_words(amount), expected);
    }

    #[test]
    fn test_paise_only_amount() {
        assert_eq!(amount_in_words(dec!(0.75)), "Zero Rupees and Seventy Five Paise Only");
        assert_eq!(amount_in_words(dec!(0.05)), "Zero Rupees and Five Paise Only");
    }

    #[test]
    fn test_rounding_to_paise_before_formatting() {
        // 10.999 rounds to 11.00, so no paise clause.
        assert_eq!(amount_in_words(dec!(10.999)), "Eleven Rupees Only");
        assert_eq!(amount_in_words(dec!(10.994)), "Ten Rupees and Ninety Nine Paise Only");
    }

    #[test]
    fn test_negative_reads_as_zero() {
        assert_eq!(amount_in_words(dec!(-42)), "Zero Rupees Only");
    }

    #[test]
    fn test_hundred_crore_recursion() {
        assert_eq!(
            amount_in_words(dec!(1000000000)),
            "One Hundred Crore Rupees Only"
        );
        assert_eq!(
            amount_in_words(dec!(12500000000)),
            "One Thousand Two Hundred Fifty Crore Rupees Only"
        );
    }
}
