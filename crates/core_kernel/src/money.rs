//! Currency formatting and percentage arithmetic
//!
//! Amounts are displayed with the Indian digit-grouping convention: the
//! rightmost three digits form the last group and the remaining digits are
//! grouped in pairs (`12,34,567` rather than `1,234,567`).
//!
//! Formatting is display-only. No rounding happens here; callers round
//! upstream when they need to.

use rust_decimal::Decimal;

use crate::error::CoreError;

/// Formats raw numeric text with Indian digit grouping
///
/// Everything except digits and decimal points is stripped first. Only the
/// text between the first and second decimal point is kept as the decimal
/// part, and it is appended unchanged. Empty input, or input that is nothing
/// but zeros, yields an empty string.
///
/// # Example
///
/// ```rust
/// use core_kernel::format_indian;
///
/// assert_eq!(format_indian("1234567"), "12,34,567");
/// assert_eq!(format_indian("1000"), "1,000");
/// assert_eq!(format_indian("98765.4321"), "98,765.4321");
/// assert_eq!(format_indian(""), "");
/// ```
pub fn format_indian(raw: &str) -> String {
    let number: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if number.chars().all(|c| c == '0' || c == '.') {
        return String::new();
    }

    let mut parts = number.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next().unwrap_or_default();

    let grouped = group_indian(whole);
    if fraction.is_empty() {
        grouped
    } else {
        format!("{}.{}", grouped, fraction)
    }
}

/// Formats a decimal amount with Indian digit grouping
///
/// Zero formats as an empty string. Trailing zeros in the scale are dropped
/// (`600000.00` formats as `6,00,000`).
pub fn format_amount(amount: Decimal) -> String {
    if amount.is_zero() {
        return String::new();
    }
    format_indian(&amount.normalize().to_string())
}

fn group_indian(whole: &str) -> String {
    if whole.len() <= 3 {
        return whole.to_string();
    }

    let (head, last_three) = whole.split_at(whole.len() - 3);
    let mut out = String::with_capacity(whole.len() + whole.len() / 2);

    // The leading group is one digit when the head has odd length
    let lead = head.len() % 2;
    if lead == 1 {
        out.push_str(&head[..1]);
    }
    for (i, pair) in head.as_bytes()[lead..].chunks(2).enumerate() {
        if i > 0 || lead == 1 {
            out.push(',');
        }
        out.extend(pair.iter().map(|b| *b as char));
    }

    out.push(',');
    out.push_str(last_three);
    out
}

/// Computes `percentage` percent of `base`
///
/// The percentage is scaled to a fraction before multiplying, so any share
/// of at most 100% stays within range however large the base is.
///
/// # Arguments
///
/// * `base` - The amount being divided up
/// * `percentage` - Share of the base, nominally 0-100
///
/// # Errors
///
/// Returns `CoreError::Overflow` if the product does not fit in a decimal
///
/// # Example
///
/// ```rust
/// use core_kernel::percent_of;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(percent_of(dec!(1000000), dec!(60)).unwrap(), dec!(600000));
/// ```
pub fn percent_of(base: Decimal, percentage: Decimal) -> Result<Decimal, CoreError> {
    percentage
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|fraction| base.checked_mul(fraction))
        .ok_or_else(|| CoreError::overflow(format!("{}% of {}", percentage, base)))
}
