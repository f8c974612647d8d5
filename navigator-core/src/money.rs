//! Rupee parsing and formatting.
//!
//! Indian figures group the last three digits and then pairs, so one lakh
//! prints as `1,00,000` and one crore as `1,00,00,000`. Everything here
//! formats that way and parses it back.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::error;

use crate::calculations::common::round_half_up;

#[derive(Debug, Error)]
#[error("invalid rupee amount '{input}'")]
pub struct ParseAmountError {
    pub input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Parses a rupee amount, tolerating a leading `₹`, Indian digit grouping,
/// and surrounding whitespace. Blank input reads as zero.
pub fn parse_amount(input: &str) -> Result<Decimal, ParseAmountError> {
    let trimmed = input.trim();
    let stripped = trimmed.strip_prefix('₹').unwrap_or(trimmed);
    let cleaned: String = stripped.chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(Decimal::ZERO);
    }
    cleaned.parse::<Decimal>().map_err(|source| {
        error!(input, "failed to parse rupee amount");
        ParseAmountError {
            input: input.to_string(),
            source,
        }
    })
}

/// Formats an amount to the paisa, e.g. `₹12,34,567.89`.
///
/// # Example
///
/// ```
/// use navigator_core::money::format_inr;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_inr(Decimal::from(1_000_000)), "₹10,00,000.00");
/// ```
pub fn format_inr(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, paise) = match text.split_once('.') {
        Some(parts) => parts,
        None => (text.as_str(), "00"),
    };
    format!("{sign}₹{}.{paise}", group_indian(whole))
}

/// Formats an amount rounded to the nearest rupee, e.g. `₹1,50,000`.
pub fn format_inr_whole(value: Decimal) -> String {
    let rounded =
        value.round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}₹{}", group_indian(&rounded.abs().to_string()))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 2 {
        groups.push(&head[end - 2..end]);
        end -= 2;
    }
    groups.push(&head[..end]);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}
