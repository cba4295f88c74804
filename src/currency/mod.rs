//! Money parsing and formatting.
//!
//! Amounts are carried as integer minor units (paise for INR). Parsing accepts
//! human-entered text such as `"₹ 1,234.50"` and rounds anything finer than a
//! minor unit half-up. Formatting always renders two decimals, so `parse` and
//! `format` are intentionally not exact inverses for inputs with extra precision.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Decimal places carried by the minor unit.
pub const MINOR_UNIT_DIGITS: u32 = 2;
const MINOR_PER_MAJOR: u64 = 100;
/// Largest amount a single expense may carry, `₹99,999,999,999.99`.
pub const MAX_AMOUNT_MINOR: i64 = 9_999_999_999_999;

/// How digits of the major unit are grouped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GroupingStyle {
    /// `1,234,567`
    Thousands,
    /// `12,34,567`: last three digits, then pairs.
    Indian,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub currency_code: String,
    pub symbol: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: GroupingStyle,
}

impl LocaleConfig {
    /// The fixed locale the application ships with.
    pub fn en_in() -> Self {
        Self {
            language_tag: "en-IN".into(),
            currency_code: "INR".into(),
            symbol: "₹".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            grouping: GroupingStyle::Indian,
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self::en_in()
    }
}

/// Parses a rupee string into paise using the default locale.
///
/// Returns `None` for blank or malformed input and for values outside
/// `1..=MAX_AMOUNT_MINOR` after rounding.
pub fn parse_minor_units(input: &str) -> Option<i64> {
    parse_minor_units_with(&LocaleConfig::default(), input)
}

pub fn parse_minor_units_with(locale: &LocaleConfig, input: &str) -> Option<i64> {
    let mut sanitized = input.replace(locale.symbol.as_str(), "");
    sanitized.retain(|ch| ch != locale.grouping_separator);
    if locale.decimal_separator != '.' {
        sanitized = sanitized.replace(locale.decimal_separator, ".");
    }
    let sanitized = sanitized.trim();
    if sanitized.is_empty() {
        return None;
    }
    let value = parse_decimal(sanitized)?;
    if value.is_sign_negative() {
        return None;
    }
    let minor = value
        .round_dp_with_strategy(MINOR_UNIT_DIGITS, RoundingStrategy::MidpointAwayFromZero)
        .checked_mul(Decimal::ONE_HUNDRED)?
        .to_i64()?;
    (1..=MAX_AMOUNT_MINOR).contains(&minor).then_some(minor)
}

/// Formats paise as a currency string in the default locale, e.g. `₹1,234.50`.
pub fn format_minor_units(minor: i64) -> String {
    format_minor_units_with(&LocaleConfig::default(), minor)
}

pub fn format_minor_units_with(locale: &LocaleConfig, minor: i64) -> String {
    let magnitude = minor.unsigned_abs();
    let major = magnitude / MINOR_PER_MAJOR;
    let fraction = magnitude % MINOR_PER_MAJOR;
    let digits = major.to_string();
    let grouped = match locale.grouping {
        GroupingStyle::Thousands => group_thousands(&digits, locale.grouping_separator),
        GroupingStyle::Indian => group_indian(&digits, locale.grouping_separator),
    };
    let sign = if minor < 0 { "-" } else { "" };
    format!(
        "{sign}{}{grouped}{}{fraction:02}",
        locale.symbol, locale.decimal_separator
    )
}

fn group_thousands(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

fn group_indian(digits: &str, separator: char) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 2);
    for (idx, ch) in head.chars().enumerate() {
        if idx != 0 && (head.len() - idx) % 2 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped.push(separator);
    grouped.push_str(tail);
    grouped
}

/// Renders a calendar date as `dd MMM yyyy`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Renders a time of day as `hh:mm AM`.
pub fn format_time(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

/// Calendar date of `instant` as observed in `zone`.
pub fn local_date(instant: DateTime<Utc>, zone: Tz) -> NaiveDate {
    instant.with_timezone(&zone).date_naive()
}

/// Wall-clock time of `instant` as observed in `zone`.
pub fn local_time(instant: DateTime<Utc>, zone: Tz) -> NaiveTime {
    instant.with_timezone(&zone).time()
}

/// Accepts `[+-]digits[.digits]` with an optional `e`/`E` exponent.
fn parse_decimal(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = match text.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (text, None),
    };
    let (sign, unsigned) = match mantissa.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", mantissa.strip_prefix('+').unwrap_or(mantissa)),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return None;
    }
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    match exponent {
        None => {
            // Only the first dropped digit decides a half-up rounding.
            let kept = &frac_part[..frac_part.len().min(MINOR_UNIT_DIGITS as usize + 1)];
            Decimal::from_str(&join_mantissa(sign, int_part, kept)).ok()
        }
        Some(exponent) => {
            let mantissa = join_mantissa(sign, int_part, frac_part);
            Decimal::from_scientific(&format!("{mantissa}e{exponent}")).ok()
        }
    }
}

fn join_mantissa(sign: &str, int_part: &str, frac_part: &str) -> String {
    if frac_part.is_empty() {
        format!("{sign}{int_part}")
    } else {
        format!("{sign}{int_part}.{frac_part}")
    }
}
