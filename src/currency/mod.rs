//! Display helpers for amounts expressed in a [`BudgetUnit`].

use crate::budget::BudgetUnit;

/// Separators used when rendering numbers, derived from a BCP 47 language tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    pub decimal_separator: char,
    pub grouping_separator: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            decimal_separator: '.',
            grouping_separator: ',',
        }
    }
}

impl NumberFormat {
    /// Picks separators from the language part of `tag` (`en-US`, `de_DE`, `fr`...).
    pub fn from_locale(tag: &str) -> Self {
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" | "da" | "id" | "tr" => Self {
                decimal_separator: ',',
                grouping_separator: '.',
            },
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" | "ru" => Self {
                decimal_separator: ',',
                grouping_separator: ' ',
            },
            _ => Self::default(),
        }
    }
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        _ => format!("{} ", code),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

/// Renders `amount` with `en-US` separators, e.g. `$1,250.00`, `-€3.50`, `7.50 hours`.
pub fn format_amount(unit: &BudgetUnit, amount: f64) -> String {
    format_amount_with(unit, amount, &NumberFormat::default())
}

/// Renders `amount` in the budget's unit using the given separators.
///
/// The sign is taken from the rounded value, so amounts that round to zero
/// never print as negative.
pub fn format_amount_with(unit: &BudgetUnit, amount: f64, format: &NumberFormat) -> String {
    match unit {
        BudgetUnit::Money { currency } => {
            let (negative, body) = signed_body(amount, minor_units_for(currency), format);
            let sign = if negative { "-" } else { "" };
            format!("{}{}{}", sign, symbol_for(currency), body)
        }
        BudgetUnit::Time { unit } | BudgetUnit::Numeric { unit } => {
            format!("{} {}", format_number(amount, 2, format), unit)
        }
    }
}

pub fn format_number(value: f64, precision: u8, format: &NumberFormat) -> String {
    let (negative, body) = signed_body(value, precision, format);
    if negative {
        format!("-{}", body)
    } else {
        body
    }
}

fn signed_body(value: f64, precision: u8, format: &NumberFormat) -> (bool, String) {
    let digits = format!("{:.*}", precision as usize, value.abs());
    let negative = value < 0.0 && digits.chars().any(|ch| ch.is_ascii_digit() && ch != '0');
    let body = match digits.split_once('.') {
        Some((int_part, fraction)) => format!(
            "{}{}{}",
            group_integer(int_part, format.grouping_separator),
            format.decimal_separator,
            fraction
        ),
        None => group_integer(&digits, format.grouping_separator),
    };
    (negative, body)
}

fn group_integer(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}
