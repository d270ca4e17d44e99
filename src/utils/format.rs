use crate::utils::error::{Result, StorefrontError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number formatting conventions for rendered prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PriceLocale {
    #[default]
    #[serde(rename = "es-CO")]
    EsCo,
    #[serde(rename = "en-US")]
    EnUs,
}

impl PriceLocale {
    fn separators(self) -> (char, char) {
        match self {
            PriceLocale::EsCo => ('.', ','),
            PriceLocale::EnUs => (',', '.'),
        }
    }
}

impl fmt::Display for PriceLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceLocale::EsCo => f.write_str("es-CO"),
            PriceLocale::EnUs => f.write_str("en-US"),
        }
    }
}

impl FromStr for PriceLocale {
    type Err = StorefrontError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "es-CO" => Ok(PriceLocale::EsCo),
            "en-US" => Ok(PriceLocale::EnUs),
            other => Err(StorefrontError::InvalidConfigValueError {
                field: "site.locale".to_string(),
                value: other.to_string(),
                reason: "Supported locales: es-CO, en-US".to_string(),
            }),
        }
    }
}

/// Formats a number like `toLocaleString()` with default options:
/// at most three fraction digits, no trailing zeros, grouped thousands.
pub fn format_price(value: f64, locale: PriceLocale) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let (group_sep, decimal_sep) = locale.separators();
    let scaled = (value.abs() * 1000.0).round() as u128;
    let integer = scaled / 1000;
    let fraction = scaled % 1000;

    let digits = integer.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if value < 0.0 && scaled != 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(group_sep);
        }
        out.push(ch);
    }

    if fraction != 0 {
        let fraction = format!("{:03}", fraction);
        out.push(decimal_sep);
        out.push_str(fraction.trim_end_matches('0'));
    }

    out
}

/// Escapes text for use in element content and double-quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
