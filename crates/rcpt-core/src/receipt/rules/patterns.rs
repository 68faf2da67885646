//! Regex pattern tables for receipt line classification and extraction.
//!
//! Price and financial-summary patterns depend on the configured currency
//! symbols and decimal separator, so they live in a [`PatternSet`] built
//! from a [`LocaleConfig`]. Everything else is locale independent.

use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::models::config::LocaleConfig;

/// Largest amount read as a price. Longer digit runs are barcodes or OCR
/// noise, and capping them keeps item sums far from the `Decimal` range.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

lazy_static! {
    /// Lazily compiled patterns for the default locale (`£ € $`, `.`).
    pub static ref DEFAULT_PATTERNS: PatternSet =
        PatternSet::new(&LocaleConfig::default()).unwrap();

    // Payment method and receipt boilerplate
    pub static ref BOILERPLATE: Regex = Regex::new(
        r"(?i)contactless|chip\s*(?:&|and|\+)\s*pin|thank\s*you|\bthanks\b|receipt|customer\s+copy|merchant\s+copy"
    ).unwrap();

    // Web, phone and store address lines
    pub static ref CONTACT_INFO: Regex = Regex::new(
        r"(?i)^www\.|\.com|\.co\.uk|\btel\s*:|\bphone\s*:|^(?:store|branch|location|address|since|plc|ltd|limited)\b"
    ).unwrap();

    // Till and order metadata
    pub static ref OPERATIONAL: Regex = Regex::new(
        r"(?i)\b(?:delivery|take\s?away|collection|offers?|promotions?|loyalty|points|rewards|cashier|operator|till|terminal|ref|transaction|auth\s*code)\b|\border\s*#"
    ).unwrap();

    // Lines holding nothing but a date and/or a time
    pub static ref DATE_TIME_ONLY: Regex = Regex::new(
        r"(?i)^(?:(?:date|time)\s*:?\s*)?(?:(?:\d{1,2}[/.\-]\d{1,2}[/.\-](?:\d{4}|\d{2})|\d{4}-\d{2}-\d{2})(?:[\s,]+\d{1,2}:\d{2}(?::\d{2})?(?:\s*[ap]m)?)?|\d{1,2}:\d{2}(?::\d{2})?(?:\s*[ap]m)?)\s*$"
    ).unwrap();

    pub static ref DECORATION: Regex = Regex::new(r"^[\s*\-=_]+$").unwrap();

    // Digits, whitespace and punctuation only. Currency symbols are not
    // punctuation, so a bare "£1.20" survives for the two-line pattern.
    pub static ref NO_LETTERS: Regex = Regex::new(r"^[\d\s\p{P}\p{Sm}]+$").unwrap();

    pub static ref UPPERCASE_HEADER: Regex = Regex::new(r"^[\p{Lu}\s&'.\-]+$").unwrap();

    // Column headings, parse mode
    pub static ref COLUMN_HEADER: Regex = Regex::new(
        r"(?i)^(?:amount|qty|quantity|price|items?|description)\b"
    ).unwrap();

    // Column headings, manual line-selection mode
    pub static ref COLUMN_HEADER_STRICT: Regex = Regex::new(
        r"(?i)^(?:amount|qty|quantity|price|items?|description|opening|closing|balance|account)\b"
    ).unwrap();

    pub static ref MEANINGFUL_TEXT: Regex = Regex::new(r"\p{L}{2,}").unwrap();

    // Quantity shapes, tried in this order
    pub static ref QTY_PREFIX_X: Regex = Regex::new(r"^(\d+)\s*[xX×]\s+(.+)$").unwrap();
    pub static ref QTY_PREFIX: Regex = Regex::new(r"^(\d+)\s+(.+)$").unwrap();
    pub static ref QTY_SUFFIX_X: Regex = Regex::new(r"^(.+?)\s+[xX×]\s*(\d+)$").unwrap();
    pub static ref QTY_SUFFIX_LABEL: Regex = Regex::new(
        r"(?i)^(.+?)\s+qty\s*[:.]?\s*(\d+)$"
    ).unwrap();

    // "2 x " left at the front of a name
    pub static ref QTY_REMNANT: Regex = Regex::new(r"^\d+\s*[xX×]\s+").unwrap();

    pub static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();

    pub static ref TOTAL_KEYWORD: Regex = Regex::new(r"(?i)total").unwrap();
}

/// A price token found in a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceMatch {
    /// Parsed amount.
    pub value: Decimal,
    /// Byte offset of the token start.
    pub start: usize,
    /// Byte offset one past the token end.
    pub end: usize,
}

impl PriceMatch {
    /// The line with the price token cut out, whitespace trimmed.
    pub fn remainder(&self, line: &str) -> String {
        let mut rest = String::with_capacity(line.len());
        rest.push_str(&line[..self.start]);
        rest.push(' ');
        rest.push_str(&line[self.end..]);
        rest.trim().to_string()
    }
}

/// Locale-dependent patterns compiled once and shared by the classifier
/// and the item parser.
#[derive(Debug, Clone)]
pub struct PatternSet {
    price: Regex,
    financial_summary: Regex,
    decimal_separator: char,
}

impl PatternSet {
    /// Compile the price and financial-summary patterns for a locale.
    pub fn new(locale: &LocaleConfig) -> Result<Self> {
        locale.validate()?;

        let symbols: String = locale
            .currency_symbols
            .iter()
            .map(|c| regex::escape(&c.to_string()))
            .collect();
        let sym = format!("[{}]", symbols);
        let sep = regex::escape(&locale.decimal_separator.to_string());

        let price = Regex::new(&format!(
            r"(?:^|\s)(?P<price>{sym}\s*(?P<lead>\d+(?:{sep}\d{{2}})?)|(?P<trail>\d+{sep}\d{{2}})\s*{sym}?)(?:\s|$)"
        ))?;

        let financial_summary = Regex::new(&format!(
            r"(?i)\b(?:sub[\s\-]?total|total|balance|discount|change|payment|cash|card|visa|mastercard|vat|tax|service\s+charge|tip|gratuity)\b.*?(?:{sym}\s*\d|\d+{sep}\d{{2}})"
        ))?;

        Ok(Self {
            price,
            financial_summary,
            decimal_separator: locale.decimal_separator,
        })
    }

    /// Find the first price token in a line.
    pub fn find_price(&self, line: &str) -> Option<PriceMatch> {
        let caps = self.price.captures(line)?;
        let token = caps.name("price")?;
        let number = caps.name("lead").or_else(|| caps.name("trail"))?;
        let value = self.parse_price(number.as_str())?;

        // The trailing-symbol branch may have swallowed spaces before the
        // boundary; keep the span tight.
        let token_text = token.as_str().trim_end();
        Some(PriceMatch {
            value,
            start: token.start(),
            end: token.start() + token_text.len(),
        })
    }

    /// Whether the line contains a price token.
    pub fn has_price(&self, line: &str) -> bool {
        self.price.is_match(line)
    }

    /// Whether the line is a total/tax/payment line carrying an amount.
    pub fn is_financial_summary(&self, line: &str) -> bool {
        self.financial_summary.is_match(line)
    }

    /// Parse a bare number written with the locale's decimal separator.
    /// Amounts above [`MAX_PRICE`] are not prices.
    pub fn parse_price(&self, raw: &str) -> Option<Decimal> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter_map(|c| {
                if c.is_ascii_digit() {
                    Some(c)
                } else if c == self.decimal_separator {
                    Some('.')
                } else {
                    None
                }
            })
            .collect();

        if normalized.is_empty() {
            return None;
        }

        Decimal::from_str(&normalized)
            .ok()
            .filter(|value| *value <= MAX_PRICE)
    }

    pub fn decimal_separator(&self) -> char {
        self.decimal_separator
    }
}
