//! Receipt data models produced by the line-item extractor.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single extracted receipt entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product name as printed, cleaned of quantities and prices.
    pub name: String,

    /// Number of units (at least 1).
    pub quantity: u32,

    /// Unit price. Zero means no price was found on the receipt.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: u32, price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.max(1),
            price,
        }
    }

    /// Whether the price still has to be entered by hand.
    pub fn needs_manual_price(&self) -> bool {
        self.price.is_zero()
    }

    /// Price multiplied by quantity, saturating at the `Decimal` bounds.
    pub fn line_total(&self) -> Decimal {
        self.price.saturating_mul(Decimal::from(self.quantity))
    }
}

/// The total printed on the receipt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptTotal {
    /// Detected amount.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,

    /// Line the amount was read from.
    pub source: String,

    /// Index of that line among the non-empty receipt lines.
    pub line_index: usize,
}

/// Comparison of the extracted items against the stated total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    #[serde(with = "rust_decimal::serde::float")]
    pub stated_total: Decimal,

    /// Sum of price × quantity over all items.
    #[serde(with = "rust_decimal::serde::float")]
    pub items_total: Decimal,

    /// `items_total - stated_total`.
    #[serde(with = "rust_decimal::serde::float")]
    pub difference: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub tolerance: Decimal,

    pub within_tolerance: bool,
}

/// Why a line did not become an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// Shorter than the minimum line length.
    TooShort,
    /// Total, tax, payment or similar keyword followed by an amount.
    FinancialSummary,
    /// Payment method or receipt boilerplate phrase.
    Boilerplate,
    /// Web address, phone number or store address.
    ContactInfo,
    /// Till, cashier, loyalty or order metadata.
    Operational,
    /// Nothing but a date and/or time.
    DateTime,
    /// Separator made of `*`, `-`, `=` or `_`.
    Decoration,
    /// Digits and punctuation only (barcodes, codes).
    NoLetters,
    /// All-uppercase heading.
    UppercaseHeader,
    /// Table column heading.
    ColumnHeader,
    /// Passed the filters but matched no extraction strategy.
    NoItemShape,
    /// Same normalized name and price as an earlier item.
    Duplicate,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::TooShort => "too short",
            SkipReason::FinancialSummary => "financial summary",
            SkipReason::Boilerplate => "boilerplate",
            SkipReason::ContactInfo => "contact info",
            SkipReason::Operational => "operational metadata",
            SkipReason::DateTime => "date/time",
            SkipReason::Decoration => "decoration",
            SkipReason::NoLetters => "no letters",
            SkipReason::UppercaseHeader => "uppercase header",
            SkipReason::ColumnHeader => "column header",
            SkipReason::NoItemShape => "no item shape",
            SkipReason::Duplicate => "duplicate",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// A line left out of the result, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedLine {
    /// Index among the non-empty receipt lines.
    pub line_index: usize,
    pub line: String,
    pub reason: SkipReason,
}

/// Result of extracting items from one receipt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Deduplicated items in first-seen order.
    pub items: Vec<LineItem>,

    /// Lines that produced no item.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<SkippedLine>,

    /// Stated total, if one was printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<ReceiptTotal>,

    /// Items sum versus stated total.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconciliation: Option<Reconciliation>,

    /// Advisory messages for the caller.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl ExtractionResult {
    /// Sum of price × quantity over all items.
    pub fn items_total(&self) -> Decimal {
        sum_line_totals(&self.items)
    }

    /// Number of items still waiting for a manual price.
    pub fn manual_price_count(&self) -> usize {
        self.items.iter().filter(|i| i.needs_manual_price()).count()
    }
}

/// Saturating sum of price × quantity.
pub fn sum_line_totals(items: &[LineItem]) -> Decimal {
    items
        .iter()
        .map(LineItem::line_total)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Split OCR text into trimmed, non-empty lines.
pub fn split_receipt_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect()
}
