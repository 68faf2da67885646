//! Data models for receipt extraction.

pub mod config;
pub mod receipt;

pub use config::{ClassifierConfig, LocaleConfig, ParserConfig, RcptConfig, ReconciliationConfig};
pub use receipt::{
    split_receipt_lines, ExtractionResult, LineItem, ReceiptTotal, Reconciliation, SkipReason,
    SkippedLine,
};
