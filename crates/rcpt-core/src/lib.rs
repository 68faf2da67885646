//! Core library for turning receipt OCR text into line items.
//!
//! This crate provides:
//! - Line classification (totals, tax, addresses, codes and other noise)
//! - Item extraction with same-line, two-line and name-only strategies
//! - Duplicate removal and stated-total reconciliation
//! - Locale configuration for currency symbols and decimal separator

pub mod error;
pub mod models;
pub mod receipt;

pub use error::{RcptError, Result};
pub use models::config::RcptConfig;
pub use models::receipt::{ExtractionResult, LineItem, ReceiptTotal, Reconciliation, SkipReason, SkippedLine};
pub use receipt::{filter_receipt_lines, parse_receipt_text, parse_selected_lines, ReceiptParser};
