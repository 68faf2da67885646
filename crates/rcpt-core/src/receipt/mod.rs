//! Receipt line-item extraction.

pub mod dedup;
mod parser;
pub mod rules;
pub mod strategies;

pub use dedup::{dedup_key, deduplicate};
pub use parser::{parse_receipt_text, parse_selected_lines, ReceiptParser};
pub use rules::{filter_receipt_lines, ClassifyMode, LineClassifier, PatternSet};
pub use strategies::{LineStrategy, NameOnly, SameLinePrice, StrategyContext, StrategyMatch, TwoLinePrice};
