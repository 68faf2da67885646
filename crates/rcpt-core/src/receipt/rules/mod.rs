//! Rule tables and helpers for receipt lines.

pub mod classifier;
pub mod patterns;
pub mod quantity;
pub mod total;

pub use classifier::{filter_receipt_lines, ClassifyMode, LineClassifier};
pub use patterns::{PatternSet, PriceMatch, DEFAULT_PATTERNS};
pub use quantity::{clean_name, extract_quantity, is_product_code};
pub use total::{detect_total, reconcile};
