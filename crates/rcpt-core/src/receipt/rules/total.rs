//! Stated-total detection and reconciliation against extracted items.

use rust_decimal::Decimal;

use crate::models::config::ReconciliationConfig;
use crate::models::receipt::{sum_line_totals, LineItem, ReceiptTotal, Reconciliation};

use super::patterns::{PatternSet, TOTAL_KEYWORD};

/// First line mentioning "total" that also carries a price.
///
/// Lines are scanned unfiltered; the first price on the matching line is
/// taken as the total.
pub fn detect_total<S: AsRef<str>>(lines: &[S], patterns: &PatternSet) -> Option<ReceiptTotal> {
    lines.iter().enumerate().find_map(|(index, line)| {
        let line = line.as_ref();
        if !TOTAL_KEYWORD.is_match(line) {
            return None;
        }

        patterns.find_price(line).map(|m| ReceiptTotal {
            value: m.value,
            source: line.to_string(),
            line_index: index,
        })
    })
}

/// Compare the sum of price × quantity with the stated total.
///
/// The allowed difference is `max(min_tolerance, tolerance_ratio × total)`.
pub fn reconcile(
    total: &ReceiptTotal,
    items: &[LineItem],
    config: &ReconciliationConfig,
) -> Reconciliation {
    let items_total = sum_line_totals(items);
    let difference = items_total.saturating_sub(total.value);
    let tolerance = total
        .value
        .abs()
        .saturating_mul(config.tolerance_ratio)
        .max(config.min_tolerance);

    Reconciliation {
        stated_total: total.value,
        items_total,
        difference,
        tolerance,
        within_tolerance: difference.abs() <= tolerance,
    }
}
