//! Duplicate item removal.

use std::collections::HashSet;

use crate::models::receipt::LineItem;

/// Normalized key: lowercase alphanumeric name plus the price to two
/// decimals. Quantity is not part of the key.
pub fn dedup_key(item: &LineItem) -> String {
    let name: String = item
        .name
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect();

    format!("{}{:.2}", name, item.price)
}

/// Keep the first item for every key.
///
/// Returns the kept items in order and the input indices that were
/// dropped. Two different products printed with the same name and price
/// collapse into one.
pub fn deduplicate(items: Vec<LineItem>) -> (Vec<LineItem>, Vec<usize>) {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(items.len());
    let mut removed = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        if seen.insert(dedup_key(&item)) {
            kept.push(item);
        } else {
            removed.push(index);
        }
    }

    (kept, removed)
}
