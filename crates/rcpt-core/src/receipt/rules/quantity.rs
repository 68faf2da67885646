//! Quantity extraction and item-name cleanup.

use regex::Regex;

use crate::models::config::ParserConfig;

use super::patterns::{
    MEANINGFUL_TEXT, QTY_PREFIX, QTY_PREFIX_X, QTY_REMNANT, QTY_SUFFIX_LABEL, QTY_SUFFIX_X,
    WHITESPACE_RUN,
};

/// Split a name candidate into quantity and remaining name.
///
/// Shapes are tried in order: `2 x Milk`, `2 Milk`, `Milk x 2`,
/// `Milk qty 2`. The first shape that matches wins; without a match the
/// quantity is 1 and the text is returned unchanged. Zero or overflowing
/// quantities also fall back to 1.
pub fn extract_quantity(text: &str) -> (u32, String) {
    let text = text.trim();

    // (pattern, quantity group, name group)
    let shapes: [(&Regex, usize, usize); 4] = [
        (&*QTY_PREFIX_X, 1, 2),
        (&*QTY_PREFIX, 1, 2),
        (&*QTY_SUFFIX_X, 2, 1),
        (&*QTY_SUFFIX_LABEL, 2, 1),
    ];

    for (pattern, qty_group, name_group) in shapes {
        if let Some(caps) = pattern.captures(text) {
            let quantity = caps[qty_group]
                .parse::<u32>()
                .ok()
                .filter(|&q| q > 0)
                .unwrap_or(1);
            return (quantity, caps[name_group].trim().to_string());
        }
    }

    (1, text.to_string())
}

/// Whether the line starts with a barcode or SKU rather than a quantity.
pub fn is_product_code(line: &str, config: &ParserConfig) -> bool {
    let Some(first) = line.split_whitespace().next() else {
        return false;
    };

    if first.len() < config.product_code_min_digits || !first.chars().all(|c| c.is_ascii_digit())
    {
        return false;
    }

    // Too long for u64 is certainly a code.
    first
        .parse::<u64>()
        .map(|n| n > config.product_code_threshold)
        .unwrap_or(true)
}

/// Strip `2 x ` remnants, trim non-letters from both ends and collapse
/// internal whitespace.
pub fn clean_name(raw: &str) -> String {
    let without_qty = QTY_REMNANT.replace(raw.trim(), "");
    let trimmed = without_qty.trim_matches(|c: char| !c.is_alphabetic());
    WHITESPACE_RUN.replace_all(trimmed, " ").into_owned()
}

pub fn has_letter(s: &str) -> bool {
    s.chars().any(char::is_alphabetic)
}

/// Two or more consecutive letters.
pub fn has_letter_run(s: &str) -> bool {
    MEANINGFUL_TEXT.is_match(s)
}

pub fn is_numeric(s: &str) -> bool {
    let s = s.trim();
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantity_shapes() {
        assert_eq!(extract_quantity("2 x Milk"), (2, "Milk".to_string()));
        assert_eq!(extract_quantity("3x Yoghurt"), (3, "Yoghurt".to_string()));
        assert_eq!(extract_quantity("2 Eggs"), (2, "Eggs".to_string()));
        assert_eq!(extract_quantity("Eggs x 2"), (2, "Eggs".to_string()));
        assert_eq!(extract_quantity("Eggs X2"), (2, "Eggs".to_string()));
        assert_eq!(extract_quantity("Oranges qty 4"), (4, "Oranges".to_string()));
        assert_eq!(extract_quantity("Oranges QTY: 4"), (4, "Oranges".to_string()));
        assert_eq!(extract_quantity("Milk"), (1, "Milk".to_string()));
    }

    #[test]
    fn test_quantity_fallbacks() {
        assert_eq!(extract_quantity("0 x Milk"), (1, "Milk".to_string()));
        assert_eq!(
            extract_quantity("5012345678900 Coca Cola"),
            (1, "Coca Cola".to_string())
        );
        // A unit glued to the number is not a quantity.
        assert_eq!(extract_quantity("500g Butter"), (1, "500g Butter".to_string()));
        // Needs whitespace before the x.
        assert_eq!(extract_quantity("Box 2"), (1, "Box 2".to_string()));
    }

    #[test]
    fn test_product_code() {
        let config = ParserConfig::default();

        assert!(is_product_code("5012345678900 Coca Cola £1.00", &config));
        assert!(is_product_code("4021 Bananas", &config));
        assert!(is_product_code("123456789012345678901234 Thing", &config));
        assert!(!is_product_code("1000 Grains", &config));
        assert!(!is_product_code("12 Eggs", &config));
        assert!(!is_product_code("A123456 Item", &config));
        assert!(!is_product_code("", &config));
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("2 x Milk"), "Milk");
        assert_eq!(clean_name("  - Fresh   Bananas *"), "Fresh Bananas");
        assert_eq!(clean_name("Item 7"), "Item");
        assert_eq!(clean_name("123"), "");
    }

    #[test]
    fn test_text_predicates() {
        assert!(has_letter("a1"));
        assert!(!has_letter("12.50"));
        assert!(has_letter_run("ab"));
        assert!(!has_letter_run("a1b"));
        assert!(is_numeric("12.50"));
        assert!(!is_numeric("12a"));
        assert!(!is_numeric(" "));
    }
}
