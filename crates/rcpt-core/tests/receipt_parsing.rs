//! End-to-end behaviour of the receipt parser on whole OCR texts.

use std::str::FromStr;

use pretty_assertions::assert_eq;
use rust_decimal::Decimal;

use rcpt_core::{filter_receipt_lines, parse_receipt_text, LineItem, ReceiptParser};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const CORNER_SHOP: &str = "\
CORNER SHOP
12 High Street
Tel: 01632 960123
02/03/2024 09:15
Receipt #4471
--------------------
2 x Milk £1.50
Bread
£1.20
5012345678900 Coca Cola £1.00
Eggs x 2 £3.00
Fresh Bananas
Apple £0.50
Apple £0.50
SUBTOTAL £8.20
TOTAL £8.20
VISA £8.20
Contactless
THANK YOU FOR SHOPPING
";

#[test]
fn parsing_is_idempotent() {
    assert_eq!(parse_receipt_text(CORNER_SHOP), parse_receipt_text(CORNER_SHOP));
}

#[test]
fn full_receipt_items() {
    assert_eq!(
        parse_receipt_text(CORNER_SHOP),
        vec![
            LineItem::new("High Street", 12, Decimal::ZERO),
            LineItem::new("Milk", 2, dec("1.50")),
            LineItem::new("Bread", 1, dec("1.20")),
            LineItem::new("Coca Cola", 1, dec("1.00")),
            LineItem::new("Eggs", 2, dec("3.00")),
            LineItem::new("Fresh Bananas", 1, Decimal::ZERO),
            LineItem::new("Apple", 1, dec("0.50")),
        ]
    );
}

#[test]
fn noise_lines_never_become_items() {
    assert_eq!(parse_receipt_text("TOTAL £45.00"), vec![]);
    assert_eq!(parse_receipt_text("VISA £45.00"), vec![]);
    assert_eq!(
        parse_receipt_text("Milk £1.50\nTOTAL £45.00\nVISA £45.00"),
        vec![LineItem::new("Milk", 1, dec("1.50"))]
    );
}

#[test]
fn same_line_extraction() {
    assert_eq!(
        parse_receipt_text("2 x Milk £1.50"),
        vec![LineItem::new("Milk", 2, dec("1.50"))]
    );
}

#[test]
fn two_line_extraction() {
    assert_eq!(
        parse_receipt_text("Bread\n£1.20"),
        vec![LineItem::new("Bread", 1, dec("1.20"))]
    );
    assert_eq!(
        parse_receipt_text("Bread\r\n£1.20\r\n"),
        vec![LineItem::new("Bread", 1, dec("1.20"))]
    );
}

#[test]
fn product_code_is_not_a_quantity() {
    assert_eq!(
        parse_receipt_text("5012345678900 Coca Cola £1.00"),
        vec![LineItem::new("Coca Cola", 1, dec("1.00"))]
    );
}

#[test]
fn name_only_fallback() {
    assert_eq!(
        parse_receipt_text("Fresh Bananas"),
        vec![LineItem::new("Fresh Bananas", 1, Decimal::ZERO)]
    );
}

#[test]
fn duplicates_collapse() {
    assert_eq!(
        parse_receipt_text("Apple £0.50\nApple £0.50"),
        vec![LineItem::new("Apple", 1, dec("0.50"))]
    );
}

#[test]
fn empty_and_garbage_input() {
    assert_eq!(parse_receipt_text(""), vec![]);
    assert_eq!(parse_receipt_text("   \n\t\n  "), vec![]);
    assert_eq!(parse_receipt_text("THANK YOU\nVAT £2.00\n01/02/2024"), vec![]);

    let result = ReceiptParser::new().parse("THANK YOU\nVAT £2.00\n01/02/2024");
    assert_eq!(result.skipped.len(), 3);
    assert_eq!(result.warnings, vec!["No line items could be extracted".to_string()]);
}

#[test]
fn oversized_amounts_become_manual_prices() {
    let result = ReceiptParser::new().parse("2 x Milk £50000000000000000000000000000\nTOTAL £1.00");

    assert_eq!(result.items, vec![LineItem::new("Milk", 2, Decimal::ZERO)]);
    assert_eq!(result.items_total(), Decimal::ZERO);

    let rec = result.reconciliation.unwrap();
    assert_eq!(rec.stated_total, dec("1.00"));
    assert!(!rec.within_tolerance);
    assert!(result.warnings.iter().any(|w| w.contains("manual price")));
}

#[test]
fn oversized_total_and_quantity_are_ignored() {
    let result = ReceiptParser::new()
        .parse("99999999999 x Cheese £2.00\nTOTAL £99999999999999999999999999999");

    assert_eq!(result.items, vec![LineItem::new("Cheese", 1, dec("2.00"))]);
    assert_eq!(result.total, None);
    assert_eq!(result.reconciliation, None);
}

#[test]
fn total_detection() {
    let parser = ReceiptParser::new();

    let total = parser.detect_total("Milk £1.50\nTOTAL £23.50\nCash £30.00");
    assert_eq!(total.map(|t| t.value), Some(dec("23.50")));

    assert_eq!(parser.detect_total("Milk £1.50\nCash £30.00"), None);
}

#[test]
fn quantity_shapes_agree() {
    let expected = vec![LineItem::new("Eggs", 2, dec("3.00"))];
    assert_eq!(parse_receipt_text("Eggs x 2 £3.00"), expected);
    assert_eq!(parse_receipt_text("2 Eggs £3.00"), expected);
}

#[test]
fn reconciliation_within_tolerance() {
    let text = "Milk £1.50\nBread £1.20\nTOTAL £2.75";
    let result = ReceiptParser::new().parse(text);

    let rec = result.reconciliation.unwrap();
    assert_eq!(rec.items_total, dec("2.70"));
    assert_eq!(rec.stated_total, dec("2.75"));
    assert!(rec.within_tolerance);
    assert!(result.warnings.is_empty());
}

#[test]
fn selection_list() {
    let lines: Vec<&str> = CORNER_SHOP.lines().collect();

    assert_eq!(
        filter_receipt_lines(&lines),
        vec![
            "12 High Street",
            "2 x Milk £1.50",
            "Bread",
            "£1.20",
            "5012345678900 Coca Cola £1.00",
            "Eggs x 2 £3.00",
            "Fresh Bananas",
            "Apple £0.50",
            "Apple £0.50",
        ]
    );
}
