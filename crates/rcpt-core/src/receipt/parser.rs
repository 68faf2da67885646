//! Receipt item parser: classifier, strategy chain, deduplication and
//! total reconciliation.

use std::time::Instant;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::{ParserConfig, RcptConfig, ReconciliationConfig};
use crate::models::receipt::{
    split_receipt_lines, ExtractionResult, LineItem, ReceiptTotal, SkipReason, SkippedLine,
};

use super::dedup::deduplicate;
use super::rules::classifier::{ClassifyMode, LineClassifier};
use super::rules::patterns::PatternSet;
use super::rules::total::{detect_total, reconcile};
use super::strategies::{default_strategies, LineStrategy, StrategyContext};

/// Best-effort receipt parser.
///
/// Unparsable lines never produce an error; they are reported in
/// [`ExtractionResult::skipped`] and left out of the items.
pub struct ReceiptParser {
    classifier: LineClassifier,
    strategies: Vec<Box<dyn LineStrategy>>,
    config: ParserConfig,
    reconciliation: ReconciliationConfig,
}

impl ReceiptParser {
    /// Create a parser for the default locale.
    pub fn new() -> Self {
        Self {
            classifier: LineClassifier::default(),
            strategies: default_strategies(),
            config: ParserConfig::default(),
            reconciliation: ReconciliationConfig::default(),
        }
    }

    /// Create a parser from a full configuration.
    pub fn from_config(config: &RcptConfig) -> Result<Self> {
        config.validate()?;
        let patterns = PatternSet::new(&config.locale)?;

        Ok(Self {
            classifier: LineClassifier::new(patterns, config.classifier.clone()),
            strategies: default_strategies(),
            config: config.parser.clone(),
            reconciliation: config.reconciliation.clone(),
        })
    }

    /// Enable or disable duplicate removal.
    pub fn with_deduplication(mut self, deduplicate: bool) -> Self {
        self.config.deduplicate = deduplicate;
        self
    }

    /// Append a strategy after the built-in ones.
    pub fn with_strategy(mut self, strategy: Box<dyn LineStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn classifier(&self) -> &LineClassifier {
        &self.classifier
    }

    /// Extract items, skipped lines, the stated total and reconciliation.
    pub fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();
        let lines = split_receipt_lines(text);

        info!(
            "Parsing receipt from {} characters in {} lines",
            text.len(),
            lines.len()
        );

        let ctx = StrategyContext {
            patterns: self.classifier.patterns(),
            config: &self.config,
        };

        let mut candidates: Vec<(usize, LineItem)> = Vec::new();
        let mut skipped = Vec::new();
        let mut index = 0;

        while index < lines.len() {
            let line = lines[index];

            if let Some(reason) = self.classifier.rejection(line, ClassifyMode::Parse) {
                skipped.push(skipped_line(index, line, reason));
                index += 1;
                continue;
            }

            let next = lines.get(index + 1).copied();
            let matched = self.strategies.iter().find_map(|strategy| {
                strategy
                    .apply(line, next, &ctx)
                    .map(|m| (strategy.name(), m))
            });

            match matched {
                Some((strategy, m)) => {
                    debug!(
                        "{} strategy matched line {}: {} x{} @ {}",
                        strategy, index, m.item.name, m.item.quantity, m.item.price
                    );
                    candidates.push((index, m.item));
                    index += if m.consumed_next { 2 } else { 1 };
                }
                None => {
                    skipped.push(skipped_line(index, line, SkipReason::NoItemShape));
                    index += 1;
                }
            }
        }

        let (line_indices, items): (Vec<usize>, Vec<LineItem>) = candidates.into_iter().unzip();

        let items = if self.config.deduplicate {
            let (kept, removed) = deduplicate(items);
            for position in removed {
                let line_index = line_indices[position];
                skipped.push(skipped_line(line_index, lines[line_index], SkipReason::Duplicate));
            }
            kept
        } else {
            items
        };
        skipped.sort_by_key(|s| s.line_index);

        let total = detect_total(&lines, self.classifier.patterns());
        let reconciliation = total
            .as_ref()
            .map(|t| reconcile(t, &items, &self.reconciliation));

        let mut result = ExtractionResult {
            items,
            skipped,
            total,
            reconciliation,
            warnings: Vec::new(),
            processing_time_ms: 0,
        };
        result.warnings = collect_warnings(&result);
        result.processing_time_ms = start.elapsed().as_millis() as u64;

        debug!(
            "Extracted {} items, skipped {} lines",
            result.items.len(),
            result.skipped.len()
        );

        result
    }

    /// Items only.
    pub fn parse_items(&self, text: &str) -> Vec<LineItem> {
        self.parse(text).items
    }

    /// Parse a caller-selected subset of lines, joined back into text.
    pub fn parse_selected_lines<S: AsRef<str>>(&self, lines: &[S]) -> ExtractionResult {
        let text = lines
            .iter()
            .map(|l| l.as_ref())
            .collect::<Vec<&str>>()
            .join("\n");
        self.parse(&text)
    }

    /// Lines worth offering for manual selection.
    pub fn filter_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        self.classifier.filter_lines(lines)
    }

    /// Stated total of the receipt text, if any.
    pub fn detect_total(&self, text: &str) -> Option<ReceiptTotal> {
        detect_total(&split_receipt_lines(text), self.classifier.patterns())
    }
}

impl Default for ReceiptParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse OCR text with the default locale and return the items.
pub fn parse_receipt_text(text: &str) -> Vec<LineItem> {
    ReceiptParser::new().parse_items(text)
}

/// Parse a caller-selected subset of lines with the default locale.
pub fn parse_selected_lines<S: AsRef<str>>(lines: &[S]) -> Vec<LineItem> {
    ReceiptParser::new().parse_selected_lines(lines).items
}

fn skipped_line(line_index: usize, line: &str, reason: SkipReason) -> SkippedLine {
    SkippedLine {
        line_index,
        line: line.to_string(),
        reason,
    }
}

fn collect_warnings(result: &ExtractionResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if result.items.is_empty() {
        warnings.push("No line items could be extracted".to_string());
    }

    let manual = result.manual_price_count();
    if manual > 0 {
        warnings.push(format!("{} item(s) need a manual price", manual));
    }

    if let Some(rec) = &result.reconciliation {
        if !rec.within_tolerance {
            warnings.push(format!(
                "Items total {} differs from receipt total {} by {} (tolerance {})",
                rec.items_total,
                rec.stated_total,
                rec.difference.abs(),
                rec.tolerance
            ));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_supermarket_receipt() {
        let text = r#"
            SAINSBURYS SUPERMARKET
            www.sainsburys.co.uk
            01/02/2024 14:32
            ----------------
            2 x Milk £1.50
            Bread
            £1.20
            5012345678900 Coca Cola £1.00
            Fresh Bananas
            SUBTOTAL £4.20
            TOTAL £4.20
            VISA £4.20
            THANK YOU
        "#;

        let result = ReceiptParser::new().parse(text);

        assert_eq!(
            result.items,
            vec![
                LineItem::new("Milk", 2, dec("1.50")),
                LineItem::new("Bread", 1, dec("1.20")),
                LineItem::new("Coca Cola", 1, dec("1.00")),
                LineItem::new("Fresh Bananas", 1, Decimal::ZERO),
            ]
        );

        let total = result.total.as_ref().unwrap();
        assert_eq!(total.value, dec("4.20"));

        // 2 × 1.50 + 1.20 + 1.00 = 5.20 against 4.20
        let rec = result.reconciliation.as_ref().unwrap();
        assert_eq!(rec.items_total, dec("5.20"));
        assert!(!rec.within_tolerance);
        assert!(result.warnings.iter().any(|w| w.contains("manual price")));
        assert!(result.warnings.iter().any(|w| w.contains("differs")));
    }

    #[test]
    fn test_skipped_lines_are_reported_in_order() {
        let text = "THANK YOU\nApple £0.50\n£££\nApple £0.50\nVAT £2.00";
        let result = ReceiptParser::new().parse(text);

        assert_eq!(result.items, vec![LineItem::new("Apple", 1, dec("0.50"))]);

        let reasons: Vec<(usize, SkipReason)> = result
            .skipped
            .iter()
            .map(|s| (s.line_index, s.reason))
            .collect();
        assert_eq!(
            reasons,
            vec![
                (0, SkipReason::Boilerplate),
                (2, SkipReason::NoItemShape),
                (3, SkipReason::Duplicate),
                (4, SkipReason::FinancialSummary),
            ]
        );
    }

    #[test]
    fn test_without_deduplication() {
        let text = "Apple £0.50\nApple £0.50";
        let items = ReceiptParser::new().with_deduplication(false).parse_items(text);
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_parse_selected_lines() {
        let selected = vec!["Bread", "£1.20", "Milk £1.50"];
        let items = parse_selected_lines(&selected);
        assert_eq!(
            items,
            vec![
                LineItem::new("Bread", 1, dec("1.20")),
                LineItem::new("Milk", 1, dec("1.50")),
            ]
        );
    }

    #[test]
    fn test_comma_locale_from_config() {
        let mut config = RcptConfig::default();
        config.locale.decimal_separator = ',';
        config.locale.currency_symbols = vec!['€'];

        let parser = ReceiptParser::from_config(&config).unwrap();
        let result = parser.parse("2 x Brot 1,20 €\nKäse\n€3,49\nTotal 5,89 €");

        assert_eq!(
            result.items,
            vec![
                LineItem::new("Brot", 2, dec("1.20")),
                LineItem::new("Käse", 1, dec("3.49")),
            ]
        );
        assert_eq!(result.total.map(|t| t.value), Some(dec("5.89")));
        assert!(result.reconciliation.unwrap().within_tolerance);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut config = RcptConfig::default();
        config.locale.currency_symbols.clear();
        assert!(ReceiptParser::from_config(&config).is_err());
    }

    #[test]
    fn test_custom_strategy_runs_last() {
        struct Everything;

        impl LineStrategy for Everything {
            fn name(&self) -> &'static str {
                "everything"
            }

            fn apply(
                &self,
                line: &str,
                _next: Option<&str>,
                _ctx: &StrategyContext<'_>,
            ) -> Option<crate::receipt::strategies::StrategyMatch> {
                Some(crate::receipt::strategies::StrategyMatch {
                    item: LineItem::new(line, 1, Decimal::ONE),
                    consumed_next: false,
                })
            }
        }

        let parser = ReceiptParser::new().with_strategy(Box::new(Everything));
        let items = parser.parse_items("Milk £1.50\n£9.99");

        assert_eq!(
            items,
            vec![
                LineItem::new("Milk", 1, dec("1.50")),
                LineItem::new("£9.99", 1, Decimal::ONE),
            ]
        );
    }
}
