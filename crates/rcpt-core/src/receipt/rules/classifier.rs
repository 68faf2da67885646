//! Receipt line classifier.
//!
//! Decides whether a line can be an item at all. Used inline by the item
//! parser and on its own to build the manual line-selection list.

use tracing::trace;

use crate::models::config::ClassifierConfig;
use crate::models::receipt::SkipReason;

use super::patterns::{
    PatternSet, BOILERPLATE, COLUMN_HEADER, COLUMN_HEADER_STRICT, CONTACT_INFO, DATE_TIME_ONLY,
    DECORATION, DEFAULT_PATTERNS, NO_LETTERS, OPERATIONAL, UPPERCASE_HEADER,
};
use super::quantity::{has_letter, has_letter_run};

/// Which caller the classification is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassifyMode {
    /// Inline check during item parsing.
    Parse,
    /// Building the manual selection list; also rejects
    /// opening/closing/balance/account headings.
    Selection,
}

/// Rule-based line classifier.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    patterns: PatternSet,
    config: ClassifierConfig,
}

impl LineClassifier {
    pub fn new(patterns: PatternSet, config: ClassifierConfig) -> Self {
        Self { patterns, config }
    }

    /// The first rule rejecting this line, if any.
    pub fn rejection(&self, line: &str, mode: ClassifyMode) -> Option<SkipReason> {
        let line = line.trim();

        let reason = if line.chars().count() < self.config.min_line_length {
            Some(SkipReason::TooShort)
        } else if DECORATION.is_match(line) {
            Some(SkipReason::Decoration)
        } else if DATE_TIME_ONLY.is_match(line) {
            Some(SkipReason::DateTime)
        } else if NO_LETTERS.is_match(line) {
            Some(SkipReason::NoLetters)
        } else if self.patterns.is_financial_summary(line) {
            Some(SkipReason::FinancialSummary)
        } else if BOILERPLATE.is_match(line) {
            Some(SkipReason::Boilerplate)
        } else if CONTACT_INFO.is_match(line) {
            Some(SkipReason::ContactInfo)
        } else if OPERATIONAL.is_match(line) {
            Some(SkipReason::Operational)
        } else if self.is_column_header(line, mode) {
            Some(SkipReason::ColumnHeader)
        } else if self.is_uppercase_header(line) {
            Some(SkipReason::UppercaseHeader)
        } else {
            None
        };

        if let Some(reason) = reason {
            trace!("Rejected {:?}: {}", line, reason);
        }

        reason
    }

    /// Parse-mode check used by the item parser.
    pub fn is_ignored(&self, line: &str) -> bool {
        self.rejection(line, ClassifyMode::Parse).is_some()
    }

    /// Lines worth offering for manual selection, in order.
    ///
    /// Survivors of the selection-mode rules must also carry real text
    /// (two consecutive letters) or a price.
    pub fn filter_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .filter(|l| self.rejection(l, ClassifyMode::Selection).is_none())
            .filter(|l| has_letter_run(l) || self.patterns.has_price(l))
            .map(str::to_string)
            .collect()
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    fn is_column_header(&self, line: &str, mode: ClassifyMode) -> bool {
        match mode {
            ClassifyMode::Parse => COLUMN_HEADER.is_match(line),
            ClassifyMode::Selection => COLUMN_HEADER_STRICT.is_match(line),
        }
    }

    fn is_uppercase_header(&self, line: &str) -> bool {
        line.chars().count() >= self.config.uppercase_header_min_len
            && has_letter(line)
            && UPPERCASE_HEADER.is_match(line)
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_PATTERNS.clone(), ClassifierConfig::default())
    }
}

/// Filter raw lines for a manual selection checklist using the default
/// locale.
pub fn filter_receipt_lines<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    LineClassifier::default().filter_lines(lines)
}
