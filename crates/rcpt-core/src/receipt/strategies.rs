//! Line-shape strategies for turning receipt lines into items.
//!
//! Strategies are tried in order for every line that survives the
//! classifier; the first one returning a match wins.

use rust_decimal::Decimal;

use crate::models::config::ParserConfig;
use crate::models::receipt::LineItem;

use super::rules::patterns::PatternSet;
use super::rules::quantity::{
    clean_name, extract_quantity, has_letter, has_letter_run, is_numeric, is_product_code,
};

/// Shared state handed to every strategy.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub patterns: &'a PatternSet,
    pub config: &'a ParserConfig,
}

/// An item produced by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMatch {
    pub item: LineItem,
    /// The following line was used as this item's price.
    pub consumed_next: bool,
}

/// Trait for line-shape strategies.
pub trait LineStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to build an item from `line`, optionally looking at the line
    /// after it.
    fn apply(
        &self,
        line: &str,
        next: Option<&str>,
        ctx: &StrategyContext<'_>,
    ) -> Option<StrategyMatch>;
}

/// `Milk £1.50`, `2 x Milk £1.50`, `Eggs x 2 3.00`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SameLinePrice;

impl LineStrategy for SameLinePrice {
    fn name(&self) -> &'static str {
        "same-line"
    }

    fn apply(
        &self,
        line: &str,
        _next: Option<&str>,
        ctx: &StrategyContext<'_>,
    ) -> Option<StrategyMatch> {
        let price = ctx.patterns.find_price(line)?;
        let (quantity, name) = quantity_and_name(line, &price.remainder(line), ctx.config);

        if name.chars().count() > 1 && has_letter(&name) && price.value > Decimal::ZERO {
            Some(StrategyMatch {
                item: LineItem::new(name, quantity, price.value),
                consumed_next: false,
            })
        } else {
            None
        }
    }
}

/// A name line followed by a line holding only the price.
///
/// Stricter than "the next line has a price": a next line whose remainder
/// still has two consecutive letters (`Milk £1.50`, `TOTAL £5.00`) is left
/// for its own item or rule, so the name line falls through to [`NameOnly`].
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoLinePrice;

impl LineStrategy for TwoLinePrice {
    fn name(&self) -> &'static str {
        "two-line"
    }

    fn apply(
        &self,
        line: &str,
        next: Option<&str>,
        ctx: &StrategyContext<'_>,
    ) -> Option<StrategyMatch> {
        let next = next?;
        if !has_letter(line) || ctx.patterns.has_price(line) {
            return None;
        }

        let price = ctx.patterns.find_price(next)?;
        if has_letter_run(&price.remainder(next)) {
            return None;
        }

        let (quantity, name) = quantity_and_name(line, line, ctx.config);

        if name.chars().count() > 1 && has_letter(&name) && price.value > Decimal::ZERO {
            Some(StrategyMatch {
                item: LineItem::new(name, quantity, price.value),
                consumed_next: true,
            })
        } else {
            None
        }
    }
}

/// A product name without any usable price; the caller enters the price
/// by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameOnly;

impl LineStrategy for NameOnly {
    fn name(&self) -> &'static str {
        "name-only"
    }

    fn apply(
        &self,
        line: &str,
        _next: Option<&str>,
        ctx: &StrategyContext<'_>,
    ) -> Option<StrategyMatch> {
        if !has_letter(line) || line.chars().count() <= 2 {
            return None;
        }

        let candidate = match ctx.patterns.find_price(line) {
            Some(price) => price.remainder(line),
            None => line.to_string(),
        };
        let (quantity, name) = quantity_and_name(line, &candidate, ctx.config);

        if name.chars().count() > 2 && has_letter_run(&name) && !is_numeric(&name) {
            Some(StrategyMatch {
                item: LineItem::new(name, quantity, Decimal::ZERO),
                consumed_next: false,
            })
        } else {
            None
        }
    }
}

/// The built-in strategy chain in priority order.
pub fn default_strategies() -> Vec<Box<dyn LineStrategy>> {
    vec![
        Box::new(SameLinePrice),
        Box::new(TwoLinePrice),
        Box::new(NameOnly),
    ]
}

/// Quantity from `candidate`, with the product-code guard applied to the
/// whole `line`, and the cleaned name.
fn quantity_and_name(line: &str, candidate: &str, config: &ParserConfig) -> (u32, String) {
    let (quantity, name) = extract_quantity(candidate);
    let quantity = if is_product_code(line, config) { 1 } else { quantity };
    (quantity, clean_name(&name))
}
