//! WASM bindings for the receipt line-item parser.
//!
//! The mobile/web UI calls these after OCR to get item candidates and the
//! manual selection list without a network round trip.

use js_sys::Array;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use rcpt_core::models::config::RcptConfig;
use rcpt_core::ReceiptParser;

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract line items from receipt OCR text with the default locale.
///
/// Returns an array of `{ name, quantity, price }`; `price` is 0 when it
/// has to be entered by hand.
#[wasm_bindgen(js_name = parseReceiptText)]
pub fn parse_receipt_text(text: &str) -> Result<JsValue, JsValue> {
    to_js(&rcpt_core::parse_receipt_text(text))
}

/// Lines worth offering in the manual selection checklist.
#[wasm_bindgen(js_name = filterReceiptLines)]
pub fn filter_receipt_lines(lines: JsValue) -> Result<Array, JsValue> {
    let lines = lines_from_js(lines)?;
    Ok(to_string_array(rcpt_core::filter_receipt_lines(&lines)))
}

/// The total printed on the receipt, if one was found.
#[wasm_bindgen(js_name = detectReceiptTotal)]
pub fn detect_receipt_total(text: &str) -> Option<f64> {
    ReceiptParser::new()
        .detect_total(text)
        .and_then(|t| t.value.to_f64())
}

/// Receipt parser with a custom configuration, for browser use.
#[wasm_bindgen]
pub struct ReceiptScanner {
    parser: ReceiptParser,
}

#[wasm_bindgen]
impl ReceiptScanner {
    /// Create a scanner. `config_json` is an optional JSON configuration;
    /// missing sections take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<ReceiptScanner, JsValue> {
        let config = match config_json.as_deref() {
            Some(json) if !json.trim().is_empty() => {
                serde_json::from_str::<RcptConfig>(json).map_err(to_js_error)?
            }
            _ => RcptConfig::default(),
        };

        let parser = ReceiptParser::from_config(&config).map_err(to_js_error)?;
        Ok(Self { parser })
    }

    /// Enable or disable duplicate removal.
    #[wasm_bindgen(js_name = setDeduplicate)]
    pub fn set_deduplicate(&mut self, deduplicate: bool) {
        let parser = std::mem::take(&mut self.parser);
        self.parser = parser.with_deduplication(deduplicate);
    }

    /// Line items only.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse_items(text))
    }

    /// Items plus skipped lines, total, reconciliation and warnings.
    #[wasm_bindgen(js_name = parseWithDetails)]
    pub fn parse_with_details(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.parser.parse(text))
    }

    /// Parse the lines the user ticked in the selection list.
    #[wasm_bindgen(js_name = parseSelectedLines)]
    pub fn parse_selected_lines(&self, lines: JsValue) -> Result<JsValue, JsValue> {
        let lines = lines_from_js(lines)?;
        to_js(&self.parser.parse_selected_lines(&lines).items)
    }

    /// Selection list for this scanner's locale.
    #[wasm_bindgen(js_name = filterLines)]
    pub fn filter_lines(&self, lines: JsValue) -> Result<Array, JsValue> {
        let lines = lines_from_js(lines)?;
        Ok(to_string_array(self.parser.filter_lines(&lines)))
    }
}

fn lines_from_js(lines: JsValue) -> Result<Vec<String>, JsValue> {
    serde_wasm_bindgen::from_value(lines)
        .map_err(|e| JsValue::from_str(&format!("expected an array of strings: {}", e)))
}

fn to_string_array(lines: Vec<String>) -> Array {
    lines.into_iter().map(JsValue::from).collect()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}
