//! Subcommand implementations.

pub mod batch;
pub mod config;
pub mod lines;
pub mod parse;

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use tokio::io::AsyncReadExt;
use tracing::debug;

use rcpt_core::models::config::RcptConfig;
use rcpt_core::{ExtractionResult, LineItem};

/// Load the configuration named by `-c`, else the user config file if one
/// exists, else the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<RcptConfig> {
    if let Some(path) = config_path {
        return Ok(RcptConfig::from_file(Path::new(path))?);
    }

    let user_config = config::default_config_path();
    if user_config.exists() {
        debug!("Using config file {}", user_config.display());
        Ok(RcptConfig::from_file(&user_config)?)
    } else {
        Ok(RcptConfig::default())
    }
}

/// Read receipt text from a file, or from stdin when the input is `-`.
pub async fn read_input(input: &Path) -> anyhow::Result<String> {
    if input.as_os_str() == "-" {
        let mut text = String::new();
        tokio::io::stdin().read_to_string(&mut text).await?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }

    Ok(tokio::fs::read_to_string(input).await?)
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per item
    Csv,
    /// Plain text table
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Render an extraction result. Skipped lines are only included in JSON
/// and text output, and only when asked for.
pub fn format_result(
    result: &ExtractionResult,
    format: OutputFormat,
    show_skipped: bool,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(result, show_skipped),
        OutputFormat::Csv => format_items_csv(&result.items),
        OutputFormat::Text => Ok(format_text(result, show_skipped)),
    }
}

fn format_json(result: &ExtractionResult, show_skipped: bool) -> anyhow::Result<String> {
    if show_skipped {
        return Ok(serde_json::to_string_pretty(result)?);
    }

    let mut value = serde_json::to_value(result)?;
    if let Some(obj) = value.as_object_mut() {
        obj.remove("skipped");
    }
    Ok(serde_json::to_string_pretty(&value)?)
}

pub fn format_items_csv(items: &[LineItem]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["name", "quantity", "price", "line_total"])?;

    for item in items {
        wtr.write_record([
            item.name.as_str(),
            &item.quantity.to_string(),
            &format_money(item.price),
            &format_money(item.line_total()),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult, show_skipped: bool) -> String {
    let mut output = String::new();

    let width = result
        .items
        .iter()
        .map(|i| i.name.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    output.push_str(&format!("{:<width$}  {:>4}  {:>9}\n", "Item", "Qty", "Price"));
    for item in &result.items {
        let price = if item.needs_manual_price() {
            "?".to_string()
        } else {
            format_money(item.price)
        };
        output.push_str(&format!(
            "{:<width$}  {:>4}  {:>9}\n",
            item.name, item.quantity, price
        ));
    }

    output.push('\n');
    output.push_str(&format!("Items total: {}\n", format_money(result.items_total())));
    if let Some(total) = &result.total {
        output.push_str(&format!("Receipt total: {}\n", format_money(total.value)));
    }

    if show_skipped && !result.skipped.is_empty() {
        output.push_str("\nSkipped lines:\n");
        for skipped in &result.skipped {
            output.push_str(&format!(
                "  {:>3}  {:<18} {}\n",
                skipped.line_index + 1,
                skipped.reason,
                skipped.line
            ));
        }
    }

    output
}

pub fn format_money(value: Decimal) -> String {
    format!("{:.2}", value)
}

/// Output path for an input file inside a directory, keeping the stem.
pub fn output_path_for(input: &Path, output_dir: &Path, format: OutputFormat) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");

    output_dir.join(format!("{}.{}", stem, format.extension()))
}
