//! Parse command - extract line items from a single receipt text.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use rcpt_core::{ExtractionResult, ReceiptParser};

use super::{format_money, format_result, load_config, read_input, OutputFormat};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input text file, or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Include skipped lines and their reasons
    #[arg(long)]
    show_skipped: bool,

    /// Keep repeated items
    #[arg(long)]
    no_dedup: bool,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let text = read_input(&args.input).await?;

    info!("Parsing receipt: {}", args.input.display());

    let mut parser = ReceiptParser::from_config(&config)?;
    if args.no_dedup {
        parser = parser.with_deduplication(false);
    }

    let result = parser.parse(&text);
    let output = format_result(&result, args.format, args.show_skipped)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", output);
        if !output.ends_with('\n') {
            println!();
        }
    }

    report_advisories(&result);

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Reconciliation and manual-price notes go to stderr so stdout stays
/// machine readable.
fn report_advisories(result: &ExtractionResult) {
    if let Some(rec) = &result.reconciliation {
        if rec.within_tolerance {
            eprintln!(
                "{} Items total {} matches receipt total {}",
                style("✓").green(),
                format_money(rec.items_total),
                format_money(rec.stated_total)
            );
        } else {
            eprintln!(
                "{} Items total {} differs from receipt total {} by {}",
                style("!").yellow(),
                format_money(rec.items_total),
                format_money(rec.stated_total),
                format_money(rec.difference.abs())
            );
        }
    }

    let manual = result.manual_price_count();
    if manual > 0 {
        eprintln!(
            "{} {} item(s) need a manual price",
            style("ℹ").blue(),
            manual
        );
    }

    if result.items.is_empty() {
        eprintln!("{} No line items could be extracted", style("!").yellow());
    }
}
