//! Lines command - the manual selection list.

use std::path::PathBuf;

use clap::Args;
use console::style;

use rcpt_core::ReceiptParser;

use super::{format_result, load_config, read_input, OutputFormat};

/// Arguments for the lines command.
#[derive(Args)]
pub struct LinesArgs {
    /// Input text file, or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Parse only these line numbers from the list (e.g. "1,3,4")
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<usize>,

    /// Output format for a parsed selection
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

pub async fn run(args: LinesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_input(&args.input).await?;

    let parser = ReceiptParser::from_config(&config)?;
    let raw: Vec<&str> = text.lines().collect();
    let candidates = parser.filter_lines(&raw);

    if args.select.is_empty() {
        if candidates.is_empty() {
            eprintln!("{} No selectable lines found", style("ℹ").blue());
        }
        for (i, line) in candidates.iter().enumerate() {
            println!("{:>3}  {}", i + 1, line);
        }
        return Ok(());
    }

    let selected = select_lines(&candidates, &args.select)?;
    let result = parser.parse_selected_lines(&selected);

    println!("{}", format_result(&result, args.format, false)?.trim_end());

    Ok(())
}

/// Pick 1-based line numbers out of the candidate list, in the order given.
fn select_lines(candidates: &[String], numbers: &[usize]) -> anyhow::Result<Vec<String>> {
    numbers
        .iter()
        .map(|&n| {
            n.checked_sub(1)
                .and_then(|i| candidates.get(i))
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "Line {} is out of range (1-{})",
                        n,
                        candidates.len()
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_lines() {
        let candidates = vec!["Bread".to_string(), "£1.20".to_string(), "Milk £1.50".to_string()];

        assert_eq!(
            select_lines(&candidates, &[3, 1]).unwrap(),
            vec!["Milk £1.50".to_string(), "Bread".to_string()]
        );
        assert!(select_lines(&candidates, &[0]).is_err());
        assert!(select_lines(&candidates, &[4]).is_err());
    }
}
