//! # casewise
//!
//! Command-line interface for the casewise reconciliation engine.

use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use casewise_config::{EngineConfig, SectionConfig};
use casewise_engine::{process_document, DocumentReport};
use casewise_model::{Cell, RecordFlag, ReconStatus};

/// casewise - rebuild and reconcile tabular reports from positioned OCR cells
#[derive(Parser)]
#[command(name = "casewise")]
#[command(author, version, about = "Reconstruct vendor/brand hierarchies from OCR cells and validate them against printed totals", long_about = None)]
struct Cli {
    /// JSON file holding the extracted cells
    #[arg(value_name = "CELLS")]
    cells: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Report section to process
    #[arg(short, long, default_value = "vendor_summary")]
    section: String,

    /// Output format (summary, json, csv)
    #[arg(short, long, default_value = "summary")]
    format: OutputFormat,

    /// Write output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Output format for results.
#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// Human-readable reconciliation summary (default)
    #[default]
    Summary,
    /// Full report as JSON
    Json,
    /// Flat record table as CSV
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .init();
    }

    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    let raw_config = fs::read_to_string(&cli.config)
        .with_context(|| format!("Failed to read config file: {}", cli.config.display()))?;
    let config = EngineConfig::from_toml(&raw_config)
        .with_context(|| format!("Invalid config file: {}", cli.config.display()))?;

    let Some(section) = config.section(&cli.section) else {
        bail!(
            "Unknown section '{}'. Configured sections: {}",
            cli.section,
            config.sections.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    };

    let raw_cells = fs::read_to_string(&cli.cells)
        .with_context(|| format!("Failed to read cells file: {}", cli.cells.display()))?;
    let cells: Vec<Cell> = serde_json::from_str(&raw_cells)
        .with_context(|| format!("Invalid cells file: {}", cli.cells.display()))?;

    let report = process_document(cells, section, &config.vocabulary);

    let rendered = match cli.format {
        OutputFormat::Summary => render_summary(&report)?,
        OutputFormat::Json => render_json(&report)?,
        OutputFormat::Csv => render_csv(&report, section)?,
    };

    match cli.output {
        Some(path) => fs::write(&path, rendered)
            .with_context(|| format!("Failed to write output file: {}", path.display()))?,
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Render the full report as pretty-printed JSON.
fn render_json(report: &DocumentReport) -> Result<String> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

/// Render the reconstructed records as a flat CSV table.
fn render_csv(report: &DocumentReport, section: &SectionConfig) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["vendor".to_string(), "brand".to_string(), "class".to_string()];
    header.extend(section.metric_columns.iter().cloned());
    header.push("flags".to_string());
    writer.write_record(&header)?;

    for record in &report.records {
        let mut row = vec![
            record.vendor.clone(),
            record.brand.clone(),
            record.class.clone().unwrap_or_default(),
        ];
        for column in &section.metric_columns {
            let value = record.metrics.get(column).copied().flatten();
            row.push(value.map(|v| v.to_string()).unwrap_or_default());
        }
        row.push(
            record
                .flags
                .iter()
                .map(flag_label)
                .collect::<Vec<_>>()
                .join(";"),
        );
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {e}"))?;
    String::from_utf8(bytes).context("CSV output was not valid UTF-8")
}

/// Short machine-readable tag for a record flag.
fn flag_label(flag: &RecordFlag) -> String {
    match flag {
        RecordFlag::Truncated { field } => format!("truncated:{field}"),
        RecordFlag::NegativeValueCleared { column } => format!("negative_cleared:{column}"),
        RecordFlag::UnrepairedDuplication { field } => {
            format!("unrepaired_duplication:{field}")
        }
    }
}

/// Render a human-readable reconciliation summary.
fn render_summary(report: &DocumentReport) -> Result<String> {
    let mut out = String::new();

    for result in &report.results {
        let status = match result.status {
            ReconStatus::Match => "MATCH".green(),
            ReconStatus::Mismatch => "MISMATCH".red().bold(),
            ReconStatus::Unknown => "UNKNOWN".yellow(),
        };
        let printed = result
            .printed_total
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        let relative = result
            .relative_error
            .map_or_else(String::new, |rel| format!("  (rel err {rel:.4})"));
        writeln!(
            out,
            "{status:>8}  {}  {}  computed {}  printed {printed}{relative}",
            result.group_key, result.column, result.computed_sum
        )?;
    }
    if !report.results.is_empty() {
        writeln!(out)?;
    }

    writeln!(
        out,
        "records: {} ({} flagged)",
        report.records.len(),
        report.flagged_records().len()
    )?;
    writeln!(
        out,
        "groups: {} validated, {} unvalidated",
        report.accuracy.groups_validated, report.accuracy.groups_unvalidated
    )?;
    writeln!(out, "dropped rows: {}", report.dropped.total_rows())?;

    let accuracy = report.accuracy.overall().map_or_else(
        || "n/a".to_string(),
        |acc| format!("{:.1}%", acc * 100.0),
    );
    writeln!(out, "overall accuracy: {}", accuracy.cyan().bold())?;

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const CONFIG_TOML: &str = r#"
vocabulary = ["VODKA-CLASSIC-DOM", "GIN-DOM"]

[sections.vendor_summary]
label_bound = { column = "label", x_min = 0.04, x_max = 0.17 }
class_bound = { column = "class", x_min = 0.17, x_max = 0.35 }
metric_columns = ["l12m_this_year"]
detail_bounds = [{ column = "l12m_this_year", x_min = 0.370, x_max = 0.420 }]
total_bounds = [{ column = "l12m_this_year", x_min = 0.350, x_max = 0.420 }]
"#;

    fn sample_cells() -> Vec<Cell> {
        let mk = |text: &str, row_index: u32, x_min: f64, x_max: f64| Cell {
            text: text.to_string(),
            page: 1,
            row_index,
            x_min,
            x_max,
        };
        vec![
            mk("ACME DIST", 1, 0.05, 0.15),
            mk("FOO", 2, 0.05, 0.15),
            mk("100", 2, 0.38, 0.41),
            mk("BAR", 3, 0.05, 0.15),
            mk("150", 3, 0.38, 0.41),
            mk("TOTAL ACME DIST", 4, 0.05, 0.15),
            mk("250", 4, 0.36, 0.41),
        ]
    }

    fn sample_report() -> (DocumentReport, EngineConfig) {
        let config = EngineConfig::from_toml(CONFIG_TOML).unwrap();
        let section = config.section("vendor_summary").unwrap();
        let report = process_document(sample_cells(), section, &config.vocabulary);
        (report, config)
    }

    #[test]
    fn test_cli_parse_defaults() {
        let cli = Cli::parse_from(["casewise", "cells.json", "--config", "layout.toml"]);
        assert_eq!(cli.cells, PathBuf::from("cells.json"));
        assert_eq!(cli.config, PathBuf::from("layout.toml"));
        assert_eq!(cli.section, "vendor_summary");
        assert!(matches!(cli.format, OutputFormat::Summary));
        assert!(cli.output.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_cli_parse_format() {
        let cli = Cli::parse_from(["casewise", "c.json", "-c", "l.toml", "-f", "json"]);
        assert!(matches!(cli.format, OutputFormat::Json));

        let cli = Cli::parse_from(["casewise", "c.json", "-c", "l.toml", "--format", "csv"]);
        assert!(matches!(cli.format, OutputFormat::Csv));
    }

    #[test]
    fn test_cli_parse_section_and_output() {
        let cli = Cli::parse_from([
            "casewise",
            "c.json",
            "-c",
            "l.toml",
            "-s",
            "brand_summary",
            "-o",
            "out.csv",
        ]);
        assert_eq!(cli.section, "brand_summary");
        assert_eq!(cli.output, Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn test_render_csv_flat_table() {
        let (report, config) = sample_report();
        let section = config.section("vendor_summary").unwrap();
        let csv = render_csv(&report, section).unwrap();

        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("vendor,brand,class,l12m_this_year,flags")
        );
        assert_eq!(lines.next(), Some("ACME DIST,FOO,,100,"));
        assert_eq!(lines.next(), Some("ACME DIST,BAR,,150,"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_render_json_roundtrips() {
        let (report, _) = sample_report();
        let json = render_json(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
        assert_eq!(value["results"][0]["status"], "match");
    }

    #[test]
    fn test_render_summary_lines() {
        colored::control::set_override(false);
        let (report, _) = sample_report();
        let summary = render_summary(&report).unwrap();
        assert!(summary.contains("MATCH"));
        assert!(summary.contains("ACME DIST"));
        assert!(summary.contains("records: 2 (0 flagged)"));
        assert!(summary.contains("overall accuracy: 100.0%"));
    }

    #[test]
    fn test_run_end_to_end_with_files() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("layout.toml");
        let cells_path = dir.path().join("cells.json");
        let output_path = dir.path().join("report.json");

        fs::write(&config_path, CONFIG_TOML).unwrap();
        let mut cells_file = fs::File::create(&cells_path).unwrap();
        let json = serde_json::to_string(&sample_cells()).unwrap();
        cells_file.write_all(json.as_bytes()).unwrap();

        let cli = Cli::parse_from([
            "casewise",
            cells_path.to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
            "--format",
            "json",
            "--output",
            output_path.to_str().unwrap(),
        ]);
        run(cli).unwrap();

        let written = fs::read_to_string(&output_path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
        assert_eq!(value["accuracy"]["groups_validated"], 1);
    }

    #[test]
    fn test_run_rejects_unknown_section() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("layout.toml");
        let cells_path = dir.path().join("cells.json");
        fs::write(&config_path, CONFIG_TOML).unwrap();
        fs::write(&cells_path, "[]").unwrap();

        let cli = Cli::parse_from([
            "casewise",
            cells_path.to_str().unwrap(),
            "--config",
            config_path.to_str().unwrap(),
            "--section",
            "nope",
        ]);
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("Unknown section 'nope'"));
    }
}
