//! CLI command for report export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Args, ValueEnum};

use super::report::{comparison_report, forecast_report, weekly_report};
use super::CliContext;
use crate::error::{BudgetError, BudgetResult};
use crate::export::{export, ExportData, ExportFormat};
use crate::models::WeekId;

/// Report to export
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ReportKind {
    /// Weekly aggregates per category
    Weekly,
    /// Budget vs actual for one week
    Compare,
    /// Cash-flow forecast
    Forecast,
}

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Flat rows, spreadsheet-compatible
    Csv,
    /// Versioned JSON document
    Json,
    /// Versioned YAML document
    Yaml,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Yaml => ExportFormat::Yaml,
        }
    }
}

/// Arguments of `export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Which report to export
    #[arg(value_enum)]
    pub report: ReportKind,

    /// Export format
    #[arg(short, long, value_enum, default_value = "csv")]
    pub format: FormatArg,

    /// Output file path (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Transaction file (JSON or CSV)
    #[arg(short, long)]
    pub transactions: Option<PathBuf>,

    /// Week to compare (compare only)
    #[arg(long)]
    pub week: Option<WeekId>,

    /// Weeks of history to average (forecast only)
    #[arg(long)]
    pub weeks: Option<usize>,
}

/// Handle `export`
pub fn handle_export_command(ctx: &CliContext, args: ExportArgs) -> BudgetResult<()> {
    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                BudgetError::Export(format!("Failed to create file {}: {}", path.display(), e))
            })?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    let format = ExportFormat::from(args.format);

    let count = match args.report {
        ReportKind::Weekly => {
            let data = weekly_report(ctx, args.transactions)?;
            export(ExportData::Weekly(&data), format, &mut writer)?;
            data.len()
        }
        ReportKind::Compare => {
            let (_, comparisons) = comparison_report(ctx, args.transactions, args.week)?;
            export(ExportData::Comparison(&comparisons), format, &mut writer)?;
            comparisons.len()
        }
        ReportKind::Forecast => {
            let prediction = forecast_report(ctx, args.transactions, args.weeks)?;
            export(ExportData::Forecast(&prediction), format, &mut writer)?;
            1
        }
    };

    writer
        .flush()
        .map_err(|e| BudgetError::Export(e.to_string()))?;

    if let Some(path) = &args.output {
        println!("Exported {} record(s) to: {}", count, path.display());
    }

    Ok(())
}
