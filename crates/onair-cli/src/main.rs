//! onair CLI - Broadcast Segment Timeline Charts
//!
//! Reads broadcast segment sheets from a workbook and draws them as one
//! timeline chart PNG.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use onair_core::{BuildOptions, RowBuilder, SheetTimeline};
use onair_input::Workbook;
use onair_render::{FontSetup, TimelineRenderer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "onair")]
#[command(author, version, about = "Broadcast segment timeline charts", long_about = None)]
struct Cli {
    /// Workbook with one sheet per broadcast
    #[arg(long, value_name = "FILE")]
    excel: PathBuf,

    /// Sheets to draw, first one at the bottom
    #[arg(long, value_name = "NAME", num_args = 1.., required = true)]
    sheets: Vec<String>,

    /// Output PNG path
    #[arg(long, value_name = "FILE", default_value = "timeline.png")]
    out: PathBuf,

    /// Draw commercial segments
    #[arg(long)]
    include_cm: bool,

    /// Output resolution
    #[arg(long, default_value_t = 200.0)]
    dpi: f64,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let sheets = read_sheets(&cli)?;

    let fonts = FontSetup::discover();
    let renderer = TimelineRenderer::new().dpi(cli.dpi).with_fonts(&fonts);
    renderer
        .save_png(&sheets, &cli.out)
        .with_context(|| format!("failed to write chart to {}", cli.out.display()))?;

    println!("Saved: {}", cli.out.display());
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn read_sheets(cli: &Cli) -> Result<Vec<SheetTimeline>> {
    let mut workbook = Workbook::open(&cli.excel)
        .with_context(|| format!("failed to open {}", cli.excel.display()))?;
    let builder = RowBuilder::new(BuildOptions::new().include_commercials(cli.include_cm));

    let mut sheets = Vec::with_capacity(cli.sheets.len());
    for name in &cli.sheets {
        let table = workbook
            .read_table(name)
            .with_context(|| format!("failed to read sheet '{name}'"))?;
        let sheet = builder.build_sheet(name, &table);
        if sheet.is_empty() {
            warn!(sheet = %name, "no usable rows, drawing an empty row");
        }
        info!(sheet = %name, segments = sheet.segments.len(), total = sheet.total_length(), "sheet built");
        sheets.push(sheet);
    }
    Ok(sheets)
}
