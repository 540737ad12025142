//! Post-Trade Analysis CLI
//!
//! ```text
//! post_trade_analysis <month> <start_day> <end_day> <year> <orders_path> <trades_path>
//!     [--env dev] [--output DIR]
//! ```
//!
//! Reads both captures for the day range, runs the accounting pipeline and
//! writes the report artifact to the output directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, error::ErrorKind};

use post_trade_analysis::config::AppConfig;
use post_trade_analysis::pipeline::{self, ReportRequest};
use post_trade_analysis::report::summary_text;
use post_trade_analysis::stream_reader::JsonlStreamReader;

#[derive(Parser, Debug)]
#[command(
    name = "post_trade_analysis",
    version,
    about = "Post-trade P&L and position report from order and trade captures"
)]
struct Cli {
    /// Month of capture
    month: u32,
    /// Start day of capture
    start_day: u32,
    /// End day of capture (inclusive)
    end_day: u32,
    /// Year of capture
    year: i32,
    /// Root directory of the orders capture
    orders_path: PathBuf,
    /// Root directory of the trades capture
    trades_path: PathBuf,

    /// Config environment, loads config/<env>.yaml
    #[arg(long, short = 'e', default_value = "dev")]
    env: String,

    /// Output directory (overrides config output_dir)
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Cli {
    fn request(&self) -> Result<ReportRequest, clap::Error> {
        let date = |day: u32| {
            NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
                Cli::command().error(
                    ErrorKind::ValueValidation,
                    format!("invalid date: {}-{:02}-{:02}", self.year, self.month, day),
                )
            })
        };
        let start = date(self.start_day)?;
        let end = date(self.end_day)?;
        if end < start {
            return Err(Cli::command().error(
                ErrorKind::ValueValidation,
                format!("end_day {} is before start_day {}", self.end_day, self.start_day),
            ));
        }

        Ok(ReportRequest {
            start,
            end,
            orders_path: self.orders_path.clone(),
            trades_path: self.trades_path.clone(),
        })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    // Usage errors exit here, before any config or capture is touched.
    let request = cli.request().unwrap_or_else(|e| e.exit());

    let app_config = AppConfig::load(&cli.env)?;
    let _log_guard = post_trade_analysis::logging::init_logging(&app_config);

    tracing::info!("Starting post-trade analysis in {} mode", cli.env);

    let artifact = pipeline::run(&request, &JsonlStreamReader, &app_config.accounting)
        .context("post-trade analysis failed")?;

    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(&app_config.output_dir));
    let paths = artifact
        .write_to(&output_dir)
        .with_context(|| format!("Failed to write report to {}", output_dir.display()))?;

    println!("=== Post Trade Analysis ===\n");
    print!("{}", summary_text(&artifact.summary));
    println!("\nRows:   {}", paths.rows_csv.display());
    println!("Prices: {}", paths.trade_prices_csv.display());

    Ok(())
}
