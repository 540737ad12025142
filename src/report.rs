//! Report artifact - the files handed to the chart/PDF renderer
//!
//! | File | Content |
//! |------|---------|
//! | `summary.txt` | headline figures, human formatted |
//! | `summary.json` | headline figures, exact decimals |
//! | `pta_rows.csv` | augmented rows (one per order) |
//! | `trade_prices.csv` | raw trade price series |

use crate::accumulator::Summary;
use crate::augment::AugmentedRow;
use crate::core_types::{Amount, Nanos};
use crate::error::Result;
use crate::money::{format_grouped, format_money};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const SUMMARY_TXT: &str = "summary.txt";
pub const SUMMARY_JSON: &str = "summary.json";
pub const ROWS_CSV: &str = "pta_rows.csv";
pub const TRADE_PRICES_CSV: &str = "trade_prices.csv";

const ROWS_HEADER: &str = "recv_time,side,qty,price,trade_recv_time,trade_qty,trade_price,aggressor_indicator,holdings,fee,gross_pnl,net_pnl";

/// Everything the renderer needs.
#[derive(Debug, Clone)]
pub struct ReportArtifact {
    pub summary: Summary,
    pub rows: Vec<AugmentedRow>,
    /// `(recv_time, price)` of every trade, in stream order
    pub trade_prices: Vec<(Nanos, Amount)>,
}

/// Where each artifact file was written.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    pub summary_txt: PathBuf,
    pub summary_json: PathBuf,
    pub rows_csv: PathBuf,
    pub trade_prices_csv: PathBuf,
}

/// Human-readable summary block.
pub fn summary_text(summary: &Summary) -> String {
    format!(
        "Total Gross PNL: ${}\n\n\
         Total Net PNL: ${}\n\n\
         Total Fees: ${}\n\n\
         Contracts Traded: {}\n\n\
         BTC Holdings: {}\n",
        format_money(summary.gross_pnl, 2),
        format_money(summary.net_pnl, 2),
        format_money(summary.total_fees, 2),
        format_grouped(summary.contracts),
        format_grouped(summary.btc_holdings),
    )
}

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl ReportArtifact {
    /// Write all four files into `dir`, creating it if needed.
    pub fn write_to(&self, dir: &Path) -> Result<ArtifactPaths> {
        std::fs::create_dir_all(dir)?;
        let paths = ArtifactPaths {
            summary_txt: dir.join(SUMMARY_TXT),
            summary_json: dir.join(SUMMARY_JSON),
            rows_csv: dir.join(ROWS_CSV),
            trade_prices_csv: dir.join(TRADE_PRICES_CSV),
        };

        std::fs::write(&paths.summary_txt, summary_text(&self.summary))?;

        let mut json = BufWriter::new(File::create(&paths.summary_json)?);
        serde_json::to_writer_pretty(&mut json, &self.summary).map_err(std::io::Error::other)?;
        json.flush()?;

        self.write_rows(&paths.rows_csv)?;
        self.write_trade_prices(&paths.trade_prices_csv)?;

        tracing::info!(
            dir = %dir.display(),
            rows = self.rows.len(),
            trades = self.trade_prices.len(),
            "report artifact written"
        );
        Ok(paths)
    }

    fn write_rows(&self, path: &Path) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "{}", ROWS_HEADER)?;

        for r in &self.rows {
            let order = &r.row.order;
            let trade = r.row.trade.as_ref();
            writeln!(
                file,
                "{},{},{},{},{},{},{},{},{},{},{},{}",
                order.recv_time,
                order.side.as_str(),
                order.qty.normalize(),
                order.price.normalize(),
                opt(trade.map(|t| t.recv_time)),
                opt(trade.map(|t| t.qty.normalize())),
                opt(trade.map(|t| t.price.normalize())),
                opt(trade.map(|t| t.aggressor_indicator)),
                r.holdings.normalize(),
                r.fee.normalize(),
                r.gross_pnl.normalize(),
                r.net_pnl.normalize(),
            )?;
        }

        file.flush()?;
        Ok(())
    }

    fn write_trade_prices(&self, path: &Path) -> Result<()> {
        let mut file = BufWriter::new(File::create(path)?);
        writeln!(file, "recv_time,price")?;
        for (t, p) in &self.trade_prices {
            writeln!(file, "{},{}", t, p.normalize())?;
        }
        file.flush()?;
        Ok(())
    }
}
