use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ledgerlens_core::{BalanceSnapshot, DateRange, Ledger};
use ledgerlens_export::{export_csv, export_tally, validate_export, ExportBlob};
use ledgerlens_import::{
    cell_flow, display_cell, filter_by_date, is_low_priority, ledger_from_csv, ledger_from_json,
    recompute, role_of, CellFlow, ColumnRole, InferenceMethod, LedgerOrder,
};
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

mod config;

use config::{load_config, Overrides};

#[derive(Parser, Debug)]
#[command(name = "ledgerlens", version, about = "Bank statement normalisation and export")]
struct Cli {
    /// Extracted statement: a `.json` payload or a `.csv` table
    #[arg(long, short)]
    input: PathBuf,

    /// TOML file with export settings
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Column roles, ledger order and inferred balances
    Summary {
        #[arg(long)]
        json: bool,
    },

    /// Rows dated inside a range (both ends inclusive, YYYY-MM-DD)
    Filter {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },

    /// Write the whole ledger as CSV
    ExportCsv {
        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// File stem (default: the input file's stem)
        #[arg(long)]
        name: Option<String>,
    },

    /// Write accounting vouchers for a date range
    ExportTally {
        /// Output directory
        #[arg(long)]
        out: PathBuf,

        /// Bank ledger name as it appears in the accounting system
        #[arg(long)]
        ledger_name: Option<String>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        /// File stem (default: the ledger name)
        #[arg(long)]
        file_name: Option<String>,
    },
}

#[derive(Serialize)]
struct ColumnSummary<'a> {
    name: &'a str,
    role: ColumnRole,
    low_priority: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    rows: usize,
    columns: Vec<ColumnSummary<'a>>,
    order: Option<LedgerOrder>,
    method: Option<InferenceMethod>,
    balance: BalanceSnapshot,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ledger = read_ledger(&cli.input)?;
    info!(rows = ledger.len(), columns = ledger.width(), "loaded {}", cli.input.display());

    match cli.command {
        Command::Summary { json } => summary(&ledger, json)?,

        Command::Filter { from, to } => {
            let range = DateRange::parse_bounds(from.as_deref(), to.as_deref());
            let filtered = filter_by_date(&ledger, &range);
            print_rows(filtered.ledger());
            println!("\n{} of {} rows ({range})", filtered.len(), ledger.len());
        }

        Command::ExportCsv { out, name } => {
            let stem = match name {
                Some(n) => n,
                None => default_stem(&cli.input),
            };
            let blob = export_csv(&ledger, &stem)?;
            write_blob(&out, &blob)?;
        }

        Command::ExportTally {
            out,
            ledger_name,
            from,
            to,
            file_name,
        } => {
            let config = Overrides {
                ledger_name,
                from,
                to,
                file_name,
            }
            .apply(load_config(cli.config.as_deref())?);

            let advisories = validate_export(&ledger, &config);
            if let Some(first) = advisories.first() {
                for advisory in &advisories {
                    eprintln!("  - {advisory}");
                }
                bail!("export blocked: {first}");
            }
            let blob = export_tally(&ledger, &config)?;
            write_blob(&out, &blob)?;
        }
    }

    Ok(())
}

fn read_ledger(path: &Path) -> Result<Ledger> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let ledger = if is_json {
        ledger_from_json(file)
    } else {
        ledger_from_csv(file)
    };
    ledger.with_context(|| format!("parse {}", path.display()))
}

fn default_stem(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "statement".to_string())
}

fn summary(ledger: &Ledger, json: bool) -> Result<()> {
    let state = recompute(ledger, &DateRange::unbounded());
    let summary = Summary {
        rows: ledger.len(),
        columns: ledger
            .columns()
            .iter()
            .map(|name| ColumnSummary {
                name: name.as_str(),
                role: role_of(name),
                low_priority: is_low_priority(name),
            })
            .collect(),
        order: state.inference.map(|i| i.order),
        method: state.inference.map(|i| i.method),
        balance: state.snapshot(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{} rows", summary.rows);
    for (i, col) in summary.columns.iter().enumerate() {
        let flag = if col.low_priority { " (secondary)" } else { "" };
        println!("  [{i}] {:<24} {}{flag}", col.name, col.role);
    }
    match (summary.order, summary.method) {
        (Some(order), Some(method)) => {
            let direction = if order.is_chronological {
                "oldest first"
            } else {
                "newest first"
            };
            println!(
                "Order: {direction} (oldest row {} on {}, newest row {} on {})",
                order.oldest_index, order.oldest_date, order.newest_index, order.newest_date
            );
            println!("Opening balance: {} (via {method})", summary.balance.opening);
            println!("Closing balance: {}", summary.balance.closing);
        }
        _ => println!("Balances: not available (needs Date and Balance columns)"),
    }
    Ok(())
}

fn print_rows(ledger: &Ledger) {
    println!("{}", ledger.columns().join(" | "));
    for row in ledger.rows() {
        let cells: Vec<String> = ledger
            .columns()
            .iter()
            .zip(row.cells())
            .map(|(header, cell)| {
                let shown = display_cell(cell);
                match cell_flow(header, cell, row.cells()) {
                    Some(CellFlow::Outflow) => format!("-{shown}"),
                    Some(CellFlow::Inflow) => format!("+{shown}"),
                    None => shown.to_string(),
                }
            })
            .collect();
        println!("{}", cells.join(" | "));
    }
}

fn write_blob(dir: &Path, blob: &ExportBlob) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(&blob.file_name);
    fs::write(&path, &blob.content).with_context(|| format!("write {}", path.display()))?;
    info!(mime = blob.mime, "wrote {}", path.display());
    println!("{}", path.display());
    Ok(())
}
