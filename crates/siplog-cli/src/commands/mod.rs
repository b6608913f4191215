//! Command implementations.

pub mod drink;
pub mod grain;

use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;
use serde::Serialize;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use siplog_store::{JsonFileSnapshot, Store, StoreEvent, StoreOptions};
use siplog_types::{Drink, GrainPurchase, LogRecord, Window};

use crate::cli::{OutputFormat, StatsFormat};
use crate::config::Config;
use crate::format;

/// Everything a command needs besides its own arguments.
pub struct AppContext {
    pub data_dir: Option<PathBuf>,
    pub debounce: Duration,
    pub currency: Option<String>,
    pub quiet: bool,
}

impl AppContext {
    fn snapshot_path(&self, file: &str) -> PathBuf {
        match &self.data_dir {
            Some(dir) => dir.join(file),
            None => siplog_store::default_data_path(file),
        }
    }

    /// Open the drink log.
    pub fn open_drinks(&self) -> Store<Drink> {
        let store = Store::open(
            JsonFileSnapshot::new(self.snapshot_path("drinks.json")),
            StoreOptions::with_debounce(self.debounce),
        );
        attach_event_log(&store);
        store
    }

    /// Open the grain-purchase log.
    pub fn open_grains(&self) -> Store<GrainPurchase> {
        let store = Store::open(
            JsonFileSnapshot::new(self.snapshot_path("grains.json")),
            StoreOptions::with_debounce(self.debounce),
        );
        attach_event_log(&store);
        store
    }
}

/// Trace every mutation at debug level.
fn attach_event_log<R: LogRecord>(store: &Store<R>) {
    store.subscribe(|event| match event {
        StoreEvent::Added(record) => debug!("added {}", record.id()),
        StoreEvent::Updated(record) => debug!("updated {}", record.id()),
        StoreEvent::Removed(id) => debug!("removed {}", id),
        StoreEvent::Cleared => debug!("cleared"),
    });
}

/// Labels that differ between the two logs in stats output.
pub struct StatsLabels {
    pub title: &'static str,
    pub count: &'static str,
    pub unit: &'static str,
}

/// List the records of a window, newest first.
pub fn run_list<R>(
    store: &Store<R>,
    window: Window,
    format: OutputFormat,
    describe: impl Fn(&R) -> String,
) -> Result<()>
where
    R: LogRecord + Serialize,
{
    let records = store.query(window);
    match format {
        OutputFormat::Text => {
            if records.is_empty() {
                println!("Nothing logged for {window}.");
                return Ok(());
            }
            for record in &records {
                println!("{}  {}", describe(record), record.id().to_string().dimmed());
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        OutputFormat::Csv => print!("{}", siplog_store::to_csv_string(&records)?),
    }
    Ok(())
}

/// Print the aggregates of a window.
pub fn run_stats<R: LogRecord>(
    store: &Store<R>,
    window: Window,
    format: StatsFormat,
    labels: &StatsLabels,
    currency: Option<&str>,
) -> Result<()> {
    let summary = store.summary(window);
    match format {
        StatsFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        StatsFormat::Text => {
            println!("{} ({})", labels.title, window.to_string().bold());
            println!("  {}: {}", labels.count, summary.count);
            println!("  Total: {:.0} {}", summary.total_quantity, labels.unit);
            println!(
                "  Spent: {}",
                format::price(summary.total_spent, currency)
            );
            println!(
                "  Per 100 {}: {}",
                labels.unit,
                format::price(summary.average_unit_price, currency)
            );
        }
    }
    Ok(())
}

/// Print summary rows for recent calendar months or years, newest first.
pub fn run_history<R: LogRecord>(
    store: &Store<R>,
    months: u32,
    years: Option<u32>,
    format: StatsFormat,
    labels: &StatsLabels,
    currency: Option<&str>,
) -> Result<()> {
    let anchor = OffsetDateTime::now_utc();
    let windows = match years {
        Some(count) => Window::recent_years(anchor, count),
        None => Window::last_months(anchor, months),
    };

    match format {
        StatsFormat::Json => {
            #[derive(Serialize)]
            struct Row {
                window: String,
                #[serde(flatten)]
                summary: siplog_store::Summary,
            }
            let rows: Vec<Row> = windows
                .iter()
                .map(|window| Row {
                    window: window.to_string(),
                    summary: store.summary(*window),
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        StatsFormat::Text => {
            // No styling in the header: escape codes would skew the padding.
            println!(
                "{:<8}  {:>6}  {:>12}  {:>12}",
                "window",
                labels.count,
                format!("total {}", labels.unit),
                "spent"
            );
            for window in windows {
                let summary = store.summary(window);
                println!(
                    "{:<8}  {:>6}  {:>12.0}  {:>12}",
                    window.to_string(),
                    summary.count,
                    summary.total_quantity,
                    format::price(summary.total_spent, currency),
                );
            }
        }
    }
    Ok(())
}

/// Export the records of a window as CSV, to stdout or a file.
pub fn run_export<R>(store: &Store<R>, window: Window, output: Option<PathBuf>) -> Result<()>
where
    R: LogRecord + Serialize,
{
    let records = store.query(window);
    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            siplog_store::write_csv(&records, file)?;
            eprintln!("Exported {} records to {}", records.len(), path.display());
        }
        None => print!("{}", siplog_store::to_csv_string(&records)?),
    }
    Ok(())
}

/// Delete one record by id.
pub fn run_remove<R: LogRecord>(store: &Store<R>, id: Uuid, quiet: bool) -> Result<()> {
    if !store.remove(id) {
        bail!("no record with id {id}");
    }
    store.flush();
    if !quiet {
        println!("Removed {id}.");
    }
    Ok(())
}

/// Delete a whole log and its snapshot.
pub fn run_clear<R: LogRecord>(store: &Store<R>, label: &str, yes: bool, quiet: bool) -> Result<()> {
    if !yes {
        bail!("this deletes the whole {label} log; pass --yes to confirm");
    }
    store.clear();
    if !quiet {
        println!("Cleared the {label} log.");
    }
    Ok(())
}

/// Show the configuration, updating any fields that were passed.
pub fn run_config(
    currency: Option<String>,
    data_dir: Option<PathBuf>,
    debounce_ms: Option<u64>,
) -> Result<()> {
    let mut config = Config::load();
    let mut changed = false;
    if let Some(currency) = currency {
        config.currency = Some(currency);
        changed = true;
    }
    if let Some(dir) = data_dir {
        config.data_dir = Some(dir);
        changed = true;
    }
    if let Some(ms) = debounce_ms {
        config.debounce_ms = Some(ms);
        changed = true;
    }
    if changed {
        config.save()?;
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
