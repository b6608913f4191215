//! Grain-purchase subcommands.

use anyhow::{Context, Result};
use time::OffsetDateTime;

use siplog_types::{GrainFields, GrainPurchase};

use crate::cli::GrainAction;
use crate::commands::{self, AppContext, StatsLabels};
use crate::format;
use crate::util;

const LABELS: StatsLabels = StatsLabels {
    title: "Grain purchases",
    count: "Bags",
    unit: "g",
};

/// Execute a grain subcommand.
pub fn run(action: GrainAction, ctx: &AppContext) -> Result<()> {
    let store = ctx.open_grains();
    match action {
        GrainAction::Add {
            name,
            weight,
            price,
            date,
        } => {
            let grain = store.add(GrainFields {
                date: resolve_date(date.as_deref())?,
                name,
                weight,
                price,
            });
            // One-shot process: persist now instead of waiting out the debounce.
            store.flush();
            if !ctx.quiet {
                println!(
                    "Logged {}: {:.0} g, {} ({})",
                    grain.name,
                    grain.weight,
                    format::price(grain.price, ctx.currency.as_deref()),
                    format::day(grain.date),
                );
            }
            Ok(())
        }

        GrainAction::Edit {
            id,
            name,
            weight,
            price,
            date,
        } => {
            let current = store
                .get(id)
                .with_context(|| format!("no grain purchase with id {id}"))?;
            let updated = store.update(
                id,
                GrainFields {
                    date: match date {
                        Some(s) => util::parse_date(&s)?,
                        None => current.date,
                    },
                    name: name.unwrap_or(current.name),
                    weight: weight.unwrap_or(current.weight),
                    price: price.unwrap_or(current.price),
                },
            )?;
            store.flush();
            if !ctx.quiet {
                println!("Updated {}.", updated.id);
            }
            Ok(())
        }

        GrainAction::Remove { id } => commands::run_remove(&store, id, ctx.quiet),

        GrainAction::List {
            window,
            format: list_format,
        } => {
            let currency = ctx.currency.clone();
            commands::run_list(
                &store,
                util::parse_window(&window)?,
                list_format,
                move |grain: &GrainPurchase| {
                    format!(
                        "{}  {:>6.0} g  {:>10}  {}",
                        format::day(grain.date),
                        grain.weight,
                        format::price(grain.price, currency.as_deref()),
                        grain.name,
                    )
                },
            )
        }

        GrainAction::Stats {
            window,
            format: stats_format,
        } => commands::run_stats(
            &store,
            util::parse_window(&window)?,
            stats_format,
            &LABELS,
            ctx.currency.as_deref(),
        ),

        GrainAction::History {
            months,
            years,
            format: history_format,
        } => commands::run_history(
            &store,
            months,
            years,
            history_format,
            &LABELS,
            ctx.currency.as_deref(),
        ),

        GrainAction::Export { window, output } => {
            commands::run_export(&store, util::parse_window(&window)?, output)
        }

        GrainAction::Clear { yes } => commands::run_clear(&store, "grain", yes, ctx.quiet),
    }
}

fn resolve_date(date: Option<&str>) -> Result<OffsetDateTime> {
    match date {
        Some(s) => util::parse_date(s),
        None => Ok(OffsetDateTime::now_utc()),
    }
}
