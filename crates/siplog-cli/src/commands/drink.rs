//! Drink subcommands.

use anyhow::{Context, Result};
use time::OffsetDateTime;

use siplog_types::{Drink, DrinkFields, DrinkKind};

use crate::cli::DrinkAction;
use crate::commands::{self, AppContext, StatsLabels};
use crate::format;
use crate::util;

const LABELS: StatsLabels = StatsLabels {
    title: "Drinks",
    count: "Cups",
    unit: "ml",
};

/// Execute a drink subcommand.
pub fn run(action: DrinkAction, ctx: &AppContext) -> Result<()> {
    let store = ctx.open_drinks();
    match action {
        DrinkAction::Add {
            ml,
            price,
            place,
            kind,
            date,
        } => {
            let drink = store.add(DrinkFields {
                date: resolve_date(date.as_deref())?,
                ml,
                price,
                place,
                kind: resolve_kind(&kind),
            });
            // One-shot process: persist now instead of waiting out the debounce.
            store.flush();
            if !ctx.quiet {
                println!(
                    "Logged {}: {} ml, {} ({})",
                    drink.kind,
                    drink.ml,
                    format::price(drink.price, ctx.currency.as_deref()),
                    format::day(drink.date),
                );
            }
            Ok(())
        }

        DrinkAction::Edit {
            id,
            ml,
            price,
            place,
            kind,
            date,
        } => {
            let current = store
                .get(id)
                .with_context(|| format!("no drink with id {id}"))?;
            let updated = store.update(
                id,
                DrinkFields {
                    date: match date {
                        Some(s) => util::parse_date(&s)?,
                        None => current.date,
                    },
                    ml: ml.unwrap_or(current.ml),
                    price: price.unwrap_or(current.price),
                    place: place.unwrap_or(current.place),
                    kind: match kind {
                        Some(name) => resolve_kind(&name),
                        None => current.kind,
                    },
                },
            )?;
            store.flush();
            if !ctx.quiet {
                println!("Updated {}.", updated.id);
            }
            Ok(())
        }

        DrinkAction::Remove { id } => commands::run_remove(&store, id, ctx.quiet),

        DrinkAction::List {
            window,
            format: list_format,
        } => {
            let currency = ctx.currency.clone();
            commands::run_list(
                &store,
                util::parse_window(&window)?,
                list_format,
                move |drink: &Drink| {
                    format!(
                        "{}  {:>5} ml  {:>10}  {:<12} {}",
                        format::day(drink.date),
                        drink.ml,
                        format::price(drink.price, currency.as_deref()),
                        drink.kind.label(),
                        drink.place,
                    )
                },
            )
        }

        DrinkAction::Stats {
            window,
            format: stats_format,
        } => commands::run_stats(
            &store,
            util::parse_window(&window)?,
            stats_format,
            &LABELS,
            ctx.currency.as_deref(),
        ),

        DrinkAction::History {
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

        DrinkAction::Export { window, output } => {
            commands::run_export(&store, util::parse_window(&window)?, output)
        }

        DrinkAction::Clear { yes } => commands::run_clear(&store, "drink", yes, ctx.quiet),
    }
}

fn resolve_date(date: Option<&str>) -> Result<OffsetDateTime> {
    match date {
        Some(s) => util::parse_date(s),
        None => Ok(OffsetDateTime::now_utc()),
    }
}

/// Known kinds match by slug or label; anything else is kept verbatim as
/// the free-text override.
fn resolve_kind(name: &str) -> DrinkKind {
    DrinkKind::from_name(name).unwrap_or_else(|| DrinkKind::Other(name.trim().to_string()))
}
