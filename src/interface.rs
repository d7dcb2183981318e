use std::io::Write;

use anyhow::{Context, Result};
use prettytable::Table;

use crate::category::Category;
use crate::metrics::{fmt_minutes, Summary};
use crate::model::{Activity, ActivityId, NewActivity};
use crate::storage::KeyValueStorage;
use crate::store::ActivityStore;
use crate::timeline::{by_time, Timeline};

const EMPTY_STATE: &str = "No activities scheduled yet. Create one to get started!";
const EMPTY_TODAY: &str = "No activities created today.";
const NOTE_WIDTH: usize = 40;

pub fn add_activity<S: KeyValueStorage>(
    store: &mut ActivityStore<S>,
    out: &mut dyn Write,
    candidate: NewActivity,
) -> Result<()> {
    let activity = store.add(candidate).context("Failed to add activity.")?;
    writeln!(
        out,
        "\"{}\" added at {} for {} ({}). id: {}",
        activity.name,
        activity.time,
        fmt_minutes(activity.duration),
        activity.category.display_name(),
        activity.id
    )?;
    Ok(())
}

pub fn remove_activity<S: KeyValueStorage>(
    store: &mut ActivityStore<S>,
    out: &mut dyn Write,
    id: ActivityId,
) -> Result<()> {
    let removed = store
        .delete(id)
        .with_context(|| format!("Failed to delete activity {}.", id))?;
    if removed == 0 {
        writeln!(out, "No activity with id {}.", id)?;
    } else {
        writeln!(out, "Activity deleted")?;
    }
    Ok(())
}

/// All activities ordered by start time.
pub fn list<S: KeyValueStorage>(store: &ActivityStore<S>, out: &mut dyn Write) -> Result<()> {
    print_activities(store.activities(), EMPTY_STATE, out)
}

pub fn list_json<S: KeyValueStorage>(store: &ActivityStore<S>, out: &mut dyn Write) -> Result<()> {
    let json = serde_json::to_string_pretty(store.activities())
        .context("Failed to serialize activities.")?;
    writeln!(out, "{}", json)?;
    Ok(())
}

/// Activities created on the current day.
pub fn today<S: KeyValueStorage>(store: &ActivityStore<S>, out: &mut dyn Write) -> Result<()> {
    let today: Vec<Activity> = store.today().into_iter().cloned().collect();
    print_activities(&today, EMPTY_TODAY, out)
}

fn print_activities(activities: &[Activity], empty: &str, out: &mut dyn Write) -> Result<()> {
    if activities.is_empty() {
        writeln!(out, "{}", empty)?;
        return Ok(());
    }

    let mut table = Table::new();
    table.add_row(row!["id", "time", "activity", "duration", "category", "note"]);
    for activity in by_time(activities) {
        table.add_row(row![
            activity.id,
            activity.time,
            activity.name,
            fmt_minutes(activity.duration),
            activity.category.display_name(),
            textwrap::fill(&activity.note, NOTE_WIDTH)
        ]);
    }
    write!(out, "{}", table)?;
    Ok(())
}

pub fn timeline<S: KeyValueStorage>(store: &ActivityStore<S>, out: &mut dyn Write) -> Result<()> {
    if store.is_empty() {
        writeln!(out, "{}", EMPTY_STATE)?;
        return Ok(());
    }

    let timeline = Timeline::of(store.activities());
    let mut table = Table::new();
    for slot in &timeline.slots {
        let entries = if slot.activities.is_empty() {
            "·".to_string()
        } else {
            slot.activities
                .iter()
                .map(|a| format!("{} [{}]", a.name, a.category))
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(row![slot.label(), entries]);
    }
    write!(out, "{}", table)?;

    for activity in &timeline.unscheduled {
        writeln!(out, "Unscheduled: {} (time '{}')", activity.name, activity.time)?;
    }
    Ok(())
}

pub fn metrics<S: KeyValueStorage>(store: &ActivityStore<S>, out: &mut dyn Write) -> Result<()> {
    let summary = Summary::of(store.activities());
    let mut table = Table::new();
    table.add_row(row!["activities", format!("{} planned", summary.count)]);
    table.add_row(row!["planned time", fmt_minutes(summary.total_minutes)]);
    table.add_row(row!["outdoor time", fmt_minutes(summary.outdoor_minutes)]);
    table.add_row(row![
        "balance score",
        format!("{} ({})", summary.balance_score, summary.band)
    ]);
    write!(out, "{}", table)?;
    Ok(())
}

pub fn categories(out: &mut dyn Write) -> Result<()> {
    let mut table = Table::new();
    table.add_row(row!["key", "name", "color"]);
    for category in Category::ALL.iter() {
        table.add_row(row![category.key(), category.display_name(), category.hex()]);
    }
    write!(out, "{}", table)?;
    Ok(())
}
