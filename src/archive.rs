use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::domain::{DailyEntry, EntryMap};
use crate::stats::{CorpusStats, progress};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    #[default]
    All,
    Week,
    Month,
    Year,
}

impl DateRange {
    pub fn days(self) -> Option<i64> {
        match self {
            DateRange::All => None,
            DateRange::Week => Some(7),
            DateRange::Month => Some(30),
            DateRange::Year => Some(365),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DateRange::All => "all time",
            DateRange::Week => "last 7 days",
            DateRange::Month => "last 30 days",
            DateRange::Year => "last 365 days",
        }
    }

    pub fn next(self) -> Self {
        match self {
            DateRange::All => DateRange::Week,
            DateRange::Week => DateRange::Month,
            DateRange::Month => DateRange::Year,
            DateRange::Year => DateRange::All,
        }
    }

    /// Oldest date still inside the range, inclusive. "Last 7 days" is
    /// today plus the six days before it.
    pub fn cutoff(self, today: NaiveDate) -> Option<NaiveDate> {
        self.days().map(|days| today - Duration::days(days - 1))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "all entries",
            StatusFilter::Completed => "completed",
            StatusFilter::Incomplete => "incomplete",
        }
    }

    pub fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::Incomplete,
            StatusFilter::Incomplete => StatusFilter::All,
        }
    }

    fn matches(self, entry: &DailyEntry) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => entry.is_active() && progress(&entry.tasks) == 100,
            StatusFilter::Incomplete => entry.is_active() && progress(&entry.tasks) < 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveQuery {
    #[serde(rename = "range")]
    pub date_range: DateRange,
    pub status: StatusFilter,
    #[serde(rename = "search")]
    pub search_text: String,
}

impl ArchiveQuery {
    pub fn is_filtered(&self) -> bool {
        self.date_range != DateRange::All || self.status != StatusFilter::All || !self.search_text.trim().is_empty()
    }
}

/// Entries matching every predicate in `query`, newest first.
pub fn filter<'a>(entries: &'a EntryMap, query: &ArchiveQuery, today: NaiveDate) -> Vec<(NaiveDate, &'a DailyEntry)> {
    let cutoff = query.date_range.cutoff(today);
    let needle = query.search_text.trim().to_lowercase();

    entries
        .iter()
        .rev()
        .filter(|(date, _)| cutoff.is_none_or(|cutoff| **date >= cutoff))
        .filter(|(_, entry)| matches_text(entry, &needle))
        .filter(|(_, entry)| query.status.matches(entry))
        .map(|(date, entry)| (*date, entry))
        .collect()
}

fn matches_text(entry: &DailyEntry, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let contains = |text: &str| text.to_lowercase().contains(needle);
    entry.tasks.iter().any(|task| contains(&task.title))
        || entry.goals.iter().any(|goal| contains(&goal.title))
        || contains(&entry.notes)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveExport<'a> {
    pub entries: BTreeMap<NaiveDate, &'a DailyEntry>,
    pub stats: CorpusStats,
    pub export_date: DateTime<Utc>,
    pub filters: &'a ArchiveQuery,
}

impl<'a> ArchiveExport<'a> {
    pub fn new(
        results: &[(NaiveDate, &'a DailyEntry)],
        stats: CorpusStats,
        filters: &'a ArchiveQuery,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            entries: results.iter().copied().collect(),
            stats,
            export_date: now,
            filters,
        }
    }
}
