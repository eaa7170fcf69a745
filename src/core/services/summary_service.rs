use chrono::TimeZone;
use serde::Serialize;

use crate::domain::{Entry, Label};
use crate::ledger::CalendarContext;

/// Display group an entry falls into relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeBucket {
    Today,
    ThisWeek,
    ThisMonth,
    Earlier,
}

impl TimeBucket {
    /// Fixed display order, which is also the order predicates are tried in.
    pub const ORDER: [TimeBucket; 4] = [
        TimeBucket::Today,
        TimeBucket::ThisWeek,
        TimeBucket::ThisMonth,
        TimeBucket::Earlier,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            TimeBucket::Today => "Today",
            TimeBucket::ThisWeek => "This Week",
            TimeBucket::ThisMonth => "This Month",
            TimeBucket::Earlier => "Earlier",
        }
    }

    /// First matching bucket wins, so the buckets never overlap.
    pub fn classify<Tz: TimeZone>(entry: &Entry, calendar: &CalendarContext<Tz>) -> Self {
        if calendar.is_today(&entry.time_added) {
            TimeBucket::Today
        } else if calendar.is_this_week(&entry.time_added) {
            TimeBucket::ThisWeek
        } else if calendar.is_this_month(&entry.time_added) {
            TimeBucket::ThisMonth
        } else {
            TimeBucket::Earlier
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryGroup {
    pub bucket: TimeBucket,
    pub entries: Vec<Entry>,
}

/// All-time totals. `spending` is a non-negative magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LedgerTotals {
    pub income: f64,
    pub spending: f64,
    pub net: f64,
}

pub struct SummaryService;

impl SummaryService {
    pub fn totals(entries: &[Entry]) -> LedgerTotals {
        LedgerTotals {
            income: Self::total_income(entries),
            spending: Self::total_spending(entries),
            net: Self::net_total(entries),
        }
    }

    pub fn total_income(entries: &[Entry]) -> f64 {
        entries
            .iter()
            .filter(|entry| entry.is_income())
            .map(|entry| entry.amount)
            .sum()
    }

    pub fn total_spending(entries: &[Entry]) -> f64 {
        entries
            .iter()
            .filter(|entry| entry.is_spending())
            .map(|entry| -entry.amount)
            .sum()
    }

    pub fn net_total(entries: &[Entry]) -> f64 {
        entries.iter().map(|entry| entry.amount).sum()
    }

    pub fn today_total<Tz: TimeZone>(entries: &[Entry], calendar: &CalendarContext<Tz>) -> f64 {
        entries
            .iter()
            .filter(|entry| calendar.is_today(&entry.time_added))
            .map(|entry| entry.amount)
            .sum()
    }

    /// Signed sum for one category since the start of the current week;
    /// negative when the category is net spending.
    pub fn weekly_total<Tz: TimeZone>(
        entries: &[Entry],
        category: Label,
        calendar: &CalendarContext<Tz>,
    ) -> f64 {
        entries
            .iter()
            .filter(|entry| entry.category == category)
            .filter(|entry| calendar.is_on_or_after_week_start(&entry.time_added))
            .map(|entry| entry.amount)
            .sum()
    }

    /// Groups entries for list display: non-empty buckets in fixed order,
    /// newest entry first within each.
    pub fn group_entries<Tz: TimeZone>(
        entries: &[Entry],
        calendar: &CalendarContext<Tz>,
    ) -> Vec<EntryGroup> {
        let mut groups: Vec<EntryGroup> = TimeBucket::ORDER
            .into_iter()
            .map(|bucket| EntryGroup {
                bucket,
                entries: Vec::new(),
            })
            .collect();
        for entry in entries {
            let bucket = TimeBucket::classify(entry, calendar);
            if let Some(group) = groups.iter_mut().find(|group| group.bucket == bucket) {
                group.entries.push(entry.clone());
            }
        }
        groups.retain(|group| !group.entries.is_empty());
        for group in &mut groups {
            group
                .entries
                .sort_by(|a, b| b.time_added.cmp(&a.time_added));
        }
        groups
    }
}
