use budget_buddy::{
    core::services::{SummaryService, TimeBucket},
    domain::{Entry, Label},
    ledger::CalendarContext,
};
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc, Weekday};

/// Deterministic spread of entries over roughly three months before `now`,
/// plus a couple in the future.
fn generated_entries(now: DateTime<Utc>, count: usize) -> Vec<Entry> {
    let mut seed: u64 = 0x5eed_1234;
    let mut next = move || {
        seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        seed >> 33
    };
    (0..count)
        .map(|idx| {
            let minutes_back = (next() % (95 * 24 * 60)) as i64 - 2 * 24 * 60;
            let cents = (next() % 200_000) as i64 - 120_000;
            let label = Label::ALL[(next() % 4) as usize];
            Entry::new(
                cents as f64 / 100.0,
                label,
                format!("generated {idx}"),
                now - Duration::minutes(minutes_back),
                format!("Goal {}", idx + 1),
            )
        })
        .collect()
}

fn contexts() -> Vec<CalendarContext<FixedOffset>> {
    let offsets = [0, 5 * 3600 + 1800, -8 * 3600];
    let mut contexts = Vec::new();
    for offset in offsets {
        let tz = FixedOffset::east_opt(offset).unwrap();
        for first in [Weekday::Sun, Weekday::Mon] {
            contexts.push(CalendarContext::new(
                tz.with_ymd_and_hms(2024, 10, 2, 9, 30, 0).unwrap(),
                first,
            ));
            contexts.push(CalendarContext::new(
                tz.with_ymd_and_hms(2024, 3, 31, 23, 45, 0).unwrap(),
                first,
            ));
        }
    }
    contexts
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn income_minus_spending_equals_sum_of_amounts() {
    let now = Utc.with_ymd_and_hms(2024, 10, 2, 9, 30, 0).unwrap();
    for count in [0, 1, 17, 400] {
        let entries = generated_entries(now, count);
        let totals = SummaryService::totals(&entries);
        let sum: f64 = entries.iter().map(|entry| entry.amount).sum();
        assert!(totals.spending >= 0.0);
        assert!(close(totals.income - totals.spending, sum));
        assert!(close(totals.net, sum));
    }
}

#[test]
fn grouping_partitions_entries_by_first_matching_bucket() {
    for calendar in contexts() {
        let entries = generated_entries(calendar.now().with_timezone(&Utc), 300);
        let groups = SummaryService::group_entries(&entries, &calendar);

        let grouped: usize = groups.iter().map(|group| group.entries.len()).sum();
        assert_eq!(grouped, entries.len());

        for entry in &entries {
            let holders: Vec<_> = groups
                .iter()
                .filter(|group| group.entries.iter().any(|e| e.id == entry.id))
                .collect();
            assert_eq!(holders.len(), 1, "entry {} must be in one group", entry.id);

            let expected = if calendar.is_today(&entry.time_added) {
                TimeBucket::Today
            } else if calendar.is_this_week(&entry.time_added) {
                TimeBucket::ThisWeek
            } else if calendar.is_this_month(&entry.time_added) {
                TimeBucket::ThisMonth
            } else {
                TimeBucket::Earlier
            };
            assert_eq!(holders[0].bucket, expected);
        }
    }
}

#[test]
fn groups_keep_fixed_order_and_newest_first() {
    for calendar in contexts() {
        let entries = generated_entries(calendar.now().with_timezone(&Utc), 250);
        let groups = SummaryService::group_entries(&entries, &calendar);

        let positions: Vec<usize> = groups
            .iter()
            .map(|group| {
                TimeBucket::ORDER
                    .iter()
                    .position(|bucket| *bucket == group.bucket)
                    .unwrap()
            })
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        for group in &groups {
            assert!(!group.entries.is_empty());
            assert!(group
                .entries
                .windows(2)
                .all(|pair| pair[0].time_added >= pair[1].time_added));
        }
    }
}

#[test]
fn today_and_weekly_totals_match_their_filters() {
    for calendar in contexts() {
        let entries = generated_entries(calendar.now().with_timezone(&Utc), 200);
        let today: f64 = entries
            .iter()
            .filter(|entry| calendar.is_today(&entry.time_added))
            .map(|entry| entry.amount)
            .sum();
        assert!(close(SummaryService::today_total(&entries, &calendar), today));

        let per_label: f64 = Label::ALL
            .iter()
            .map(|label| SummaryService::weekly_total(&entries, *label, &calendar))
            .sum();
        let since_week_start: f64 = entries
            .iter()
            .filter(|entry| calendar.is_on_or_after_week_start(&entry.time_added))
            .map(|entry| entry.amount)
            .sum();
        assert!(close(per_label, since_week_start));
    }
}
