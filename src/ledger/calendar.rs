use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc, Weekday};

/// Resolves day, week, and month membership of entry timestamps against a
/// fixed "now" in the user's local time zone.
#[derive(Debug, Clone)]
pub struct CalendarContext<Tz: TimeZone> {
    now: DateTime<Tz>,
    first_weekday: Weekday,
}

impl<Tz: TimeZone> CalendarContext<Tz> {
    pub fn new(now: DateTime<Tz>, first_weekday: Weekday) -> Self {
        Self { now, first_weekday }
    }

    pub fn now(&self) -> &DateTime<Tz> {
        &self.now
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_weekday
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// Local calendar date an instant falls on.
    pub fn local_date(&self, instant: &DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.now.timezone()).date_naive()
    }

    /// First day of the week containing today.
    pub fn week_start(&self) -> NaiveDate {
        start_of_week(self.today(), self.first_weekday)
    }

    pub fn is_today(&self, instant: &DateTime<Utc>) -> bool {
        self.local_date(instant) == self.today()
    }

    pub fn is_this_week(&self, instant: &DateTime<Utc>) -> bool {
        start_of_week(self.local_date(instant), self.first_weekday) == self.week_start()
    }

    pub fn is_this_month(&self, instant: &DateTime<Utc>) -> bool {
        let date = self.local_date(instant);
        let today = self.today();
        date.year() == today.year() && date.month() == today.month()
    }

    /// True when the instant is at or after local midnight on the first day of
    /// the current week. Later weeks count too.
    pub fn is_on_or_after_week_start(&self, instant: &DateTime<Utc>) -> bool {
        self.local_date(instant) >= self.week_start()
    }
}

/// Walks back from `date` to the nearest `first_weekday`.
pub fn start_of_week(date: NaiveDate, first_weekday: Weekday) -> NaiveDate {
    let offset = (date.weekday().num_days_from_monday() + 7
        - first_weekday.num_days_from_monday())
        % 7;
    date - Duration::days(i64::from(offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_start_honors_first_weekday() {
        // 2024-09-18 is a Wednesday.
        assert_eq!(start_of_week(date(2024, 9, 18), Weekday::Sun), date(2024, 9, 15));
        assert_eq!(start_of_week(date(2024, 9, 18), Weekday::Mon), date(2024, 9, 16));
        assert_eq!(start_of_week(date(2024, 9, 15), Weekday::Sun), date(2024, 9, 15));
        assert_eq!(start_of_week(date(2024, 9, 15), Weekday::Mon), date(2024, 9, 9));
    }

    #[test]
    fn week_membership_crosses_month_boundaries() {
        // Sunday 2024-09-01 starts a week that began in August for Monday starts.
        let now = Utc.with_ymd_and_hms(2024, 9, 1, 12, 0, 0).unwrap();
        let calendar = CalendarContext::new(now, Weekday::Mon);
        let last_august = Utc.with_ymd_and_hms(2024, 8, 27, 8, 0, 0).unwrap();
        assert!(calendar.is_this_week(&last_august));
        assert!(!calendar.is_this_month(&last_august));
    }

    #[test]
    fn local_dates_follow_the_offset_of_now() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 9, 18, 21, 0, 0).unwrap();
        let calendar = CalendarContext::new(now, Weekday::Sun);
        // 01:30 UTC on the 19th is still the evening of the 18th at UTC-5.
        let late = Utc.with_ymd_and_hms(2024, 9, 19, 1, 30, 0).unwrap();
        assert!(calendar.is_today(&late));
        let early = Utc.with_ymd_and_hms(2024, 9, 18, 3, 0, 0).unwrap();
        assert!(!calendar.is_today(&early));
    }
}
