use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Half-open instant range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    pub fn extend_back(&self, by: Duration) -> Self {
        Self {
            start: self.start - by,
            end: self.end,
        }
    }
}

/// Interprets a wall-clock time read from the log at the given offset.
pub fn local_to_utc(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(local - Duration::seconds(i64::from(offset.local_minus_utc()))))
}

/// Instants belonging to `day` as seen from `offset`.
pub fn day_range(day: NaiveDate, offset: FixedOffset) -> TimeRange {
    let start = local_to_utc(day.and_time(chrono::NaiveTime::MIN), offset);
    TimeRange {
        start,
        end: start + Duration::days(1),
    }
}

pub fn millis_to_utc(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

pub fn utc_to_millis(instant: DateTime<Utc>) -> i64 {
    instant.timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(minutes: i32) -> FixedOffset {
        FixedOffset::east_opt(minutes * 60).expect("offset")
    }

    #[test]
    fn day_range_at_utc_covers_calendar_day() {
        let day = NaiveDate::from_ymd_opt(2019, 1, 10).expect("date");
        let range = day_range(day, offset(0));
        assert_eq!(range.start.to_rfc3339(), "2019-01-10T00:00:00+00:00");
        assert_eq!(range.end.to_rfc3339(), "2019-01-11T00:00:00+00:00");
        assert!(range.contains(range.start));
        assert!(!range.contains(range.end));
    }

    #[test]
    fn day_range_shifts_with_offset() {
        let day = NaiveDate::from_ymd_opt(2019, 1, 10).expect("date");
        let range = day_range(day, offset(180));
        assert_eq!(range.start.to_rfc3339(), "2019-01-09T21:00:00+00:00");
    }

    #[test]
    fn millis_round_trip_keeps_precision() {
        let instant = millis_to_utc(1_547_078_400_123);
        assert_eq!(utc_to_millis(instant), 1_547_078_400_123);
    }
}
