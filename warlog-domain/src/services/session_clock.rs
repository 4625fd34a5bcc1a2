use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Turns time-of-day stamps inside one server session into full timestamps.
///
/// The first stamp of the session is remembered; any later stamp earlier
/// than it is taken to be past midnight and moved to the next day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClock {
    anchor_date: NaiveDate,
    init_time: Option<NaiveDateTime>,
}

impl SessionClock {
    pub fn new(anchor_date: NaiveDate) -> Self {
        Self {
            anchor_date,
            init_time: None,
        }
    }

    pub fn anchor_date(&self) -> NaiveDate {
        self.anchor_date
    }

    pub fn init_time(&self) -> Option<NaiveDateTime> {
        self.init_time
    }

    pub fn resolve(&mut self, time: NaiveTime) -> NaiveDateTime {
        let candidate = self.anchor_date.and_time(time);
        let init = *self.init_time.get_or_insert(candidate);
        if candidate < init {
            candidate + Duration::days(1)
        } else {
            candidate
        }
    }
}
