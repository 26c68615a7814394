use chrono::{Datelike, Local, NaiveDate};

/// NBA seasons roll over in September: anything from that month on
/// belongs to the season starting in the current calendar year.
const NEW_SEASON_MONTH: u32 = 9;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeasonWindow {
    pub current: String,
    pub previous: String,
}

impl SeasonWindow {
    pub fn for_date(today: NaiveDate) -> Self {
        let start = if today.month() >= NEW_SEASON_MONTH {
            today.year()
        } else {
            today.year() - 1
        };
        Self {
            current: season_token(start),
            previous: season_token(start - 1),
        }
    }

    pub fn now() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    /// Acquisition order: current season first, then the previous one.
    pub fn tries(&self) -> [&str; 2] {
        [self.current.as_str(), self.previous.as_str()]
    }
}

pub fn season_token(start_year: i32) -> String {
    format!("{}-{:02}", start_year, (start_year + 1).rem_euclid(100))
}
