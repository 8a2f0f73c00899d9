//! Care seasons and the calendar arithmetic behind seasonal due dates
//!
//! Seasons have fixed month/day boundaries, inclusive on both ends:
//!
//! | Season | Start | End   |
//! |--------|-------|-------|
//! | Spring | 03-20 | 06-20 |
//! | Summer | 06-21 | 09-21 |
//! | Autumn | 09-22 | 12-20 |
//! | Winter | 12-21 | 03-19 |
//!
//! Winter crosses the new year. Containment is tested on a fixed leap-year
//! day-of-year scale with modular distance, so every season, wrapping or
//! not, goes through [`SeasonWindow::contains`].

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::Clock;

/// Days in the leap-year scale used for month/day comparisons
const DAYS_IN_SCALE: i64 = 366;

/// Days before the first of each month in a leap year
const DAYS_BEFORE_MONTH: [i64; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// Errors raised by the season calculator
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SeasonError {
    #[error("Invalid season: {0}")]
    InvalidSeason(String),

    #[error("Date out of range for year {year}")]
    DateOutOfRange { year: i32 },
}

/// A calendar care season
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

/// Coarse bucket used to pick a watering frequency
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum HalfYear {
    Summer,
    Winter,
}

/// A month/day pair without a year
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

/// Inclusive `[start, end]` boundary of a season
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    pub start: MonthDay,
    pub end: MonthDay,
}

impl MonthDay {
    pub const fn new(month: u32, day: u32) -> Self {
        Self { month, day }
    }

    pub fn of(date: NaiveDate) -> Self {
        Self::new(date.month(), date.day())
    }

    /// Zero-based position on the leap-year scale (Feb 29 included)
    fn day_of_year(self) -> i64 {
        DAYS_BEFORE_MONTH[(self.month - 1) as usize] + i64::from(self.day) - 1
    }

    /// Place this month/day in a concrete year
    pub fn in_year(self, year: i32) -> Result<NaiveDate, SeasonError> {
        NaiveDate::from_ymd_opt(year, self.month, self.day)
            .ok_or(SeasonError::DateOutOfRange { year })
    }
}

impl SeasonWindow {
    /// True when the window runs past December 31st
    pub fn wraps_year(&self) -> bool {
        self.end < self.start
    }

    pub fn contains(&self, day: MonthDay) -> bool {
        let start = self.start.day_of_year();
        let span = (self.end.day_of_year() - start).rem_euclid(DAYS_IN_SCALE);
        let offset = (day.day_of_year() - start).rem_euclid(DAYS_IN_SCALE);
        offset <= span
    }
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn window(&self) -> SeasonWindow {
        let (start, end) = match self {
            Season::Spring => (MonthDay::new(3, 20), MonthDay::new(6, 20)),
            Season::Summer => (MonthDay::new(6, 21), MonthDay::new(9, 21)),
            Season::Autumn => (MonthDay::new(9, 22), MonthDay::new(12, 20)),
            Season::Winter => (MonthDay::new(12, 21), MonthDay::new(3, 19)),
        };
        SeasonWindow { start, end }
    }

    pub fn start(&self) -> MonthDay {
        self.window().start
    }

    pub fn end(&self) -> MonthDay {
        self.window().end
    }

    pub fn half_year(&self) -> HalfYear {
        match self {
            Season::Spring | Season::Summer => HalfYear::Summer,
            Season::Autumn | Season::Winter => HalfYear::Winter,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.window().contains(MonthDay::of(date))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
            Season::Winter => "Winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = SeasonError;

    /// Case-insensitive; "fall" is accepted for autumn
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "autumn" | "fall" => Ok(Season::Autumn),
            "winter" => Ok(Season::Winter),
            _ => Err(SeasonError::InvalidSeason(s.to_string())),
        }
    }
}

impl fmt::Display for HalfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HalfYear::Summer => write!(f, "Summer"),
            HalfYear::Winter => write!(f, "Winter"),
        }
    }
}

/// Season whose window contains `date`
pub fn season_of(date: NaiveDate) -> Season {
    // The four windows partition the year; only Winter can be left over.
    Season::ALL
        .into_iter()
        .find(|season| season.contains(date))
        .unwrap_or(Season::Winter)
}

/// Half-year bucket of `date`
pub fn half_year_of(date: NaiveDate) -> HalfYear {
    season_of(date).half_year()
}

pub fn is_date_in_season(date: NaiveDate, season: Season) -> bool {
    season.contains(date)
}

/// [`is_date_in_season`] for a season given by name
pub fn is_date_in_named_season(date: NaiveDate, season: &str) -> Result<bool, SeasonError> {
    let season: Season = season.parse()?;
    Ok(is_date_in_season(date, season))
}

/// Start of the season cycle that `reference` is in or heading towards.
///
/// The window is anchored on `reference.year()`; Winter starts the previous
/// year. While the reference is inside the window, or before it, the
/// window's own start is returned even though it may lie in the past. Once
/// the window has ended, the start of the following cycle is returned.
pub fn start_of_current_or_next(reference: NaiveDate, season: Season) -> Result<NaiveDate, SeasonError> {
    let window = season.window();
    let year = reference.year();
    let (start, end, next_start) = if window.wraps_year() {
        (
            window.start.in_year(year - 1)?,
            window.end.in_year(year)?,
            window.start.in_year(year)?,
        )
    } else {
        (
            window.start.in_year(year)?,
            window.end.in_year(year)?,
            window.start.in_year(year + 1)?,
        )
    };

    if reference > end {
        Ok(next_start)
    } else {
        Ok(start)
    }
}

/// First season start strictly after `date`.
///
/// Used once a care action has been performed: being inside the target
/// season already advances to the next cycle. For Winter, dates between
/// January 1st and the end of the window fall before December 21st and so
/// resolve to the same year's start.
pub fn start_of_target_season(date: NaiveDate, season: Season) -> Result<NaiveDate, SeasonError> {
    let start = season.start();
    let year = if MonthDay::of(date) < start {
        date.year()
    } else {
        date.year() + 1
    };
    start.in_year(year)
}

pub fn current_season(clock: &impl Clock) -> Season {
    season_of(clock.today())
}

pub fn current_half_year(clock: &impl Clock) -> HalfYear {
    half_year_of(clock.today())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FixedClock;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_season_of_regular_dates() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Winter),
            (4, Season::Spring),
            (5, Season::Spring),
            (6, Season::Spring),
            (7, Season::Summer),
            (8, Season::Summer),
            (9, Season::Summer),
            (10, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Autumn),
        ];
        for (month, season) in expected {
            assert_eq!(season_of(date(2023, month, 1)), season, "month {month}");
        }
        assert_eq!(season_of(date(2023, 12, 31)), Season::Winter);
    }

    #[test]
    fn test_season_of_boundaries() {
        assert_eq!(season_of(date(2023, 3, 20)), Season::Spring);
        assert_eq!(season_of(date(2023, 6, 20)), Season::Spring);
        assert_eq!(season_of(date(2023, 6, 21)), Season::Summer);
        assert_eq!(season_of(date(2023, 9, 21)), Season::Summer);
        assert_eq!(season_of(date(2023, 9, 22)), Season::Autumn);
        assert_eq!(season_of(date(2023, 12, 20)), Season::Autumn);
        assert_eq!(season_of(date(2023, 12, 21)), Season::Winter);
        assert_eq!(season_of(date(2023, 3, 19)), Season::Winter);
        assert_eq!(season_of(date(2024, 2, 29)), Season::Winter);
    }

    #[test]
    fn test_half_year_of() {
        for month in 1..=12 {
            let d = date(2023, month, 1);
            let expected = match month {
                4..=9 => HalfYear::Summer,
                _ => HalfYear::Winter,
            };
            assert_eq!(half_year_of(d), expected, "month {month}");
        }
        assert_eq!(half_year_of(date(2023, 3, 20)), HalfYear::Summer);
        assert_eq!(half_year_of(date(2023, 9, 21)), HalfYear::Summer);
        assert_eq!(half_year_of(date(2023, 9, 22)), HalfYear::Winter);
        assert_eq!(half_year_of(date(2023, 3, 19)), HalfYear::Winter);
    }

    #[test]
    fn test_is_date_in_season() {
        assert!(is_date_in_season(date(2023, 3, 20), Season::Spring));
        assert!(is_date_in_season(date(2023, 6, 20), Season::Spring));
        assert!(is_date_in_season(date(2023, 6, 21), Season::Summer));
        assert!(is_date_in_season(date(2023, 9, 21), Season::Summer));
        assert!(is_date_in_season(date(2023, 9, 22), Season::Autumn));
        assert!(is_date_in_season(date(2023, 12, 20), Season::Autumn));
        assert!(is_date_in_season(date(2023, 12, 21), Season::Winter));
        assert!(is_date_in_season(date(2023, 3, 19), Season::Winter));
        assert!(!is_date_in_season(date(2023, 3, 20), Season::Winter));
        assert!(!is_date_in_season(date(2023, 12, 20), Season::Winter));
    }

    #[test]
    fn test_named_season_errors() {
        assert_eq!(
            is_date_in_named_season(date(2023, 3, 19), "foo"),
            Err(SeasonError::InvalidSeason("foo".to_string()))
        );
        assert_eq!(is_date_in_named_season(date(2023, 3, 19), "winter"), Ok(true));
    }

    #[test]
    fn test_season_parsing() {
        assert_eq!("Spring".parse::<Season>().unwrap(), Season::Spring);
        assert_eq!("SUMMER".parse::<Season>().unwrap(), Season::Summer);
        assert_eq!("fall".parse::<Season>().unwrap(), Season::Autumn);
        assert_eq!(" autumn ".parse::<Season>().unwrap(), Season::Autumn);
        assert!("monsoon".parse::<Season>().is_err());
        assert_eq!(Season::Winter.to_string(), "Winter");
    }

    #[test]
    fn test_winter_wraps() {
        assert!(Season::Winter.window().wraps_year());
        for season in [Season::Spring, Season::Summer, Season::Autumn] {
            assert!(!season.window().wraps_year());
        }
    }

    #[test]
    fn test_start_of_current_or_next_winter() {
        assert_eq!(start_of_current_or_next(date(2023, 1, 1), Season::Winter).unwrap(), date(2022, 12, 21));
        assert_eq!(start_of_current_or_next(date(2023, 12, 20), Season::Winter).unwrap(), date(2023, 12, 21));
        assert_eq!(start_of_current_or_next(date(2023, 12, 21), Season::Winter).unwrap(), date(2023, 12, 21));
        assert_eq!(start_of_current_or_next(date(2023, 3, 19), Season::Winter).unwrap(), date(2022, 12, 21));
    }

    #[test]
    fn test_start_of_current_or_next_other_seasons() {
        assert_eq!(start_of_current_or_next(date(2023, 3, 20), Season::Spring).unwrap(), date(2023, 3, 20));
        assert_eq!(start_of_current_or_next(date(2023, 5, 20), Season::Spring).unwrap(), date(2023, 3, 20));
        assert_eq!(start_of_current_or_next(date(2023, 7, 20), Season::Spring).unwrap(), date(2024, 3, 20));
        assert_eq!(start_of_current_or_next(date(2024, 3, 19), Season::Spring).unwrap(), date(2024, 3, 20));
        assert_eq!(start_of_current_or_next(date(2023, 7, 1), Season::Summer).unwrap(), date(2023, 6, 21));
        assert_eq!(start_of_current_or_next(date(2023, 10, 1), Season::Summer).unwrap(), date(2024, 6, 21));
    }

    #[test]
    fn test_start_of_target_season() {
        assert_eq!(start_of_target_season(date(2023, 2, 20), Season::Spring).unwrap(), date(2023, 3, 20));
        assert_eq!(start_of_target_season(date(2023, 3, 20), Season::Spring).unwrap(), date(2024, 3, 20));
        assert_eq!(start_of_target_season(date(2023, 4, 1), Season::Spring).unwrap(), date(2024, 3, 20));
        assert_eq!(start_of_target_season(date(2023, 7, 1), Season::Spring).unwrap(), date(2024, 3, 20));
    }

    #[test]
    fn test_start_of_target_season_winter() {
        assert_eq!(start_of_target_season(date(2022, 12, 25), Season::Winter).unwrap(), date(2023, 12, 21));
        assert_eq!(start_of_target_season(date(2023, 2, 20), Season::Winter).unwrap(), date(2023, 12, 21));
        assert_eq!(start_of_target_season(date(2023, 12, 20), Season::Winter).unwrap(), date(2023, 12, 21));
        assert_eq!(start_of_target_season(date(2023, 12, 21), Season::Winter).unwrap(), date(2024, 12, 21));
    }

    #[test]
    fn test_date_out_of_range() {
        let last = NaiveDate::MAX;
        assert!(matches!(
            start_of_target_season(last, Season::Spring),
            Err(SeasonError::DateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_current_season_uses_clock() {
        let clock = FixedClock(date(2023, 7, 14));
        assert_eq!(current_season(&clock), Season::Summer);
        assert_eq!(current_half_year(&clock), HalfYear::Summer);

        let clock = FixedClock(date(2023, 12, 25));
        assert_eq!(current_season(&clock), Season::Winter);
        assert_eq!(current_half_year(&clock), HalfYear::Winter);
    }

    fn any_date() -> impl Strategy<Value = NaiveDate> {
        (1900i32..2200, 0u32..366).prop_map(|(year, offset)| {
            let first = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
            let days = offset.min(if first.leap_year() { 365 } else { 364 });
            first + chrono::Duration::days(i64::from(days))
        })
    }

    fn any_season() -> impl Strategy<Value = Season> {
        prop::sample::select(Season::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_exactly_one_season(d in any_date()) {
            let matching = Season::ALL.iter().filter(|s| s.contains(d)).count();
            prop_assert_eq!(matching, 1);
            prop_assert!(season_of(d).contains(d));
        }

        #[test]
        fn prop_target_season_is_strictly_later(d in any_date(), season in any_season()) {
            let next = start_of_target_season(d, season).unwrap();
            prop_assert!(next > d);
            prop_assert_eq!(MonthDay::of(next), season.start());
            prop_assert!((next - d).num_days() <= 366);
        }

        #[test]
        fn prop_current_or_next_is_nearby_start(d in any_date(), season in any_season()) {
            let start = start_of_current_or_next(d, season).unwrap();
            prop_assert_eq!(MonthDay::of(start), season.start());
            if start <= d {
                // only a season that is running right now can start in the past
                prop_assert!(season.contains(d));
                prop_assert!((d - start).num_days() <= 92);
            } else {
                prop_assert!((start - d).num_days() <= 366);
            }
        }
    }
}
