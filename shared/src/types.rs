//! Common types used across the platform

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Source of "today" for every due-date computation
pub trait Clock {
    fn today(&self) -> NaiveDate;

    /// Timestamp for records written at `today`; midnight UTC unless the
    /// clock knows the time of day
    fn now(&self) -> DateTime<Utc> {
        self.today().and_time(NaiveTime::default()).and_utc()
    }
}

/// Wall-clock date in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn today(&self) -> NaiveDate {
        (**self).today()
    }

    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

/// Supported languages
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "EN")]
    English,
    #[serde(rename = "FR")]
    French,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "EN",
            Language::French => "FR",
        }
    }
}
