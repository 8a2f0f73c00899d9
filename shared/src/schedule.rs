//! Due dates and "should I act now" checks for plant care
//!
//! Everything here is a pure function of the plant and an explicit `today`.
//!
//! - Watering is due `frequency` days after the last watering, where the
//!   frequency is the summer or winter one depending on the half-year the
//!   last watering fell in. A plant that was never watered is due today.
//! - Fertilizing and repotting happen once per assigned season. Before the
//!   first time, the due date is the start of the current or next cycle of
//!   that season. After it has been done, the due date is always the start
//!   of the following cycle.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{
    half_year_of, start_of_current_or_next, start_of_target_season, CareAction, HalfYear, Plant,
    SeasonError, SeasonalCare,
};

/// Errors from due-date computation and action recording
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CareError {
    #[error("A season must be set before the next {action} date can be computed")]
    MissingSeasonAssignment { action: CareAction },

    #[error("This plant does not require {action}")]
    NotApplicable { action: CareAction },

    #[error("No {half_year} watering frequency set")]
    MissingWaterFrequency { half_year: HalfYear },

    #[error(transparent)]
    Season(#[from] SeasonError),
}

/// Snapshot of a plant's care needs on a given day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CareStatus {
    pub next_water_date: NaiveDate,
    pub next_fertilize_date: Option<NaiveDate>,
    pub next_repotting_date: Option<NaiveDate>,
    pub should_water: bool,
    pub should_fertilize: bool,
    pub should_repot: bool,
}

impl CareStatus {
    pub fn needs_care(&self) -> bool {
        self.should_water || self.should_fertilize || self.should_repot
    }

    pub fn due_actions(&self) -> Vec<CareAction> {
        [
            (CareAction::Water, self.should_water),
            (CareAction::Fertilize, self.should_fertilize),
            (CareAction::Repot, self.should_repot),
        ]
        .into_iter()
        .filter_map(|(action, due)| due.then_some(action))
        .collect()
    }
}

/// Watering frequency in effect after a watering on `last_watered`
pub fn water_frequency(plant: &Plant, last_watered: NaiveDate) -> Result<u32, CareError> {
    let half_year = half_year_of(last_watered);
    let frequency = match half_year {
        HalfYear::Summer => plant.water_frequency_summer,
        HalfYear::Winter => plant.water_frequency_winter,
    };
    frequency.ok_or(CareError::MissingWaterFrequency { half_year })
}

pub fn next_water_date(plant: &Plant, today: NaiveDate) -> Result<NaiveDate, CareError> {
    match plant.last_watered {
        None => Ok(today),
        Some(last) => {
            let days = water_frequency(plant, last)?;
            last.checked_add_days(Days::new(u64::from(days)))
                .ok_or(SeasonError::DateOutOfRange { year: last.year() }.into())
        }
    }
}

/// Next date for a seasonal action; `None` when the plant doesn't need it
pub fn next_seasonal_date(
    care: &SeasonalCare,
    action: CareAction,
    today: NaiveDate,
) -> Result<Option<NaiveDate>, CareError> {
    if !care.enabled {
        return Ok(None);
    }
    let season = care
        .season
        .ok_or(CareError::MissingSeasonAssignment { action })?;
    let due = match care.last_performed {
        None => start_of_current_or_next(today, season)?,
        Some(last) => start_of_target_season(last, season)?,
    };
    Ok(Some(due))
}

/// Next due date for any action
pub fn next_due_date(
    plant: &Plant,
    action: CareAction,
    today: NaiveDate,
) -> Result<Option<NaiveDate>, CareError> {
    match plant.seasonal(action) {
        None => next_water_date(plant, today).map(Some),
        Some(care) => next_seasonal_date(care, action, today),
    }
}

pub fn should_act(plant: &Plant, action: CareAction, today: NaiveDate) -> Result<bool, CareError> {
    Ok(next_due_date(plant, action, today)?.is_some_and(|due| today >= due))
}

pub fn care_status(plant: &Plant, today: NaiveDate) -> Result<CareStatus, CareError> {
    let next_water_date = next_water_date(plant, today)?;
    let next_fertilize_date = next_seasonal_date(&plant.fertilize, CareAction::Fertilize, today)?;
    let next_repotting_date = next_seasonal_date(&plant.repot, CareAction::Repot, today)?;

    let due = |date: Option<NaiveDate>| date.is_some_and(|d| today >= d);
    Ok(CareStatus {
        next_water_date,
        next_fertilize_date,
        next_repotting_date,
        should_water: today >= next_water_date,
        should_fertilize: due(next_fertilize_date),
        should_repot: due(next_repotting_date),
    })
}

/// Record that `action` was performed on `today`
pub fn record_care(plant: &mut Plant, action: CareAction, today: NaiveDate) -> Result<(), CareError> {
    match plant.seasonal_mut(action) {
        None => plant.last_watered = Some(today),
        Some(care) if care.enabled => care.last_performed = Some(today),
        Some(_) => return Err(CareError::NotApplicable { action }),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Season;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pachira() -> Plant {
        Plant::new(Uuid::new_v4(), "Pachira").with_water_frequencies(7, 14)
    }

    #[test]
    fn test_never_watered_is_due_today() {
        let plant = pachira();
        let today = date(2023, 1, 1);
        assert_eq!(next_water_date(&plant, today).unwrap(), today);
        assert!(should_act(&plant, CareAction::Water, today).unwrap());
    }

    #[test]
    fn test_watering_summer() {
        let mut plant = pachira();
        record_care(&mut plant, CareAction::Water, date(2023, 6, 1)).unwrap();
        assert_eq!(next_water_date(&plant, date(2023, 6, 1)).unwrap(), date(2023, 6, 8));
        assert!(!should_act(&plant, CareAction::Water, date(2023, 6, 1)).unwrap());
        assert!(!should_act(&plant, CareAction::Water, date(2023, 6, 7)).unwrap());
        assert!(should_act(&plant, CareAction::Water, date(2023, 6, 8)).unwrap());
    }

    #[test]
    fn test_watering_winter() {
        let mut plant = pachira();
        record_care(&mut plant, CareAction::Water, date(2023, 1, 1)).unwrap();
        assert_eq!(next_water_date(&plant, date(2023, 1, 1)).unwrap(), date(2023, 1, 15));
        assert!(!should_act(&plant, CareAction::Water, date(2023, 1, 14)).unwrap());
        assert!(should_act(&plant, CareAction::Water, date(2023, 1, 15)).unwrap());
    }

    #[test]
    fn test_frequency_follows_last_watering() {
        // watered on the last day of summer, checked in autumn: summer frequency applies
        let mut plant = pachira();
        record_care(&mut plant, CareAction::Water, date(2023, 9, 21)).unwrap();
        assert_eq!(next_water_date(&plant, date(2023, 9, 25)).unwrap(), date(2023, 9, 28));
    }

    #[test]
    fn test_missing_water_frequency() {
        let mut plant = pachira();
        plant.water_frequency_winter = None;
        plant.last_watered = Some(date(2023, 1, 1));
        assert_eq!(
            next_water_date(&plant, date(2023, 1, 2)),
            Err(CareError::MissingWaterFrequency { half_year: HalfYear::Winter })
        );
    }

    #[test]
    fn test_next_water_date_out_of_range() {
        let mut plant = pachira();
        plant.last_watered = Some(NaiveDate::MAX);
        assert_eq!(
            next_water_date(&plant, NaiveDate::MAX),
            Err(CareError::Season(SeasonError::DateOutOfRange { year: NaiveDate::MAX.year() }))
        );
    }

    #[test]
    fn test_fertilize_not_applicable() {
        let mut plant = pachira();
        assert_eq!(
            record_care(&mut plant, CareAction::Fertilize, date(2023, 1, 1)),
            Err(CareError::NotApplicable { action: CareAction::Fertilize })
        );
        assert_eq!(
            record_care(&mut plant, CareAction::Repot, date(2023, 1, 1)),
            Err(CareError::NotApplicable { action: CareAction::Repot })
        );
        assert!(plant.fertilize.last_performed.is_none());
    }

    #[test]
    fn test_should_not_fertilize() {
        let today = date(2023, 12, 20);
        let mut plant = pachira();
        assert!(!should_act(&plant, CareAction::Fertilize, today).unwrap());

        plant.fertilize.enabled = true;
        assert_eq!(
            should_act(&plant, CareAction::Fertilize, today),
            Err(CareError::MissingSeasonAssignment { action: CareAction::Fertilize })
        );

        plant.fertilize.season = Some(Season::Winter);
        assert!(!should_act(&plant, CareAction::Fertilize, today).unwrap());

        plant.fertilize.season = Some(Season::Autumn);
        record_care(&mut plant, CareAction::Fertilize, today).unwrap();
        assert!(!should_act(&plant, CareAction::Fertilize, today).unwrap());
    }

    #[test]
    fn test_should_fertilize() {
        let plant = pachira().with_fertilizer(Some(Season::Winter));
        assert!(should_act(&plant, CareAction::Fertilize, date(2023, 12, 21)).unwrap());
    }

    #[test]
    fn test_first_fertilize_date() {
        let winter = pachira().with_fertilizer(Some(Season::Winter));
        let next = |p: &Plant, today| next_due_date(p, CareAction::Fertilize, today).unwrap();
        assert_eq!(next(&winter, date(2023, 1, 1)), Some(date(2022, 12, 21)));
        assert_eq!(next(&winter, date(2023, 6, 1)), Some(date(2023, 12, 21)));
        assert_eq!(next(&winter, date(2022, 6, 1)), Some(date(2022, 12, 21)));

        let summer = pachira().with_fertilizer(Some(Season::Summer));
        assert_eq!(next(&summer, date(2023, 7, 1)), Some(date(2023, 6, 21)));
        assert_eq!(next(&summer, date(2023, 3, 1)), Some(date(2023, 6, 21)));
        assert_eq!(next(&summer, date(2023, 10, 1)), Some(date(2024, 6, 21)));
    }

    #[test]
    fn test_fertilize_date_after_fertilizing() {
        let cases = [
            (Season::Winter, date(2023, 1, 1), date(2023, 12, 21)),
            (Season::Winter, date(2023, 6, 1), date(2023, 12, 21)),
            (Season::Winter, date(2022, 6, 1), date(2022, 12, 21)),
            (Season::Summer, date(2023, 7, 1), date(2024, 6, 21)),
            (Season::Summer, date(2023, 3, 1), date(2023, 6, 21)),
            (Season::Summer, date(2023, 10, 1), date(2024, 6, 21)),
        ];
        for (season, today, expected) in cases {
            let mut plant = pachira().with_fertilizer(Some(season));
            record_care(&mut plant, CareAction::Fertilize, today).unwrap();
            assert_eq!(
                next_due_date(&plant, CareAction::Fertilize, today).unwrap(),
                Some(expected),
                "{season} fertilized on {today}"
            );
        }
    }

    #[test]
    fn test_winter_fertilizing_is_not_due_again_same_cycle() {
        let mut plant = pachira().with_fertilizer(Some(Season::Winter));
        assert!(should_act(&plant, CareAction::Fertilize, date(2023, 1, 1)).unwrap());

        record_care(&mut plant, CareAction::Fertilize, date(2023, 1, 1)).unwrap();
        assert!(!should_act(&plant, CareAction::Fertilize, date(2023, 1, 2)).unwrap());
        assert!(!should_act(&plant, CareAction::Fertilize, date(2023, 12, 20)).unwrap());
        assert!(should_act(&plant, CareAction::Fertilize, date(2023, 12, 21)).unwrap());
    }

    #[test]
    fn test_repot_schedule() {
        let mut plant = pachira().with_repotting(Some(Season::Spring));
        let today = date(2023, 12, 20);
        assert!(!should_act(&plant, CareAction::Repot, today).unwrap());
        assert_eq!(
            next_due_date(&plant, CareAction::Repot, today).unwrap(),
            Some(date(2024, 3, 20))
        );

        record_care(&mut plant, CareAction::Repot, date(2024, 4, 2)).unwrap();
        assert_eq!(
            next_due_date(&plant, CareAction::Repot, date(2024, 4, 2)).unwrap(),
            Some(date(2025, 3, 20))
        );
    }

    #[test]
    fn test_care_status() {
        let mut plant = pachira()
            .with_fertilizer(Some(Season::Winter))
            .with_repotting(Some(Season::Spring));
        plant.last_watered = Some(date(2023, 1, 1));

        let status = care_status(&plant, date(2023, 1, 2)).unwrap();
        assert_eq!(status.next_water_date, date(2023, 1, 15));
        assert_eq!(status.next_fertilize_date, Some(date(2022, 12, 21)));
        assert_eq!(status.next_repotting_date, Some(date(2023, 3, 20)));
        assert!(!status.should_water);
        assert!(status.should_fertilize);
        assert!(!status.should_repot);
        assert!(status.needs_care());
        assert_eq!(status.due_actions(), vec![CareAction::Fertilize]);
    }

    #[test]
    fn test_care_status_propagates_missing_season() {
        let plant = pachira().with_repotting(None);
        assert_eq!(
            care_status(&plant, date(2023, 1, 1)),
            Err(CareError::MissingSeasonAssignment { action: CareAction::Repot })
        );
    }
}
