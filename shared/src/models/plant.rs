//! Plant and care schedule models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::season::Season;

/// A plant owned by a user, with its care schedule
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Plant {
    pub id: Uuid,
    pub user_id: Uuid,
    #[validate(length(min = 1, max = 50))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,

    pub sunlight: Option<Sunlight>,
    pub sun_exposure: Option<SunExposure>,

    /// Days between waterings from spring to the end of summer
    #[validate(range(min = 1, max = 365))]
    pub water_frequency_summer: Option<u32>,
    /// Days between waterings from autumn to the end of winter
    #[validate(range(min = 1, max = 365))]
    pub water_frequency_winter: Option<u32>,
    pub last_watered: Option<NaiveDate>,

    #[serde(default)]
    pub leaf_mist: bool,

    #[serde(default)]
    pub fertilize: SeasonalCare,
    #[serde(default)]
    pub repot: SeasonalCare,

    pub extra_tips: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A once-a-season care action (fertilizing or repotting)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeasonalCare {
    /// Whether the plant needs this action at all
    pub enabled: bool,
    pub season: Option<Season>,
    pub last_performed: Option<NaiveDate>,
}

/// How much light a plant needs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sunlight {
    LightExposure,
    PartialShade,
    Shade,
}

/// Whether a plant tolerates direct sun
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SunExposure {
    DirectSun,
    NoDirectSun,
}

/// Care actions a user can record
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CareAction {
    Water,
    Fertilize,
    Repot,
}

impl Plant {
    /// A new plant with an empty schedule
    pub fn new(user_id: Uuid, name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name: Some(name.into()),
            description: None,
            image: None,
            sunlight: None,
            sun_exposure: None,
            water_frequency_summer: None,
            water_frequency_winter: None,
            last_watered: None,
            leaf_mist: false,
            fertilize: SeasonalCare::default(),
            repot: SeasonalCare::default(),
            extra_tips: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_water_frequencies(mut self, summer: u32, winter: u32) -> Self {
        self.water_frequency_summer = Some(summer);
        self.water_frequency_winter = Some(winter);
        self
    }

    pub fn with_fertilizer(mut self, season: Option<Season>) -> Self {
        self.fertilize.enabled = true;
        self.fertilize.season = season;
        self
    }

    pub fn with_repotting(mut self, season: Option<Season>) -> Self {
        self.repot.enabled = true;
        self.repot.season = season;
        self
    }

    /// Display name, falling back to the id for unnamed plants
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.id.to_string())
    }

    /// All fields needed for a watering schedule are filled in
    pub fn is_complete(&self) -> bool {
        self.name.as_deref().is_some_and(|n| !n.is_empty())
            && self.sunlight.is_some()
            && self.sun_exposure.is_some()
            && self.water_frequency_summer.is_some()
            && self.water_frequency_winter.is_some()
    }

    pub fn seasonal(&self, action: CareAction) -> Option<&SeasonalCare> {
        match action {
            CareAction::Water => None,
            CareAction::Fertilize => Some(&self.fertilize),
            CareAction::Repot => Some(&self.repot),
        }
    }

    pub fn seasonal_mut(&mut self, action: CareAction) -> Option<&mut SeasonalCare> {
        match action {
            CareAction::Water => None,
            CareAction::Fertilize => Some(&mut self.fertilize),
            CareAction::Repot => Some(&mut self.repot),
        }
    }
}

impl std::fmt::Display for CareAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CareAction::Water => write!(f, "water"),
            CareAction::Fertilize => write!(f, "fertilize"),
            CareAction::Repot => write!(f, "repot"),
        }
    }
}

impl std::str::FromStr for Sunlight {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light_exposure" => Ok(Sunlight::LightExposure),
            "partial_shade" => Ok(Sunlight::PartialShade),
            "shade" => Ok(Sunlight::Shade),
            _ => Err(format!("Unknown sunlight option: {}", s)),
        }
    }
}

impl std::str::FromStr for SunExposure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct_sun" => Ok(SunExposure::DirectSun),
            "no_direct_sun" => Ok(SunExposure::NoDirectSun),
            _ => Err(format!("Unknown sun exposure option: {}", s)),
        }
    }
}
