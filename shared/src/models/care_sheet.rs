//! Care sheets produced by the plant identification service
//!
//! The identification service answers with a JSON object describing how to
//! look after a plant. Those answers are stored as [`AiPlantAnswer`]s and,
//! once approved, copied onto the plant's schedule.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use super::plant::{Plant, SunExposure, Sunlight};
use super::season::Season;
use crate::validation::validate_water_frequency;

/// Keys every care sheet answer must carry
pub const CARE_SHEET_KEYS: [&str; 11] = [
    "description",
    "water_frequency_summer",
    "water_frequency_winter",
    "sunlight",
    "sun_exposure",
    "fertilizer",
    "fertilizer_season",
    "repotting",
    "repotting_season",
    "leaf_mist",
    "extra_tips",
];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CareSheetError {
    #[error("Plant could not be recognized")]
    UnknownPlant,

    #[error("Care sheet is missing keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Cannot move answer from {from} to {to}")]
    InvalidTransition { from: AnswerStatus, to: AnswerStatus },

    #[error("Answer is not successful (status: {0})")]
    NotSuccessful(AnswerStatus),
}

/// Care instructions for one plant species
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CareSheet {
    /// Known or recognized plant name; `None` when neither is available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub description: String,
    pub water_frequency_summer: u32,
    pub water_frequency_winter: u32,
    pub sunlight: Sunlight,
    pub sun_exposure: SunExposure,
    pub fertilizer: bool,
    pub fertilizer_season: Option<Season>,
    pub repotting: bool,
    pub repotting_season: Option<Season>,
    pub leaf_mist: bool,
    pub extra_tips: String,
}

/// Progress of an identification request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AnswerStatus {
    #[default]
    NotStarted,
    InProgress,
    Success,
    Failure,
}

/// A stored answer from the identification service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiPlantAnswer {
    pub id: Uuid,
    pub plant_id: Uuid,
    #[serde(default)]
    pub status: AnswerStatus,
    pub json_answer: Option<CareSheet>,
    pub error_message: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl std::fmt::Display for AnswerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerStatus::NotStarted => write!(f, "not_started"),
            AnswerStatus::InProgress => write!(f, "in_progress"),
            AnswerStatus::Success => write!(f, "success"),
            AnswerStatus::Failure => write!(f, "failure"),
        }
    }
}

fn invalid(field: &str, message: impl Into<String>) -> CareSheetError {
    CareSheetError::InvalidField {
        field: field.to_string(),
        message: message.into(),
    }
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str) -> Result<&'a str, CareSheetError> {
    obj.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(key, "expected a string"))
}

fn frequency_field(obj: &Map<String, Value>, key: &str) -> Result<u32, CareSheetError> {
    let days = obj
        .get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| invalid(key, "expected a whole number of days"))?;
    validate_water_frequency(days).map_err(|e| invalid(key, e))
}

/// Booleans sometimes come back as "True"/"False" strings
fn bool_field(obj: &Map<String, Value>, key: &str) -> Result<bool, CareSheetError> {
    match obj.get(key) {
        Some(Value::Bool(b)) => Ok(*b),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("true") => Ok(true),
        Some(Value::String(s)) if s.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(invalid(key, "expected true or false")),
    }
}

/// A season is only required when the matching action is enabled
fn season_field(
    obj: &Map<String, Value>,
    key: &str,
    required: bool,
) -> Result<Option<Season>, CareSheetError> {
    let parsed = obj.get(key).and_then(Value::as_str).map(str::parse::<Season>);
    match (parsed, required) {
        (Some(Ok(season)), _) => Ok(Some(season)),
        (Some(Err(e)), true) => Err(invalid(key, e.to_string())),
        (None, true) => Err(invalid(key, "expected a season")),
        (_, false) => Ok(None),
    }
}

impl CareSheet {
    pub fn is_json_valid(answer: &Value) -> bool {
        answer
            .as_object()
            .is_some_and(|obj| CARE_SHEET_KEYS.iter().all(|key| obj.contains_key(*key)))
    }

    /// Parse a raw answer for a plant.
    ///
    /// `plant_name` is the plant's own name. Without one, a recognized
    /// `name` in the answer is used instead.
    pub fn from_json_answer(answer: &Value, plant_name: Option<&str>) -> Result<Self, CareSheetError> {
        let obj = answer
            .as_object()
            .ok_or_else(|| invalid("answer", "expected a JSON object"))?;

        if obj.contains_key("error") {
            return Err(CareSheetError::UnknownPlant);
        }

        let missing: Vec<String> = CARE_SHEET_KEYS
            .iter()
            .filter(|key| !obj.contains_key(**key))
            .map(|key| key.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CareSheetError::MissingKeys(missing));
        }

        let fertilizer = bool_field(obj, "fertilizer")?;
        let repotting = bool_field(obj, "repotting")?;

        Ok(Self {
            name: plant_name
                .or_else(|| obj.get("name").and_then(Value::as_str))
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string),
            description: str_field(obj, "description")?.to_string(),
            water_frequency_summer: frequency_field(obj, "water_frequency_summer")?,
            water_frequency_winter: frequency_field(obj, "water_frequency_winter")?,
            sunlight: str_field(obj, "sunlight")?
                .parse()
                .map_err(|e: String| invalid("sunlight", e))?,
            sun_exposure: str_field(obj, "sun_exposure")?
                .parse()
                .map_err(|e: String| invalid("sun_exposure", e))?,
            fertilizer,
            fertilizer_season: season_field(obj, "fertilizer_season", fertilizer)?,
            repotting,
            repotting_season: season_field(obj, "repotting_season", repotting)?,
            leaf_mist: bool_field(obj, "leaf_mist")?,
            extra_tips: str_field(obj, "extra_tips")?.to_string(),
        })
    }

    /// Copy the instructions onto a plant's schedule.
    ///
    /// Care history (last watered, fertilized, repotted) is left untouched.
    /// The plant keeps its own name if it already has one.
    pub fn apply_to(&self, plant: &mut Plant, now: DateTime<Utc>) {
        if plant.name.is_none() {
            plant.name = self.name.clone();
        }
        plant.description = Some(self.description.clone());
        plant.water_frequency_summer = Some(self.water_frequency_summer);
        plant.water_frequency_winter = Some(self.water_frequency_winter);
        plant.sunlight = Some(self.sunlight);
        plant.sun_exposure = Some(self.sun_exposure);
        plant.fertilize.enabled = self.fertilizer;
        plant.fertilize.season = self.fertilizer_season;
        plant.repot.enabled = self.repotting;
        plant.repot.season = self.repotting_season;
        plant.leaf_mist = self.leaf_mist;
        plant.extra_tips = Some(self.extra_tips.clone());
        plant.updated_at = now;
    }
}

impl AiPlantAnswer {
    pub fn new(plant_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            plant_id,
            status: AnswerStatus::NotStarted,
            json_answer: None,
            error_message: None,
            image: None,
            created_at: now,
        }
    }

    fn transition(&mut self, to: AnswerStatus) -> Result<(), CareSheetError> {
        let allowed = matches!(
            (self.status, to),
            (AnswerStatus::NotStarted, AnswerStatus::InProgress)
                | (AnswerStatus::InProgress, AnswerStatus::Success)
                | (AnswerStatus::NotStarted, AnswerStatus::Failure)
                | (AnswerStatus::InProgress, AnswerStatus::Failure)
        );
        if !allowed {
            return Err(CareSheetError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    pub fn start(&mut self) -> Result<(), CareSheetError> {
        self.transition(AnswerStatus::InProgress)
    }

    pub fn succeed(&mut self, sheet: CareSheet) -> Result<(), CareSheetError> {
        self.transition(AnswerStatus::Success)?;
        self.json_answer = Some(sheet);
        self.error_message = None;
        Ok(())
    }

    pub fn fail(&mut self, message: impl Into<String>) -> Result<(), CareSheetError> {
        self.transition(AnswerStatus::Failure)?;
        self.error_message = Some(message.into());
        Ok(())
    }

    /// Record the service's raw response for an in-progress request.
    ///
    /// A response that cannot be parsed moves the answer to `Failure` with
    /// the parse error as its message, and the error is returned.
    pub fn record_response(
        &mut self,
        response: &Value,
        plant_name: Option<&str>,
    ) -> Result<(), CareSheetError> {
        match CareSheet::from_json_answer(response, plant_name) {
            Ok(sheet) => self.succeed(sheet),
            Err(e) => {
                self.fail(e.to_string())?;
                Err(e)
            }
        }
    }

    /// Attach a generated picture of the plant
    pub fn attach_image(&mut self, image: impl Into<String>) {
        self.image = Some(image.into());
    }

    /// Apply a successful answer to its plant; the answer's image is only
    /// used when the plant has none
    pub fn apply_to(&self, plant: &mut Plant, now: DateTime<Utc>) -> Result<(), CareSheetError> {
        match (&self.status, &self.json_answer) {
            (AnswerStatus::Success, Some(sheet)) => {
                sheet.apply_to(plant, now);
                if plant.image.is_none() {
                    plant.image = self.image.clone();
                }
                Ok(())
            }
            (status, _) => Err(CareSheetError::NotSuccessful(*status)),
        }
    }
}
