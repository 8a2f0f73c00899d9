//! Plant identification answers
//!
//! Opens identification requests within the user's quota, records the
//! service's response and applies approved care sheets to plants.

use chrono::{DateTime, Utc};
use serde_json::Value;
use shared::{AiPlantAnswer, Plant, PlantUser};

use crate::error::{AppError, AppResult};

/// Service managing AI plant answers
#[derive(Debug, Clone)]
pub struct AiAnswerService {
    max_usage: u32,
}

impl AiAnswerService {
    pub fn new(max_usage: u32) -> Self {
        Self { max_usage }
    }

    /// Staff are never limited; everyone else stops at the configured maximum
    pub fn has_reached_max_ai_usage(&self, user: &PlantUser, current_usage: usize) -> bool {
        if user.is_staff {
            return false;
        }
        current_usage >= self.max_usage as usize
    }

    fn ensure_ai_enabled(user: &PlantUser) -> AppResult<()> {
        if !user.has_ai_enabled {
            return Err(AppError::PermissionDenied(
                "User does not have AI enabled".to_string(),
            ));
        }
        Ok(())
    }

    fn ensure_owner(user: &PlantUser, plant: &Plant) -> AppResult<()> {
        if plant.user_id != user.id {
            return Err(AppError::PermissionDenied(format!(
                "Plant {} does not belong to {}",
                plant.id, user.email
            )));
        }
        Ok(())
    }

    /// Open an identification request for a plant.
    ///
    /// A plant with neither a name nor an image cannot be identified; the
    /// answer is returned already failed so the attempt is still recorded.
    pub fn open_request(
        &self,
        user: &PlantUser,
        plant: &Plant,
        current_usage: usize,
        now: DateTime<Utc>,
    ) -> AppResult<AiPlantAnswer> {
        Self::ensure_owner(user, plant)?;
        Self::ensure_ai_enabled(user)?;
        if self.has_reached_max_ai_usage(user, current_usage) {
            return Err(AppError::UsageLimitReached(format!(
                "{} of {} requests used",
                current_usage, self.max_usage
            )));
        }

        let mut answer = AiPlantAnswer::new(plant.id, now);
        if plant.name.is_none() && plant.image.is_none() {
            answer.fail("Plant does not have name or image")?;
            tracing::warn!(plant_id = %plant.id, "Identification request without name or image");
        } else {
            answer.start()?;
            tracing::info!(plant_id = %plant.id, answer_id = %answer.id, "Identification request opened");
        }
        Ok(answer)
    }

    /// Record the raw service response for an in-progress answer, with the
    /// generated picture of the plant if there is one
    pub fn record_response(
        &self,
        answer: &mut AiPlantAnswer,
        plant: &Plant,
        response: &Value,
        image: Option<String>,
    ) -> AppResult<()> {
        if let Err(e) = answer.record_response(response, plant.name.as_deref()) {
            tracing::warn!(answer_id = %answer.id, error = %e, "Identification failed");
            return Err(e.into());
        }
        if let Some(image) = image {
            answer.attach_image(image);
        }
        tracing::info!(answer_id = %answer.id, "Identification succeeded");
        Ok(())
    }

    /// Apply a successful answer to its plant
    pub fn approve(
        &self,
        user: &PlantUser,
        answer: &AiPlantAnswer,
        plant: &mut Plant,
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        Self::ensure_owner(user, plant)?;
        Self::ensure_ai_enabled(user)?;
        if answer.plant_id != plant.id {
            return Err(AppError::Validation {
                field: "plant".to_string(),
                message: format!("Answer {} is for another plant", answer.id),
            });
        }
        answer.apply_to(plant, now)?;
        tracing::info!(answer_id = %answer.id, plant_id = %plant.id, "Answer applied to plant");
        Ok(())
    }
}
