//! Storage models for the plant care backend
//!
//! Re-exports models from the shared crate and adds the JSON-file roster
//! and outbox the CLI works against.

use std::path::Path;

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

pub use shared::models::*;

use crate::error::{AppError, AppResult};

/// Everything the care check needs, persisted as a single JSON document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub users: Vec<RosterEntry>,
    #[serde(default)]
    pub ai_answers: Vec<AiPlantAnswer>,
}

/// A user with their notification preferences and plants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    pub user: PlantUser,
    pub notification_center: NotificationCenter,
    #[serde(default)]
    pub plants: Vec<Plant>,
}

/// Produced notifications awaiting delivery
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Outbox {
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl RosterEntry {
    pub fn new(user: PlantUser) -> Self {
        let notification_center = NotificationCenter::new(user.id);
        Self {
            user,
            notification_center,
            plants: Vec::new(),
        }
    }
}

impl Roster {
    /// Read and validate a roster file
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path).await?;
        let roster: Roster = serde_json::from_str(&raw)?;
        roster.validate()?;
        tracing::debug!(
            path = %path.display(),
            users = roster.users.len(),
            answers = roster.ai_answers.len(),
            "Roster loaded"
        );
        Ok(roster)
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        write_json(path.as_ref(), self).await
    }

    /// Validate every record and the ownership links between them
    pub fn validate(&self) -> AppResult<()> {
        for entry in &self.users {
            entry.user.validate()?;
            entry.notification_center.validate()?;
            if entry.notification_center.user_id != entry.user.id {
                return Err(AppError::Validation {
                    field: "notification_center".to_string(),
                    message: format!("Notification center does not belong to {}", entry.user.email),
                });
            }
            for plant in &entry.plants {
                plant.validate()?;
                if plant.user_id != entry.user.id {
                    return Err(AppError::Validation {
                        field: "plants".to_string(),
                        message: format!(
                            "Plant {} does not belong to {}",
                            plant.display_name(),
                            entry.user.email
                        ),
                    });
                }
            }
        }
        for answer in &self.ai_answers {
            if self.find_plant(answer.plant_id).is_none() {
                return Err(AppError::Validation {
                    field: "ai_answers".to_string(),
                    message: format!("Answer {} references an unknown plant", answer.id),
                });
            }
        }
        Ok(())
    }

    pub fn plants(&self) -> impl Iterator<Item = &Plant> {
        self.users.iter().flat_map(|entry| entry.plants.iter())
    }

    pub fn find_plant(&self, plant_id: Uuid) -> Option<&Plant> {
        self.plants().find(|plant| plant.id == plant_id)
    }

    pub fn find_plant_mut(&mut self, plant_id: Uuid) -> Option<&mut Plant> {
        self.users
            .iter_mut()
            .flat_map(|entry| entry.plants.iter_mut())
            .find(|plant| plant.id == plant_id)
    }

    /// A plant together with its owner
    pub fn plant_with_owner_mut(&mut self, plant_id: Uuid) -> Option<(&PlantUser, &mut Plant)> {
        self.users.iter_mut().find_map(|entry| {
            let RosterEntry { user, plants, .. } = entry;
            let user: &PlantUser = user;
            plants
                .iter_mut()
                .find(|plant| plant.id == plant_id)
                .map(move |plant| (user, plant))
        })
    }

    pub fn find_answer(&self, answer_id: Uuid) -> Option<&AiPlantAnswer> {
        self.ai_answers.iter().find(|answer| answer.id == answer_id)
    }

    /// Identification requests made for the user's plants
    pub fn ai_usage(&self, user_id: Uuid) -> usize {
        self.ai_answers
            .iter()
            .filter(|answer| {
                self.find_plant(answer.plant_id)
                    .is_some_and(|plant| plant.user_id == user_id)
            })
            .count()
    }
}

impl Outbox {
    /// Read an outbox file; a missing file is an empty outbox
    pub async fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        match tokio::fs::read_to_string(path.as_ref()).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> AppResult<()> {
        write_json(path.as_ref(), self).await
    }

    pub fn append(&mut self, notifications: impl IntoIterator<Item = Notification>) {
        self.notifications.extend(notifications);
    }

    pub fn unsent(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter().filter(|n| !n.sent)
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> AppResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let body = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, body).await?;
    Ok(())
}
