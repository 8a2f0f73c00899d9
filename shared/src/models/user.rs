//! User account models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::types::Language;

/// A user of the plant tracker
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlantUser {
    pub id: Uuid,
    #[validate(email)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub default_language: Language,
    /// Whether AI plant identification is available to this user
    #[serde(default)]
    pub has_ai_enabled: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

impl PlantUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            first_name: None,
            last_name: None,
            phone_number: None,
            default_language: Language::default(),
            has_ai_enabled: false,
            is_staff: false,
            is_active: true,
            date_joined: Utc::now(),
        }
    }

    pub fn full_name(&self) -> String {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect();
        if parts.is_empty() {
            self.email.clone()
        } else {
            parts.join(" ")
        }
    }
}
