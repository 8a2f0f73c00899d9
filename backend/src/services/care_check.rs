//! Care check service
//!
//! Evaluates every plant of a user against the care schedule and collects
//! the plants that need watering, fertilizing or repotting today.

use chrono::NaiveDate;
use serde::Serialize;
use shared::{care_status, Clock, Plant, PlantUser};
use uuid::Uuid;

use crate::models::Roster;
use crate::services::notification::NotificationManager;

/// Plants that need attention, grouped by action
#[derive(Debug, Clone, Default)]
pub struct CareDigest<'a> {
    pub water: Vec<&'a Plant>,
    pub fertilize: Vec<&'a Plant>,
    pub repot: Vec<&'a Plant>,
}

impl<'a> CareDigest<'a> {
    pub fn add_water(&mut self, plant: &'a Plant) {
        self.water.push(plant);
    }

    pub fn add_fertilize(&mut self, plant: &'a Plant) {
        self.fertilize.push(plant);
    }

    pub fn add_repot(&mut self, plant: &'a Plant) {
        self.repot.push(plant);
    }

    pub fn is_empty(&self) -> bool {
        self.water.is_empty() && self.fertilize.is_empty() && self.repot.is_empty()
    }

    /// Every plant in the digest once, in first-seen order
    pub fn all_plants(&self) -> Vec<&'a Plant> {
        let mut seen = Vec::new();
        for plant in self.water.iter().chain(&self.fertilize).chain(&self.repot) {
            if !seen.iter().any(|p: &&Plant| p.id == plant.id) {
                seen.push(*plant);
            }
        }
        seen
    }

    pub fn all_plant_names(&self) -> Vec<String> {
        names(&self.all_plants())
    }

    pub fn water_plant_names(&self) -> Vec<String> {
        names(&self.water)
    }

    pub fn fertilize_plant_names(&self) -> Vec<String> {
        names(&self.fertilize)
    }

    pub fn repot_plant_names(&self) -> Vec<String> {
        names(&self.repot)
    }

    pub fn count_all_plants(&self) -> usize {
        self.all_plants().len()
    }

    pub fn count_plants_to_water(&self) -> usize {
        self.water.len()
    }

    pub fn count_plants_to_fertilize(&self) -> usize {
        self.fertilize.len()
    }

    pub fn count_plants_to_repot(&self) -> usize {
        self.repot.len()
    }
}

fn names(plants: &[&Plant]) -> Vec<String> {
    plants.iter().map(|p| p.display_name()).collect()
}

/// A plant left out of the check because its schedule is incomplete
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPlant {
    pub plant_id: Uuid,
    pub name: String,
    pub reason: String,
}

/// Result of checking one user's plants
#[derive(Debug, Clone)]
pub struct CareCheckOutcome<'a> {
    pub user_id: Uuid,
    pub digest: CareDigest<'a>,
    pub skipped: Vec<SkippedPlant>,
}

/// Totals of a full roster check
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub checked_users: usize,
    pub plants_needing_care: usize,
    pub notifications: Vec<shared::Notification>,
    pub skipped: Vec<SkippedPlant>,
}

/// Care check service
#[derive(Clone)]
pub struct CareCheckService<C: Clock> {
    clock: C,
}

impl<C: Clock> CareCheckService<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Evaluate every plant of a user
    pub fn check_user<'a>(&self, user: &PlantUser, plants: &'a [Plant]) -> CareCheckOutcome<'a> {
        let today = self.today();
        let mut digest = CareDigest::default();
        let mut skipped = Vec::new();

        for plant in plants.iter().filter(|p| p.user_id == user.id) {
            match care_status(plant, today) {
                Ok(status) => {
                    if status.should_water {
                        digest.add_water(plant);
                    }
                    if status.should_fertilize {
                        digest.add_fertilize(plant);
                    }
                    if status.should_repot {
                        digest.add_repot(plant);
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        user_id = %user.id,
                        plant_id = %plant.id,
                        error = %e,
                        "Skipping plant with incomplete schedule"
                    );
                    skipped.push(SkippedPlant {
                        plant_id: plant.id,
                        name: plant.display_name(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::debug!(
            user_id = %user.id,
            %today,
            plants = digest.count_all_plants(),
            skipped = skipped.len(),
            "Care check finished"
        );

        CareCheckOutcome {
            user_id: user.id,
            digest,
            skipped,
        }
    }

    /// Check every active user and produce their notifications, stamped
    /// with the service clock's time
    pub fn run(&self, roster: &mut Roster) -> CheckReport {
        let now = self.clock.now();
        let mut report = CheckReport::default();

        for entry in roster.users.iter_mut() {
            if !entry.user.is_active {
                tracing::debug!(user_id = %entry.user.id, "Skipping inactive user");
                continue;
            }
            let outcome = self.check_user(&entry.user, &entry.plants);
            let notifications =
                NotificationManager::new(&mut entry.notification_center, &outcome.digest)
                    .send_notifications(now);

            report.checked_users += 1;
            report.plants_needing_care += outcome.digest.count_all_plants();
            report.notifications.extend(notifications);
            report.skipped.extend(outcome.skipped);
        }

        tracing::info!(
            users = report.checked_users,
            notifications = report.notifications.len(),
            skipped = report.skipped.len(),
            "Roster care check complete"
        );
        report
    }
}
