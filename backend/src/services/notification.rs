//! Notification manager for care reminders
//!
//! Turns a care digest into one notification per channel the user has
//! enabled. In-app notifications are delivered immediately; email and SMS
//! notifications are left unsent for a delivery worker.

use chrono::{DateTime, Utc};
use shared::{Notification, NotificationCenter, NotificationType};

use crate::services::care_check::CareDigest;

/// Builds and records the notifications for one user
pub struct NotificationManager<'a, 'p> {
    center: &'a mut NotificationCenter,
    digest: &'a CareDigest<'p>,
}

impl<'a, 'p> NotificationManager<'a, 'p> {
    pub fn new(center: &'a mut NotificationCenter, digest: &'a CareDigest<'p>) -> Self {
        Self { center, digest }
    }

    /// Create a notification for every enabled channel; nothing for an empty digest
    pub fn send_notifications(&mut self, now: DateTime<Utc>) -> Vec<Notification> {
        if self.digest.is_empty() {
            return Vec::new();
        }
        self.center
            .enabled_channels()
            .into_iter()
            .map(|channel| match channel {
                NotificationType::InApp => self.send_in_app_notification(now),
                NotificationType::Email => self.send_email_notification(now),
                NotificationType::Sms => self.send_sms_notification(now),
            })
            .collect()
    }

    pub fn send_in_app_notification(&mut self, now: DateTime<Utc>) -> Notification {
        let mut notification = self.create(NotificationType::InApp, self.build_in_app_message(), now);
        notification.mark_as_sent(now);
        self.center.last_notification_sent = Some(now);
        tracing::info!(
            user_id = %self.center.user_id,
            notification_id = %notification.id,
            "In-app notification sent"
        );
        notification
    }

    pub fn send_email_notification(&mut self, now: DateTime<Utc>) -> Notification {
        self.create(NotificationType::Email, self.build_email_message(), now)
    }

    pub fn send_sms_notification(&mut self, now: DateTime<Utc>) -> Notification {
        self.create(NotificationType::Sms, self.build_sms_message(), now)
    }

    fn create(&self, kind: NotificationType, message: String, now: DateTime<Utc>) -> Notification {
        let notification = Notification::new(self.center.user_id, kind, message, now);
        tracing::debug!(
            user_id = %self.center.user_id,
            notification_type = ?kind,
            "Notification created"
        );
        notification
    }

    pub fn build_in_app_message(&self) -> String {
        let d = self.digest;
        let mut message =
            String::from("Hey! It seems some of your plants need your attention! See below:");
        for (verb, names) in [
            ("water", d.water_plant_names()),
            ("fertilize", d.fertilize_plant_names()),
            ("repot", d.repot_plant_names()),
        ] {
            if !names.is_empty() {
                message.push_str(&format!("\nYou need to {}: {}.", verb, names.join(", ")));
            }
        }
        message
    }

    pub fn build_email_message(&self) -> String {
        let d = self.digest;
        let mut message = String::from(
            "Hey! \n A friendly email to let you know that some of your plants need your attention! See below:",
        );
        for (verb, names) in [
            ("water", d.water_plant_names()),
            ("fertilize", d.fertilize_plant_names()),
            ("repot", d.repot_plant_names()),
        ] {
            if !names.is_empty() {
                message.push_str(&format!(
                    "\nYou need to {} {} plant(s)!\n{}.",
                    verb,
                    names.len(),
                    names.join(", ")
                ));
            }
        }
        message
    }

    pub fn build_sms_message(&self) -> String {
        let d = self.digest;
        let mut message = String::from("Hey! It seems some of your plants need your attention!");
        for (count, participle) in [
            (d.count_plants_to_water(), "watered"),
            (d.count_plants_to_fertilize(), "fertilized"),
            (d.count_plants_to_repot(), "repotted"),
        ] {
            if count > 0 {
                message.push_str(&format!("\n{} plant(s) need to be {}.", count, participle));
            }
        }
        message
    }
}
