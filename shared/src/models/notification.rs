//! Notification models and per-user delivery preferences

use chrono::{DateTime, Duration, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Delivery channel of a notification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    Email,
    Sms,
    InApp,
}

/// A notification addressed to a user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub message: String,
    pub notification_type: NotificationType,
    pub sent: bool,
    pub sent_at: Option<DateTime<Utc>>,
    pub viewed: bool,
    pub viewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Which channels a user receives care reminders on, and when
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
pub struct NotificationCenter {
    pub user_id: Uuid,
    pub enable_in_app_notifications: bool,
    pub enable_email_notifications: bool,
    pub enable_sms_notifications: bool,
    /// Hour of day (UTC) for the daily care check
    #[validate(range(max = 23))]
    pub preferred_notification_hour: u32,
    pub last_notification_sent: Option<DateTime<Utc>>,
}

impl Notification {
    pub fn new(
        user_id: Uuid,
        notification_type: NotificationType,
        message: String,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            message,
            notification_type,
            sent: false,
            sent_at: None,
            viewed: false,
            viewed_at: None,
            created_at: now,
        }
    }

    pub fn mark_as_sent(&mut self, now: DateTime<Utc>) {
        self.sent = true;
        self.sent_at = Some(now);
    }

    pub fn mark_as_viewed(&mut self, now: DateTime<Utc>) {
        self.viewed = true;
        self.viewed_at = Some(now);
    }
}

impl NotificationCenter {
    /// Default preferences: in-app only, checked at 09:00
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            enable_in_app_notifications: true,
            enable_email_notifications: false,
            enable_sms_notifications: false,
            preferred_notification_hour: 9,
            last_notification_sent: None,
        }
    }

    /// Enabled channels, in-app first
    pub fn enabled_channels(&self) -> Vec<NotificationType> {
        let mut channels = Vec::with_capacity(3);
        if self.enable_in_app_notifications {
            channels.push(NotificationType::InApp);
        }
        if self.enable_email_notifications {
            channels.push(NotificationType::Email);
        }
        if self.enable_sms_notifications {
            channels.push(NotificationType::Sms);
        }
        channels
    }

    /// Next run of the daily check strictly after `now`
    pub fn next_check_at(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let hour = self.preferred_notification_hour.min(23);
        let at = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default();
        let today = now.date_naive().and_time(at).and_utc();
        if today > now {
            today
        } else {
            today + Duration::days(1)
        }
    }
}
