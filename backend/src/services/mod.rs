//! Business logic services for the plant care tracker

pub mod ai_answer;
pub mod care_check;
pub mod notification;

pub use ai_answer::AiAnswerService;
pub use care_check::{CareCheckOutcome, CareCheckService, CareDigest, CheckReport, SkippedPlant};
pub use notification::NotificationManager;
