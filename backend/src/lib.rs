//! Plant care tracker backend
//!
//! Storage, care checks, notifications and plant identification answers
//! on top of the shared season calendar.

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};
