//! Shared types and models for the plant care tracker
//!
//! This crate contains the season calendar, the care due-date policy and the
//! domain models shared between the backend, the browser (via WASM) and
//! other components of the system.

pub mod models;
pub mod schedule;
pub mod types;
pub mod validation;

pub use models::*;
pub use schedule::*;
pub use types::*;
pub use validation::*;
