//! Domain models for the plant care tracker

mod care_sheet;
mod notification;
mod plant;
mod season;
mod user;

pub use care_sheet::*;
pub use notification::*;
pub use plant::*;
pub use season::*;
pub use user::*;
