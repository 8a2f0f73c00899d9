//! WebAssembly module for the plant care tracker
//!
//! Provides client-side computation for:
//! - Season and half-year lookup
//! - Next fertilizing / repotting dates
//! - Plant care status from a plant JSON record
//! - Offline form validation
//!
//! Dates cross the boundary as ISO `YYYY-MM-DD` strings.

use chrono::{DateTime, NaiveDate, Utc};
use shared::{Clock, Plant, Season};
use wasm_bindgen::prelude::*;

// Re-export shared types for use in JavaScript
pub use shared::models::*;
pub use shared::types::*;
pub use shared::validation::*;

/// Today according to the browser's local time
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserClock;

impl Clock for BrowserClock {
    fn today(&self) -> NaiveDate {
        let now = js_sys::Date::new_0();
        NaiveDate::from_ymd_opt(now.get_full_year() as i32, now.get_month() + 1, now.get_date())
            .unwrap_or(NaiveDate::MIN)
    }

    fn now(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(js_sys::Date::now() as i64).unwrap_or_default()
    }
}

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str("plant care module loaded"));
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| format!("Invalid date {}: {}", value, e))
}

fn parse_season(value: &str) -> Result<Season, String> {
    value.parse::<Season>().map_err(|e| e.to_string())
}

fn to_js(message: String) -> JsValue {
    web_sys::console::error_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

fn season_name(date: &str) -> Result<String, String> {
    Ok(shared::season_of(parse_date(date)?).to_string())
}

fn half_year_name(date: &str) -> Result<String, String> {
    Ok(shared::half_year_of(parse_date(date)?).to_string())
}

fn date_in_season(date: &str, season: &str) -> Result<bool, String> {
    shared::is_date_in_named_season(parse_date(date)?, season).map_err(|e| e.to_string())
}

fn current_or_next_start(reference: &str, season: &str) -> Result<String, String> {
    shared::start_of_current_or_next(parse_date(reference)?, parse_season(season)?)
        .map(|d| d.to_string())
        .map_err(|e| e.to_string())
}

fn target_season_start(date: &str, season: &str) -> Result<String, String> {
    shared::start_of_target_season(parse_date(date)?, parse_season(season)?)
        .map(|d| d.to_string())
        .map_err(|e| e.to_string())
}

fn care_status_json(plant_json: &str, today: &str) -> Result<String, String> {
    let plant: Plant =
        serde_json::from_str(plant_json).map_err(|e| format!("Invalid plant JSON: {}", e))?;
    let status = shared::care_status(&plant, parse_date(today)?).map_err(|e| e.to_string())?;
    serde_json::to_string(&status).map_err(|e| e.to_string())
}

/// Season a date falls in ("Spring", "Summer", "Autumn" or "Winter")
#[wasm_bindgen]
pub fn season_of(date: &str) -> Result<String, JsValue> {
    season_name(date).map_err(to_js)
}

/// Half-year a date falls in ("Summer" or "Winter")
#[wasm_bindgen]
pub fn half_year_of(date: &str) -> Result<String, JsValue> {
    half_year_name(date).map_err(to_js)
}

/// Whether a date falls in the named season
#[wasm_bindgen]
pub fn is_date_in_season(date: &str, season: &str) -> Result<bool, JsValue> {
    date_in_season(date, season).map_err(to_js)
}

/// First day of the current or next occurrence of a season
#[wasm_bindgen]
pub fn start_of_current_or_next(reference: &str, season: &str) -> Result<String, JsValue> {
    current_or_next_start(reference, season).map_err(to_js)
}

/// First day of the next occurrence of a season strictly after `date`
#[wasm_bindgen]
pub fn start_of_target_season(date: &str, season: &str) -> Result<String, JsValue> {
    target_season_start(date, season).map_err(to_js)
}

/// Season according to the browser's clock
#[wasm_bindgen]
pub fn current_season() -> String {
    shared::current_season(&BrowserClock).to_string()
}

/// Care status of a plant record as JSON
#[wasm_bindgen]
pub fn plant_care_status(plant_json: &str, today: &str) -> Result<String, JsValue> {
    care_status_json(plant_json, today).map_err(to_js)
}

/// Validate a plant name, returning the problem or an empty string
#[wasm_bindgen]
pub fn validate_plant_name_input(name: &str) -> String {
    shared::validate_plant_name(name)
        .err()
        .unwrap_or_default()
        .to_string()
}

/// Validate a watering interval in days
#[wasm_bindgen]
pub fn validate_water_frequency_input(days: f64) -> bool {
    days.fract() == 0.0 && days >= 0.0 && shared::validate_water_frequency(days as u64).is_ok()
}
