//! Validation utilities for the plant care tracker

use validator::ValidationErrors;

/// Shortest allowed watering interval, in days
pub const MIN_WATER_FREQUENCY_DAYS: u32 = 1;

/// Longest allowed watering interval, in days
pub const MAX_WATER_FREQUENCY_DAYS: u32 = 365;

/// Maximum plant name length (characters)
pub const MAX_PLANT_NAME_LENGTH: usize = 50;

/// Validate a watering interval and narrow it to `u32`
pub fn validate_water_frequency(days: u64) -> Result<u32, &'static str> {
    match u32::try_from(days) {
        Ok(d) if (MIN_WATER_FREQUENCY_DAYS..=MAX_WATER_FREQUENCY_DAYS).contains(&d) => Ok(d),
        _ => Err("Watering frequency must be between 1 and 365 days"),
    }
}

/// Validate a plant name
pub fn validate_plant_name(name: &str) -> Result<(), &'static str> {
    let name = name.trim();
    if name.is_empty() {
        return Err("Plant name cannot be empty");
    }
    if name.chars().count() > MAX_PLANT_NAME_LENGTH {
        return Err("Plant name must be at most 50 characters");
    }
    Ok(())
}

/// Flatten derive-validation errors into sorted "field: problem" lines
pub fn describe_validation_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                let problem = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                format!("{}: {}", field, problem)
            })
        })
        .collect();
    lines.sort();
    lines
}
