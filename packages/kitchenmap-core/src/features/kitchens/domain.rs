//! Kitchen field rules

use kitchenmap_storage::{KitchenPatch, NewKitchen};

use crate::shared::models::{KitchenmapError, Result};

pub const MAX_ADDRESS_LEN: usize = 200;
pub const MAX_PHONE_LEN: usize = 50;
pub const MAX_ACCESSIBILITY_LEN: usize = 200;

fn check_len(field: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(KitchenmapError::invalid_input(format!(
            "{} must be at most {} characters",
            field, max
        ))),
        _ => Ok(()),
    }
}

fn check_coordinate(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(KitchenmapError::invalid_input(format!(
            "Coordinate ({}, {}) is out of range",
            latitude, longitude
        )));
    }
    Ok(())
}

/// Trim text fields and drop blank optional ones
pub fn normalize_new(mut kitchen: NewKitchen) -> NewKitchen {
    kitchen.name = kitchen.name.trim().to_string();
    kitchen.address = kitchen.address.trim().to_string();
    kitchen.contact_phone = non_blank(kitchen.contact_phone);
    kitchen.operating_hours = non_blank(kitchen.operating_hours);
    kitchen.operational_status = non_blank(kitchen.operational_status);
    kitchen.accessibility_features = non_blank(kitchen.accessibility_features);
    kitchen
}

pub fn validate_new(kitchen: &NewKitchen) -> Result<()> {
    if kitchen.name.trim().is_empty() {
        return Err(KitchenmapError::invalid_input("Kitchen name must not be blank"));
    }
    if kitchen.address.trim().is_empty() {
        return Err(KitchenmapError::invalid_input("Kitchen address must not be blank"));
    }
    check_len("address", Some(kitchen.address.as_str()), MAX_ADDRESS_LEN)?;
    check_len("contact_phone", kitchen.contact_phone.as_deref(), MAX_PHONE_LEN)?;
    check_len(
        "accessibility_features",
        kitchen.accessibility_features.as_deref(),
        MAX_ACCESSIBILITY_LEN,
    )?;
    if let Some(point) = kitchen.location {
        check_coordinate(point.latitude, point.longitude)?;
    }
    Ok(())
}

/// Blank strings in an update count as "leave unchanged"
pub fn normalize_patch(mut patch: KitchenPatch) -> KitchenPatch {
    patch.name = non_blank(patch.name);
    patch.address = non_blank(patch.address);
    patch.contact_phone = non_blank(patch.contact_phone);
    patch.operating_hours = non_blank(patch.operating_hours);
    patch.operational_status = non_blank(patch.operational_status);
    patch.accessibility_features = non_blank(patch.accessibility_features);
    patch
}

pub fn validate_patch(patch: &KitchenPatch) -> Result<()> {
    check_len("address", patch.address.as_deref(), MAX_ADDRESS_LEN)?;
    check_len("contact_phone", patch.contact_phone.as_deref(), MAX_PHONE_LEN)?;
    check_len(
        "accessibility_features",
        patch.accessibility_features.as_deref(),
        MAX_ACCESSIBILITY_LEN,
    )?;
    if let Some(point) = patch.location {
        check_coordinate(point.latitude, point.longitude)?;
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Convert a caller-supplied count, rejecting negatives
pub fn checked_count(count: i64) -> Result<usize> {
    usize::try_from(count).map_err(|_| {
        KitchenmapError::invalid_input(format!("Count must be non-negative, got {}", count))
    })
}
