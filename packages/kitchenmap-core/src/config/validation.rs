//! Configuration validation
//!
//! Each config section checks its own ranges through [`Validatable`];
//! `AppConfig` validates every section in turn.

use super::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration objects
///
/// # Example
/// ```rust,ignore
/// use kitchenmap_core::config::Validatable;
///
/// fn start<C: Validatable>(config: C) -> Result<(), ConfigError> {
///     config.validate()?;
///     // ... build services
/// }
/// ```
pub trait Validatable {
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

impl<T: Validatable> Validatable for Option<T> {
    fn validate(&self) -> ConfigResult<()> {
        if let Some(config) = self {
            config.validate()?;
        }
        Ok(())
    }
}

/// Check `value` lies in `min..=max`
pub fn check_range<T>(field: &str, value: T, min: T, max: T, hint: &str) -> ConfigResult<()>
where
    T: PartialOrd + ToString,
{
    if value < min || value > max {
        return Err(ConfigError::range_with_hint(field, value, min, max, hint));
    }
    Ok(())
}

/// Check a required string is not blank
pub fn check_not_empty(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::empty(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_range_bounds_inclusive() {
        assert!(check_range("t", 1u64, 1, 120, "").is_ok());
        assert!(check_range("t", 120u64, 1, 120, "").is_ok());
        assert!(matches!(
            check_range("t", 0u64, 1, 120, ""),
            Err(ConfigError::Range { .. })
        ));
    }

    #[test]
    fn test_check_not_empty() {
        assert!(check_not_empty("url", "https://example.test").is_ok());
        assert!(matches!(
            check_not_empty("url", "   "),
            Err(ConfigError::Empty { .. })
        ));
    }
}
