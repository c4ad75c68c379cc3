//! Construction-time threshold validation.
//!
//! Runs once, when a [`crate::RawPipelineConfig`] is turned into a
//! [`crate::PipelineConfig`]. An out-of-range threshold is a configuration
//! bug; it must never surface as a per-query failure.

use crate::{ConfigError, RawPipelineConfig};

/// Checks every numeric field against its valid range.
pub fn validate_thresholds(raw: &RawPipelineConfig) -> Result<(), ConfigError> {
    require(raw.fetch_k() > 0, "fetch_k", "must be greater than zero")?;
    require(raw.final_k() > 0, "final_k", "must be greater than zero")?;
    require(raw.min_keep() > 0, "min_keep", "must be greater than zero")?;
    require(
        raw.min_keep() <= raw.fetch_k(),
        "min_keep",
        "must not exceed fetch_k",
    )?;
    require(raw.max_l2() > 0.0, "max_l2", "must be positive")?;
    if let Some(soft) = raw.soft_max_l2 {
        require(soft >= raw.max_l2(), "soft_max_l2", "must be >= max_l2")?;
    }
    require(raw.min_gap() >= 0.0, "min_gap", "must be non-negative")?;
    require(
        raw.min_group_gap() >= 0.0,
        "min_group_gap",
        "must be non-negative",
    )?;
    require(raw.max_options() > 0, "max_options", "must be greater than zero")?;

    require_unit_interval(raw.min_sig_sim(), "min_sig_sim")?;
    require_unit_interval(raw.min_sig_sim_gap(), "min_sig_sim_gap")?;
    require_unit_interval(raw.min_anchor_sim(), "min_anchor_sim")?;
    require_unit_interval(raw.min_anchor_sim_gap(), "min_anchor_sim_gap")?;

    Ok(())
}

fn require(condition: bool, field: &'static str, reason: &str) -> Result<(), ConfigError> {
    if condition {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: reason.to_string(),
        })
    }
}

fn require_unit_interval(value: f64, field: &'static str) -> Result<(), ConfigError> {
    require(
        (0.0..=1.0).contains(&value),
        field,
        "must be between 0.0 and 1.0",
    )
}
