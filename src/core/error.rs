//! Error types for options analytics

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient data: need at least {required} observations, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Numerical error: {0}")]
    Numerical(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    IO(#[from] std::io::Error),
}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

impl AnalyticsError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn insufficient_data(required: usize, available: usize) -> Self {
        Self::InsufficientData {
            required,
            available,
        }
    }

    pub fn numerical(msg: impl Into<String>) -> Self {
        Self::Numerical(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Reject NaN, infinities, zero and negatives.
pub(crate) fn ensure_positive(value: f64, name: &str) -> AnalyticsResult<f64> {
    if !value.is_finite() || value <= 0.0 {
        return Err(AnalyticsError::invalid_input(format!(
            "{name} must be positive and finite, got {value}"
        )));
    }
    Ok(value)
}

/// Reject NaN, infinities and negatives. Zero is allowed.
pub(crate) fn ensure_non_negative(value: f64, name: &str) -> AnalyticsResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(AnalyticsError::invalid_input(format!(
            "{name} must be non-negative and finite, got {value}"
        )));
    }
    Ok(value)
}

pub(crate) fn ensure_finite(value: f64, name: &str) -> AnalyticsResult<f64> {
    if !value.is_finite() {
        return Err(AnalyticsError::invalid_input(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(value)
}
