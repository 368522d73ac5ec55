//! Calculator errors
//!
//! Every rejected input surfaces here instead of leaking NaN or infinity into
//! the coordinate mapper.

use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, CalcError>;

#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum CalcError {
    #[error("reference lane length must be a positive finite number, got {0}")]
    InvalidReferenceLength(f64),

    #[error("lane index must be at least 1, got {0}")]
    InvalidLaneIndex(u32),

    #[error("lane width must be a non-negative finite number, got {0}")]
    InvalidLaneWidth(f64),

    #[error("total distance must be a non-negative finite number, got {0}")]
    InvalidDistance(f64),

    #[error("effective perimeter must be positive and finite, got {0}")]
    NonPositivePerimeter(f64),

    #[error("lap count is out of range, got {0} laps")]
    LapCountOutOfRange(f64),

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("oval geometry is degenerate: {0}")]
    InvalidOval(&'static str),

    #[error("pointer coincides with the oval center, angle is undefined")]
    DegeneratePointer,

    #[error("settings i/o failed: {0}")]
    Io(String),

    #[error("settings are not valid JSON: {0}")]
    Parse(String),
}

impl CalcError {
    /// Reject NaN and infinities for a named input
    pub(crate) fn require_finite(name: &'static str, value: f64) -> Result<f64> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(CalcError::NonFinite { name, value })
        }
    }
}

impl From<std::io::Error> for CalcError {
    fn from(err: std::io::Error) -> Self {
        CalcError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(err: serde_json::Error) -> Self {
        CalcError::Parse(err.to_string())
    }
}
