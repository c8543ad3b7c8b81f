use std::fmt;

/// Errors raised while configuring or starting a voice.
///
/// Only parameter validation can fail. Numeric guards inside the render path
/// (e.g. normalizing a silent buffer) are handled locally and never surface
/// here, and a note-on beyond the polyphony ceiling is a drop, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum SynthError {
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, SynthError>;

impl SynthError {
    pub(crate) fn invalid(name: &'static str, value: impl Into<f64>, reason: &'static str) -> Self {
        SynthError::InvalidParameter {
            name,
            value: value.into(),
            reason,
        }
    }
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::InvalidParameter {
                name,
                value,
                reason,
            } => write!(f, "invalid parameter `{name}` = {value}: {reason}"),
        }
    }
}

impl std::error::Error for SynthError {}
