use thiserror::Error;
use crate::audiogram::frequency::{EarChannel, SourceFormat, StandardFrequency};
/// Origin used for errors raised on in-memory input.
pub const MEMORY_ORIGIN: &str = "<memory>";
#[derive(Debug, Error)]
pub enum AudiogramError {
    #[error("failed to load calibration table {origin}: {reason}")]
    CalibrationLoad { origin: String, reason: String },
    #[error("failed to parse {origin}: expected {expected}, found {found}")]
    Parse {
        origin: String,
        expected: String,
        found: String,
    },
    #[error("duplicate point for {channel} ear at {frequency}")]
    DuplicatePoint {
        channel: EarChannel,
        frequency: StandardFrequency,
    },
    #[error("{frequency} is not a valid {format} frequency")]
    UnsupportedFrequency {
        format: SourceFormat,
        frequency: StandardFrequency,
    },
    #[error("operation cancelled")]
    Cancelled,
    #[error("failed to read {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to render plot: {0}")]
    Plot(String),
}
impl AudiogramError {
    pub(crate) fn parse(expected: impl Into<String>, found: impl Into<String>) -> Self {
        AudiogramError::Parse {
            origin: MEMORY_ORIGIN.to_owned(),
            expected: expected.into(),
            found: found.into(),
        }
    }
    /// Stable kind name shown to users next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            AudiogramError::CalibrationLoad { .. } => "CalibrationLoadError",
            AudiogramError::Parse { .. } => "ParseError",
            AudiogramError::DuplicatePoint { .. } => "DuplicatePointError",
            AudiogramError::UnsupportedFrequency { .. } => "UnsupportedFrequencyError",
            AudiogramError::Cancelled => "CancelledError",
            AudiogramError::Io { .. } => "IoError",
            AudiogramError::Plot(_) => "PlotError",
        }
    }
    /// Attach a file name to errors that were raised without one.
    pub fn in_origin(self, name: &str) -> Self {
        match self {
            AudiogramError::Parse {
                origin,
                expected,
                found,
            } if origin == MEMORY_ORIGIN => AudiogramError::Parse {
                origin: name.to_owned(),
                expected,
                found,
            },
            AudiogramError::CalibrationLoad { origin, reason } if origin == MEMORY_ORIGIN => {
                AudiogramError::CalibrationLoad {
                    origin: name.to_owned(),
                    reason,
                }
            }
            other => other,
        }
    }
}
impl<E: std::error::Error + Send + Sync + 'static> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for AudiogramError
{
    fn from(value: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        AudiogramError::Plot(format!("{value:?}"))
    }
}
impl From<image::ImageError> for AudiogramError {
    fn from(value: image::ImageError) -> Self {
        AudiogramError::Plot(value.to_string())
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn origin_is_attached_only_once() {
        let err = AudiogramError::parse("object", "array").in_origin("HT_01.TXT");
        assert_eq!(err.kind(), "ParseError");
        let err = err.in_origin("other.txt");
        assert!(err.to_string().contains("HT_01.TXT"));
        assert!(!err.to_string().contains("other.txt"));
    }
    #[test]
    fn kinds_are_distinct() {
        let dup = AudiogramError::DuplicatePoint {
            channel: EarChannel::Left,
            frequency: StandardFrequency::F500,
        };
        assert_eq!(dup.kind(), "DuplicatePointError");
        assert_eq!(AudiogramError::Cancelled.kind(), "CancelledError");
        assert_ne!(AudiogramError::Cancelled.kind(), AudiogramError::parse("a", "b").kind());
    }
}
