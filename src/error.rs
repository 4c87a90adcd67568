//! Shot errors
//!
//! Every failure here is per-attempt and recoverable: the host reports it
//! and lets the player retry.

use crate::sim::body::BodyKind;
use crate::sim::shot::PhaseKind;

/// Error type for shot and settings operations.
#[derive(Debug)]
pub enum ShotError {
    /// Drag released where it started; there is no direction to aim along
    ZeroLengthDrag,
    /// Entered speed text is not a usable number
    InvalidSpeed(String),
    /// Aiming was attempted before the striker was placed
    StrikerNotPlaced,
    /// An entry point was called in the wrong attempt phase
    WrongPhase { expected: PhaseKind, found: PhaseKind },
    /// The table has no body of a kind the shot needs
    MissingBody(BodyKind),
    /// A settings value is out of range
    Settings(String),
    /// A table layout is geometrically unusable
    Layout(String),
    IoError(std::io::Error),
    ParseError(serde_json::Error),
}

impl std::fmt::Display for ShotError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShotError::ZeroLengthDrag => write!(f, "Drag has zero length"),
            ShotError::InvalidSpeed(text) => write!(f, "Invalid velocity input: {:?}", text),
            ShotError::StrikerNotPlaced => write!(f, "Striker has not been placed"),
            ShotError::WrongPhase { expected, found } => {
                write!(f, "Expected phase {:?}, found {:?}", expected, found)
            }
            ShotError::MissingBody(kind) => write!(f, "Table has no {:?}", kind),
            ShotError::Settings(msg) => write!(f, "Invalid settings: {}", msg),
            ShotError::Layout(msg) => write!(f, "Invalid table layout: {}", msg),
            ShotError::IoError(e) => write!(f, "IO error: {}", e),
            ShotError::ParseError(e) => write!(f, "JSON parse error: {}", e),
        }
    }
}

impl std::error::Error for ShotError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ShotError::IoError(e) => Some(e),
            ShotError::ParseError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ShotError {
    fn from(err: std::io::Error) -> Self {
        ShotError::IoError(err)
    }
}

impl From<serde_json::Error> for ShotError {
    fn from(err: serde_json::Error) -> Self {
        ShotError::ParseError(err)
    }
}
