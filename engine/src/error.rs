//! Error types for the engine

use thiserror::Error;

/// The main error type for engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid field type: {field} must be {expected}, got {got}")]
    InvalidFieldType {
        field: String,
        expected: String,
        got: String,
    },

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("Field not set: {0}")]
    FieldNotSet(String),

    #[error("Invalid move keys: {0}")]
    InvalidMoveKeys(String),

    #[error("Number out of range: {value} is not within <{min}, {max}>")]
    NumberOutOfRange { value: f64, min: f64, max: f64 },

    #[error("Degenerate range: <{min}, {max}> has no width")]
    DegenerateRange { min: f64, max: f64 },

    #[error("Window error: {0}")]
    WindowError(String),

    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Logger error: {0}")]
    LoggerError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error(transparent)]
    GameError(#[from] anyhow::Error),
}

impl EngineError {
    /// Wrong kind of value handed to a field or a move key mapping.
    pub fn is_type_error(&self) -> bool {
        matches!(self, EngineError::InvalidFieldType { .. })
    }

    /// Right kind of value, but its content is not acceptable.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            EngineError::ValueOutOfRange { .. }
                | EngineError::InvalidMoveKeys(_)
                | EngineError::NumberOutOfRange { .. }
                | EngineError::DegenerateRange { .. }
        )
    }
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::TomlParseError(err.to_string())
    }
}

impl From<winit::error::EventLoopError> for EngineError {
    fn from(err: winit::error::EventLoopError) -> Self {
        EngineError::WindowError(err.to_string())
    }
}

impl From<winit::error::OsError> for EngineError {
    fn from(err: winit::error::OsError) -> Self {
        EngineError::WindowError(err.to_string())
    }
}

impl From<log::SetLoggerError> for EngineError {
    fn from(err: log::SetLoggerError) -> Self {
        EngineError::LoggerError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_and_value_errors_are_distinct() {
        let type_err = EngineError::InvalidFieldType {
            field: "x".into(),
            expected: "int or float".into(),
            got: "text".into(),
        };
        assert!(type_err.is_type_error());
        assert!(!type_err.is_value_error());

        let value_err = EngineError::ValueOutOfRange {
            field: "x".into(),
            min: 0.0,
            max: 800.0,
            value: 900.0,
        };
        assert!(value_err.is_value_error());
        assert!(!value_err.is_type_error());
    }

    #[test]
    fn out_of_range_message_names_the_field() {
        let err = EngineError::ValueOutOfRange {
            field: "y".into(),
            min: 0.0,
            max: 600.0,
            value: -1.0,
        };
        assert_eq!(
            err.to_string(),
            "Value out of range: y must be between 0 and 600, got -1"
        );
    }
}
