//! Errors surfaced to callers of the simulation.
//!
//! Configuration problems are reported as an [`EpiError`] before any tick runs. Violations of
//! the agent and grid contracts (moving a dead agent, placing an agent twice) are caller bugs
//! and panic instead.
use std::fmt::{self, Debug, Display};
use std::io;

/// Provides `EpiError` and maps other errors to it.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum EpiError {
    IoError(io::Error),
    JsonError(serde_json::Error),
    CSVError(csv::Error),
    /// A required configuration key was absent.
    MissingParameter(String),
    /// A configuration value was present but outside its valid domain.
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
    ReportError(String),
    EpiError(String),
}

impl EpiError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        EpiError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<io::Error> for EpiError {
    fn from(error: io::Error) -> Self {
        EpiError::IoError(error)
    }
}

impl From<serde_json::Error> for EpiError {
    fn from(error: serde_json::Error) -> Self {
        // serde reports absent struct fields as data errors; surface those as the more
        // specific configuration error.
        let message = error.to_string();
        if let Some(rest) = message.strip_prefix("missing field `") {
            if let Some((name, _)) = rest.split_once('`') {
                return EpiError::MissingParameter(name.to_string());
            }
        }
        EpiError::JsonError(error)
    }
}

impl From<csv::Error> for EpiError {
    fn from(error: csv::Error) -> Self {
        EpiError::CSVError(error)
    }
}

impl std::error::Error for EpiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EpiError::IoError(error) => Some(error),
            EpiError::JsonError(error) => Some(error),
            EpiError::CSVError(error) => Some(error),
            _ => None,
        }
    }
}

impl Display for EpiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EpiError::IoError(error) => write!(f, "I/O error: {error}"),
            EpiError::JsonError(error) => write!(f, "invalid configuration JSON: {error}"),
            EpiError::CSVError(error) => write!(f, "CSV error: {error}"),
            EpiError::MissingParameter(name) => write!(f, "missing parameter `{name}`"),
            EpiError::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter `{name}`: {reason}")
            }
            EpiError::ReportError(message) | EpiError::EpiError(message) => {
                write!(f, "{message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_maps_to_missing_parameter() {
        #[derive(serde::Deserialize, Debug)]
        #[allow(dead_code)]
        struct Sample {
            grid_width: u32,
        }
        let error: EpiError = serde_json::from_str::<Sample>("{}").unwrap_err().into();
        assert!(matches!(error, EpiError::MissingParameter(ref name) if name == "grid_width"));
    }

    #[test]
    fn display_names_the_parameter() {
        let error = EpiError::invalid("infect_rate", "must be within [0, 1], got 1.5");
        assert_eq!(
            error.to_string(),
            "invalid parameter `infect_rate`: must be within [0, 1], got 1.5"
        );
    }
}
