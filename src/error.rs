//! @acp:module "Errors"
//! @acp:summary "Crate error type and Result alias"
//! @acp:domain cli
//! @acp:layer types

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading configuration and rule tables.
///
/// Evaluation and ordering never fail once a [`crate::ProfileTable`] exists;
/// every variant here is raised before the engine runs.
#[derive(Error, Debug)]
pub enum CxmError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Unsupported rule table format for {path:?} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },

    /// No column could be mapped to the widget name field
    #[error("Sheet '{sheet}' has no widget name column (columns: {})", columns.join(", "))]
    MissingNameColumn { sheet: String, columns: Vec<String> },

    /// More than one column matches a reserved field
    #[error("Sheet '{sheet}' has ambiguous {field} columns: {}", candidates.join(", "))]
    AmbiguousColumn {
        sheet: String,
        field: String,
        candidates: Vec<String>,
    },

    /// Two headers resolve to the same column after trimming
    #[error("Sheet '{sheet}' has more than one '{column}' column")]
    DuplicateColumn { sheet: String, column: String },

    #[error("Sheet '{sheet}' lists widget '{name}' more than once")]
    DuplicateWidget { sheet: String, name: String },

    #[error("Unknown sheet '{sheet}' (available: {})", available.join(", "))]
    UnknownSheet {
        sheet: String,
        available: Vec<String>,
    },

    #[error("Workbook has {count} sheets; choose one with --sheet")]
    SheetRequired { count: usize },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CxmError>;

impl CxmError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors caused by the shape of a rule table rather than I/O
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::MissingNameColumn { .. }
                | Self::AmbiguousColumn { .. }
                | Self::DuplicateColumn { .. }
                | Self::DuplicateWidget { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_name_column_message_lists_columns() {
        let err = CxmError::MissingNameColumn {
            sheet: "res-elec".to_string(),
            columns: vec!["Section".to_string(), "EV".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("res-elec"));
        assert!(msg.contains("Section, EV"));
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_duplicate_column_is_schema_error() {
        let err = CxmError::DuplicateColumn {
            sheet: "res".to_string(),
            column: "EV".to_string(),
        };
        assert_eq!(err.to_string(), "Sheet 'res' has more than one 'EV' column");
        assert!(err.is_schema_error());
    }

    #[test]
    fn test_io_error_is_not_schema_error() {
        let err: CxmError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(!err.is_schema_error());
    }
}
