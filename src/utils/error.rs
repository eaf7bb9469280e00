use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the three normalized inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Categories,
    Assemblies,
    Parts,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::Categories => "categories",
            SourceKind::Assemblies => "assemblies",
            SourceKind::Parts => "parts",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("Input file not found ({kind}): {}", .path.display())]
    SourceNotFound { kind: SourceKind, path: PathBuf },

    #[error("Could not decode JSON from {kind} file {} at line {line}, column {column}: {message}", .path.display())]
    MalformedSource {
        kind: SourceKind,
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Invalid {kind} file {}: {message}", .path.display())]
    InvalidSourceShape {
        kind: SourceKind,
        path: PathBuf,
        message: String,
    },

    #[error("'categories' key not found or not a mapping in categories file. Found keys: {found_keys:?}")]
    MissingCategoriesContainer { found_keys: Vec<String> },

    #[error("Could not write output file {}: {message}", .path.display())]
    OutputWriteError { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Output,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HierarchyError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HierarchyError::SourceNotFound { .. }
            | HierarchyError::MalformedSource { .. }
            | HierarchyError::InvalidSourceShape { .. }
            | HierarchyError::MissingCategoriesContainer { .. } => ErrorCategory::Input,
            HierarchyError::OutputWriteError { .. } => ErrorCategory::Output,
            HierarchyError::ConfigError { .. }
            | HierarchyError::ConfigValidationError { .. }
            | HierarchyError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            HierarchyError::IoError(_) | HierarchyError::SerializationError(_) => {
                ErrorCategory::Internal
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output | ErrorCategory::Internal => ErrorSeverity::Critical,
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            HierarchyError::SourceNotFound { kind, path } => format!(
                "Check that the {} file exists at {} or pass its location with --{}",
                kind,
                path.display(),
                kind
            ),
            HierarchyError::MalformedSource { path, line, column, .. } => format!(
                "Fix the JSON syntax in {} near line {}, column {}",
                path.display(),
                line,
                column
            ),
            HierarchyError::InvalidSourceShape { kind, .. } => format!(
                "The {} file must contain a JSON object keyed by identifier",
                kind
            ),
            HierarchyError::MissingCategoriesContainer { .. } => {
                "Wrap the category records in a top-level \"categories\" object".to_string()
            }
            HierarchyError::OutputWriteError { path, .. } => format!(
                "Make sure the directory of {} exists and is writable",
                path.display()
            ),
            HierarchyError::ConfigError { .. }
            | HierarchyError::ConfigValidationError { .. }
            | HierarchyError::InvalidConfigValueError { .. } => {
                "Review the command line flags and the TOML configuration file".to_string()
            }
            HierarchyError::IoError(_) => "Check file permissions and available disk space".to_string(),
            HierarchyError::SerializationError(_) => {
                "This is unexpected; re-run with --verbose and report the log".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the input data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Output => format!("Could not write the master hierarchy: {}", self),
            ErrorCategory::Internal => format!("Unexpected failure: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, HierarchyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_source_names_the_source() {
        let err = HierarchyError::SourceNotFound {
            kind: SourceKind::Assemblies,
            path: PathBuf::from("resources/assemblies.json"),
        };

        let message = err.to_string();
        assert!(message.contains("assemblies"));
        assert!(message.contains("resources/assemblies.json"));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_missing_container_lists_found_keys() {
        let err = HierarchyError::MissingCategoriesContainer {
            found_keys: vec!["cats".to_string(), "version".to_string()],
        };

        assert!(err.to_string().contains("\"cats\""));
        assert!(err.to_string().contains("\"version\""));
    }

    #[test]
    fn test_output_errors_are_critical() {
        let err = HierarchyError::OutputWriteError {
            path: PathBuf::from("/readonly/out.json"),
            message: "permission denied".to_string(),
        };

        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.exit_code(), 3);
        assert!(err.user_friendly_message().starts_with("Could not write"));
    }
}
