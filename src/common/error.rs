use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Coarse classification of a [`BulkerError`], stable across wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    GroupNotFound,
    RepoNotSupported,
    Validation,
    Config,
    FileSystem,
    Command,
    Serialization,
    Panicked,
    RepositoriesFailed,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::NotFound => "not found",
            ErrorKind::AlreadyExists => "already exists",
            ErrorKind::GroupNotFound => "group not found",
            ErrorKind::RepoNotSupported => "repository not supported",
            ErrorKind::Validation => "validation",
            ErrorKind::Config => "config",
            ErrorKind::FileSystem => "filesystem",
            ErrorKind::Command => "command",
            ErrorKind::Serialization => "serialization",
            ErrorKind::Panicked => "panicked",
            ErrorKind::RepositoriesFailed => "repositories failed",
            ErrorKind::Internal => "internal",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum BulkerError {
    #[error("{entity} '{name}' not found")]
    NotFound { entity: &'static str, name: String },

    #[error("{entity} '{name}' already exists")]
    AlreadyExists { entity: &'static str, name: String },

    #[error("group '{0}' not found")]
    GroupNotFound(String),

    #[error("repository '{0}' is not registered")]
    RepoNotSupported(String),

    #[error("invalid {field}: {message}")]
    ValidationError {
        field: String,
        message: String,
        value: Option<String>,
    },

    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("File system operation failed: {message}")]
    FileSystemError {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("{message}")]
    CommandError {
        message: String,
        command: String,
        exit_code: Option<i32>,
    },

    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("operation panicked: {message}")]
    Panicked { message: String },

    #[error("{count} repositories failed")]
    RepositoriesFailed { count: usize },

    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<BulkerError>,
    },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl BulkerError {
    pub fn not_found(entity: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            name: name.into(),
        }
    }

    pub fn already_exists(entity: &'static str, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            name: name.into(),
        }
    }

    pub fn validation_error(
        field: impl Into<String>,
        message: impl Into<String>,
        value: Option<String>,
    ) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
            value,
        }
    }

    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: None,
        }
    }

    pub fn config_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::ConfigError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn filesystem_error(message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: None,
        }
    }

    pub fn filesystem_error_with_source(
        message: impl Into<String>,
        path: Option<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystemError {
            message: message.into(),
            path,
            source: Some(source),
        }
    }

    pub fn command_error(
        message: impl Into<String>,
        command: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::CommandError {
            message: message.into(),
            command: command.into(),
            exit_code,
        }
    }

    pub fn serialization_error_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn panicked(message: impl Into<String>) -> Self {
        Self::Panicked {
            message: message.into(),
        }
    }

    pub fn repositories_failed(count: usize) -> Self {
        Self::RepositoriesFailed { count }
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError {
            message: message.into(),
        }
    }

    /// Wraps the error with a message while keeping its [`ErrorKind`].
    pub fn context(self, message: impl Into<String>) -> Self {
        Self::Context {
            message: message.into(),
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyExists { .. } => ErrorKind::AlreadyExists,
            Self::GroupNotFound(_) => ErrorKind::GroupNotFound,
            Self::RepoNotSupported(_) => ErrorKind::RepoNotSupported,
            Self::ValidationError { .. } => ErrorKind::Validation,
            Self::ConfigError { .. } => ErrorKind::Config,
            Self::FileSystemError { .. } => ErrorKind::FileSystem,
            Self::CommandError { .. } => ErrorKind::Command,
            Self::SerializationError { .. } => ErrorKind::Serialization,
            Self::Panicked { .. } => ErrorKind::Panicked,
            Self::RepositoriesFailed { .. } => ErrorKind::RepositoriesFailed,
            Self::Context { source, .. } => source.kind(),
            Self::InternalError { .. } => ErrorKind::Internal,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

impl From<std::io::Error> for BulkerError {
    fn from(error: std::io::Error) -> Self {
        Self::filesystem_error_with_source("File system operation failed", None, error)
    }
}

impl From<serde_yaml::Error> for BulkerError {
    fn from(error: serde_yaml::Error) -> Self {
        Self::serialization_error_with_source("YAML serialization failed", error)
    }
}

impl From<serde_json::Error> for BulkerError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization_error_with_source("JSON serialization failed", error)
    }
}

impl From<regex::Error> for BulkerError {
    fn from(error: regex::Error) -> Self {
        Self::validation_error("pattern", error.to_string(), None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = BulkerError::not_found("repository", "x");
        assert_eq!(error.to_string(), "repository 'x' not found");
        assert!(error.is(ErrorKind::NotFound));
    }

    #[test]
    fn test_kind_survives_context() {
        let error = BulkerError::already_exists("group", "core")
            .context("creating group")
            .context("groups create");
        assert!(error.is(ErrorKind::AlreadyExists));
        assert!(!error.is(ErrorKind::NotFound));
        assert_eq!(
            error.to_string(),
            "groups create: creating group: group 'core' already exists"
        );
    }

    #[test]
    fn test_repositories_failed_message() {
        let error = BulkerError::repositories_failed(2);
        assert_eq!(error.to_string(), "2 repositories failed");
        assert_eq!(error.kind(), ErrorKind::RepositoriesFailed);
    }

    #[test]
    fn test_error_conversion_from_io_error() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: BulkerError = io_error.into();
        assert!(error.is(ErrorKind::FileSystem));
    }

    #[test]
    fn test_validation_error() {
        let error = BulkerError::validation_error("mode", "must be one of: a, b", None);
        assert_eq!(error.to_string(), "invalid mode: must be one of: a, b");
    }
}
