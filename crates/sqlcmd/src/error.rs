//! Error types for sqlcmd

use std::fmt;
use thiserror::Error;

/// Result type alias for sqlcmd operations
pub type SqlResult<T> = Result<T, SqlError>;

/// The four data-access commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Create,
    Select,
    Update,
    Delete,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Create => "create",
            CommandKind::Select => "select",
            CommandKind::Update => "update",
            CommandKind::Delete => "delete",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse classification of a [`SqlError`], for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    EmptyDataset,
    NoRecordsAffected,
    Execution,
    MethodNotApplicable,
}

/// Error types for command compilation and execution
#[derive(Debug, Error)]
pub enum SqlError {
    /// A write command has no fields to act on. Raised before the driver is touched.
    #[error("Empty dataset: no fields to write")]
    EmptyDataset,

    /// Strict mode saw zero affected rows.
    ///
    /// `command` is `None` for the generic check and names the command otherwise.
    #[error("No records affected{}", by_command(.command))]
    NoRecordsAffected { command: Option<CommandKind> },

    /// Any other driver-level failure, carrying the driver's message.
    #[error("Execution error: {0}")]
    Execution(String),

    /// The capability is not supported by this command.
    #[error("Method `{method}` is not applicable to {command}")]
    MethodNotApplicable {
        command: CommandKind,
        method: &'static str,
    },
}

impl SqlError {
    /// Create a command-specific no-records-affected error
    pub fn no_records_affected(command: CommandKind) -> Self {
        Self::NoRecordsAffected {
            command: Some(command),
        }
    }

    /// Create an execution error
    pub fn execution(message: impl Into<String>) -> Self {
        Self::Execution(message.into())
    }

    /// Create a method-not-applicable error
    pub fn method_not_applicable(command: CommandKind, method: &'static str) -> Self {
        Self::MethodNotApplicable { command, method }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyDataset => ErrorKind::EmptyDataset,
            Self::NoRecordsAffected { .. } => ErrorKind::NoRecordsAffected,
            Self::Execution(_) => ErrorKind::Execution,
            Self::MethodNotApplicable { .. } => ErrorKind::MethodNotApplicable,
        }
    }

    /// Check if this is an empty dataset error
    pub fn is_empty_dataset(&self) -> bool {
        matches!(self, Self::EmptyDataset)
    }

    /// Check if this is a no-records-affected error, of any command
    pub fn is_no_records_affected(&self) -> bool {
        matches!(self, Self::NoRecordsAffected { .. })
    }

    /// Check if this is an execution error
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(_))
    }

    /// The command a no-records-affected error was raised for, if any.
    pub fn affected_command(&self) -> Option<CommandKind> {
        match self {
            Self::NoRecordsAffected { command } => *command,
            _ => None,
        }
    }
}

impl From<DriverError> for SqlError {
    fn from(err: DriverError) -> Self {
        Self::Execution(err.message)
    }
}

fn by_command(command: &Option<CommandKind>) -> String {
    match command {
        Some(command) => format!(" by {command}"),
        None => String::new(),
    }
}

/// Error reported by a [`Driver`](crate::driver::Driver) implementation.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct DriverError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl DriverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Attach the underlying error.
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for DriverError {
    fn from(err: tokio_postgres::Error) -> Self {
        let message = match err.as_db_error() {
            Some(db_err) => db_err.message().to_string(),
            None => err.to_string(),
        };
        Self::new(message).with_source(err)
    }
}
