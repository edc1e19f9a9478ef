use thiserror::Error;

use crate::value::Kind;

/// Errors raised while building or draining a query pipeline.
///
/// The enum is `Clone` because the first error sticks to the stage that
/// raised it and is carried through every later stage until a terminal
/// operation surfaces it.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    /// A write named a column the table does not have.
    #[error("column '{0}' not found")]
    ColumnNotFound(String),
    /// An identifier resolved to no column.
    #[error("identifier '{0}' not found")]
    UnknownIdent(String),
    /// An identifier resolved to more than one column.
    #[error("identifier '{0}' is ambiguous")]
    AmbiguousIdent(String),
    /// An ordering comparison across value kinds.
    #[error("cannot compare values of kind '{left}' and '{right}'")]
    TypeMismatch { left: Kind, right: Kind },
    /// `first` on an empty selection.
    #[error("no rows")]
    NoRows,
    /// A host structure could not be serialized into the value domain.
    ///
    /// Carries the message only: `serde_json::Error` is not `Clone`, and
    /// stages must be.
    #[error("serialization failed: {0}")]
    Serialize(String),
    /// Query output could not be deserialized into the caller's target.
    #[error("scan failed: {0}")]
    Scan(String),
}

pub type Result<T> = std::result::Result<T, QueryError>;
