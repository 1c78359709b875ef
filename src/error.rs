use crate::database::column::ColumnType;
use std::collections::TryReserveError;
use thiserror::Error;

/// Result type returned by every fallible operation of the table engine.
pub type Result<T, E = QuickTableError> = std::result::Result<T, E>;

/// Coarse classification of a failure, used by hosts to pick an exception class.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or invalid blueprint entry
    Schema,
    /// Value/column type mismatch or wrong row shape
    Type,
    /// Row index out of range or pop on an empty table
    Index,
    /// Storage could not be obtained or grown
    Allocation,
    /// Failure reported by the host runtime itself
    Host,
}

/// Main error type for the quicktable engine.
#[derive(Error, Debug)]
pub enum QuickTableError {
    #[error("invalid blueprint")]
    InvalidBlueprint,

    #[error("invalid column type")]
    InvalidColumnType { kind: String },

    #[error("append with non-sequence")]
    NonSequenceRow,

    #[error("append with mismatching row length")]
    RowLengthMismatch { expected: usize, actual: usize },

    #[error("non-{0} entry for {0} column")]
    EntryTypeMismatch(ColumnType),

    #[error("table index out of range")]
    IndexOutOfRange,

    #[error("pop from empty table")]
    PopFromEmptyTable,

    #[error("{context}")]
    Allocation {
        context: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("{0}")]
    Host(String),

    #[error("{message}")]
    WithContext { message: String, kind: ErrorKind },
}

impl QuickTableError {
    /// Returns the taxonomy bucket of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBlueprint | Self::InvalidColumnType { .. } => ErrorKind::Schema,
            Self::NonSequenceRow | Self::RowLengthMismatch { .. } | Self::EntryTypeMismatch(_) => {
                ErrorKind::Type
            }
            Self::IndexOutOfRange | Self::PopFromEmptyTable => ErrorKind::Index,
            Self::Allocation { .. } => ErrorKind::Allocation,
            Self::Host(_) => ErrorKind::Host,
            Self::WithContext { kind, .. } => *kind,
        }
    }

    /// Builds a closure mapping a `TryReserveError` into an allocation failure.
    pub(crate) fn allocation(context: &'static str) -> impl FnOnce(TryReserveError) -> Self {
        move |source| Self::Allocation { context, source }
    }
}

pub(crate) trait ResultMessage {
    fn with_prefix(self, message: &str) -> Self;
}

impl<T> ResultMessage for Result<T, QuickTableError> {
    fn with_prefix(self, message: &str) -> Self {
        self.map_err(|e| QuickTableError::WithContext {
            kind: e.kind(),
            message: format!("{}: {}", message, e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_type_mismatch_message() {
        let error = QuickTableError::EntryTypeMismatch(ColumnType::Str);
        assert_eq!(error.to_string(), "non-str entry for str column");
        assert_eq!(error.kind(), ErrorKind::Type);

        let error = QuickTableError::EntryTypeMismatch(ColumnType::Float);
        assert_eq!(error.to_string(), "non-float entry for float column");
    }

    #[test]
    fn with_prefix_keeps_kind() {
        let result: Result<()> = Err(QuickTableError::PopFromEmptyTable);
        let error = result.with_prefix("quicktable").unwrap_err();
        assert_eq!(error.to_string(), "quicktable: pop from empty table");
        assert_eq!(error.kind(), ErrorKind::Index);
    }

    #[test]
    fn allocation_error_reports_context() {
        let source = Vec::<u64>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let error = QuickTableError::allocation("failed to grow column")(source);
        assert_eq!(error.to_string(), "failed to grow column");
        assert_eq!(error.kind(), ErrorKind::Allocation);
    }
}
