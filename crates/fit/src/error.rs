use std::fmt;

/// Structural failures of the table parser.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FitError {
    /// The table has no `<tr>` or no `<td>` at all. The markup has already been annotated.
    InvalidTable { reason: String },
    RowOutOfRange { index: usize, len: usize },
    MissingCell { row: usize, column: usize },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::InvalidTable { reason } => write!(f, "table is not valid: {reason}"),
            FitError::RowOutOfRange { index, len } => {
                write!(f, "row index {index} out of range for table with {len} rows")
            }
            FitError::MissingCell { row, column } => {
                write!(f, "row {row} has no cell at column {column}")
            }
        }
    }
}

impl std::error::Error for FitError {}

pub type FitResult<T> = Result<T, FitError>;

/// Failures raised by fixture code. They end up as cell, row, or table annotations.
#[derive(Debug)]
pub enum FixtureError {
    Failed {
        message: String,
    },
    Conversion {
        value: String,
        target: String,
        reason: String,
    },
    UnknownFixture {
        name: String,
    },
    Argument {
        name: String,
        reason: String,
    },
    Table(FitError),
}

impl FixtureError {
    pub fn failed(message: impl Into<String>) -> Self {
        FixtureError::Failed {
            message: message.into(),
        }
    }
}

impl fmt::Display for FixtureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureError::Failed { message } => f.write_str(message),
            FixtureError::Conversion {
                value,
                target,
                reason,
            } => write!(f, "cannot convert {value:?} to {target}: {reason}"),
            FixtureError::UnknownFixture { name } => write!(f, "unknown fixture: {name}"),
            FixtureError::Argument { name, reason } => {
                write!(f, "cannot apply argument {name}: {reason}")
            }
            FixtureError::Table(_) => f.write_str("table operation failed"),
        }
    }
}

impl std::error::Error for FixtureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FixtureError::Table(err) => Some(err),
            _ => None,
        }
    }
}

impl From<FitError> for FixtureError {
    fn from(err: FitError) -> Self {
        FixtureError::Table(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn fit_error_display() {
        let err = FitError::RowOutOfRange { index: 4, len: 2 };
        assert_eq!(
            err.to_string(),
            "row index 4 out of range for table with 2 rows"
        );
        let err = FitError::InvalidTable {
            reason: "no rows".into(),
        };
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn fixture_error_wraps_table_error_as_source() {
        let err: FixtureError = FitError::RowOutOfRange { index: 1, len: 0 }.into();
        let source = err.source().map(|s| s.to_string());
        assert_eq!(
            source.as_deref(),
            Some("row index 1 out of range for table with 0 rows")
        );
    }

    #[test]
    fn conversion_error_names_value_and_target() {
        let err = FixtureError::Conversion {
            value: "abc".into(),
            target: "integer".into(),
            reason: "invalid digit".into(),
        };
        assert_eq!(
            err.to_string(),
            "cannot convert \"abc\" to integer: invalid digit"
        );
    }
}
