use std::fmt::Display;

/// A field value could not be read from a record
///
/// Raised by fallible accessors (see [`crate::TypeSchemaBuilder::try_field`]).
/// Aborts the whole write call it occurs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAccessError {
    /// Name of the type declaring the field
    pub type_name: &'static str,
    /// Name of the field
    pub field: &'static str,
    /// Why the value could not be read
    pub reason: String,
}

impl FieldAccessError {
    /// Create a new access error for `type_name.field`
    pub fn new(type_name: &'static str, field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            type_name,
            field,
            reason: reason.into(),
        }
    }
}

impl Display for FieldAccessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cannot read field '{}' of '{}': {}",
            self.field, self.type_name, self.reason
        )
    }
}

impl std::error::Error for FieldAccessError {}

/// Error type for CSV writing
#[derive(Debug)]
pub enum CsvWriteError {
    /// No encoding label was given
    MissingEncoding,
    /// The encoding label is not known
    UnknownEncoding(String),
    /// A field value could not be read
    FieldAccess(FieldAccessError),
    /// IO error during file output
    Io(std::io::Error),
}

impl CsvWriteError {
    /// Whether the error was caused by invalid configuration (e.g., a missing or unknown encoding)
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::MissingEncoding | Self::UnknownEncoding(_))
    }

    /// Whether the error was caused by an unreadable field value
    pub fn is_access(&self) -> bool {
        matches!(self, Self::FieldAccess(_))
    }
}

impl Display for CsvWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingEncoding => write!(f, "Configuration error: no encoding specified"),
            Self::UnknownEncoding(label) => {
                write!(f, "Configuration error: unknown encoding '{label}'")
            }
            Self::FieldAccess(e) => write!(f, "Access error: {e}"),
            Self::Io(e) => write!(f, "IO error: {e}"),
        }
    }
}

impl std::error::Error for CsvWriteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::FieldAccess(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::MissingEncoding | Self::UnknownEncoding(_) => None,
        }
    }
}

impl From<FieldAccessError> for CsvWriteError {
    fn from(e: FieldAccessError) -> Self {
        Self::FieldAccess(e)
    }
}

impl From<std::io::Error> for CsvWriteError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_classification() {
        assert!(CsvWriteError::MissingEncoding.is_configuration());
        assert!(CsvWriteError::UnknownEncoding("klingon".into()).is_configuration());
        let access: CsvWriteError = FieldAccessError::new("User", "email", "locked").into();
        assert!(access.is_access());
        assert!(!access.is_configuration());
        let io: CsvWriteError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(!io.is_access() && !io.is_configuration());
    }

    #[test]
    fn test_error_display() {
        let e = CsvWriteError::UnknownEncoding("klingon".into());
        assert_eq!(e.to_string(), "Configuration error: unknown encoding 'klingon'");
        let e: CsvWriteError = FieldAccessError::new("User", "email", "locked").into();
        assert_eq!(
            e.to_string(),
            "Access error: Cannot read field 'email' of 'User': locked"
        );
        assert!(e.source().is_some());
    }
}
