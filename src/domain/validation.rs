use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: &'static str,
    },
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
    InvalidFormat {
        field: &'static str,
        input: String,
    },
    InvalidPhoneNumber {
        input: String,
    },
    OutOfRange {
        field: &'static str,
        min: u32,
        max: u32,
        actual: u32,
    },
    NotInFuture {
        field: &'static str,
    },
    EmptyUpdate,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max, actual } => {
                write!(f, "{field} too long: {actual} characters (max {max})")
            }
            Self::InvalidFormat { field, input } => write!(f, "invalid {field} format: {input}"),
            Self::InvalidPhoneNumber { input } => write!(f, "invalid phone number format: {input}"),
            Self::OutOfRange {
                field,
                min,
                max,
                actual,
            } => write!(
                f,
                "{field} out of range: {actual} (expected {min}..={max})"
            ),
            Self::NotInFuture { field } => write!(f, "{field} must be in the future"),
            Self::EmptyUpdate => f.write_str("update request cannot be empty"),
        }
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::ValidationError;

    #[test]
    fn display_messages_are_human_readable() {
        let err = ValidationError::Empty { field: "name" };
        assert_eq!(err.to_string(), "name must not be empty");

        let err = ValidationError::TooLong {
            field: "content",
            max: 1600,
            actual: 1601,
        };
        assert_eq!(
            err.to_string(),
            "content too long: 1601 characters (max 1600)"
        );

        let err = ValidationError::InvalidFormat {
            field: "workspace_id",
            input: "abc".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid workspace_id format: abc");

        let err = ValidationError::InvalidPhoneNumber {
            input: "12ab".to_owned(),
        };
        assert_eq!(err.to_string(), "invalid phone number format: 12ab");

        let err = ValidationError::OutOfRange {
            field: "limit",
            min: 1,
            max: 100,
            actual: 101,
        };
        assert_eq!(err.to_string(), "limit out of range: 101 (expected 1..=100)");

        let err = ValidationError::NotInFuture {
            field: "launch_date",
        };
        assert_eq!(err.to_string(), "launch_date must be in the future");

        assert_eq!(
            ValidationError::EmptyUpdate.to_string(),
            "update request cannot be empty"
        );
    }
}
