//! Errors the facade can raise while projecting a parse tree onto a target
//! record shape.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum UnmarshalError {
    /// The target to unmarshal into was absent; a nil target is always
    /// an error, never a silent no-op.
    NilTarget,
    /// Strict mode required `field` and no child element supplied it.
    MissingField { field: &'static str },
    /// A scalar field's text could not be parsed as the requested type.
    InvalidScalar { field: &'static str, text: String },
    /// A scalar field's text parsed but did not fit the requested
    /// signedness/bit width.
    Overflow { field: &'static str, text: String },
}

impl fmt::Display for UnmarshalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmarshalError::NilTarget => write!(f, "unmarshal target is nil"),
            UnmarshalError::MissingField { field } => {
                write!(f, "field '{field}' is required in strict mode but was not found")
            }
            UnmarshalError::InvalidScalar { field, text } => {
                write!(f, "field '{field}': '{text}' is not a valid value for this type")
            }
            UnmarshalError::Overflow { field, text } => {
                write!(f, "field '{field}': '{text}' overflows the target integer type")
            }
        }
    }
}

impl std::error::Error for UnmarshalError {}
