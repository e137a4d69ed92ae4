//! Scalar coercion: turning a child element's first text content into a
//! typed field value, honouring signedness, bit width, and overflow (an
//! out-of-range integer literal is an unmarshal error, not a silent wrap).

use crate::error::UnmarshalError;

/// A type a tree node's text content can be coerced into. Implemented here
/// for the handful of scalar kinds in common use; user record types
/// compose these through [`crate::FromElement`], they do not implement
/// `Scalar` themselves.
pub trait Scalar: Sized {
    fn parse_scalar(field: &'static str, text: &str) -> Result<Self, UnmarshalError>;
}

impl Scalar for String {
    fn parse_scalar(_field: &'static str, text: &str) -> Result<Self, UnmarshalError> {
        Ok(text.to_string())
    }
}

impl Scalar for bool {
    fn parse_scalar(field: &'static str, text: &str) -> Result<Self, UnmarshalError> {
        match text.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(UnmarshalError::InvalidScalar { field, text: text.to_string() }),
        }
    }
}

macro_rules! impl_scalar_signed {
    ($($t:ty),*) => {
        $(impl Scalar for $t {
            fn parse_scalar(field: &'static str, text: &str) -> Result<Self, UnmarshalError> {
                let trimmed = text.trim();
                let wide: i128 = trimmed
                    .parse()
                    .map_err(|_| UnmarshalError::InvalidScalar { field, text: text.to_string() })?;
                <$t>::try_from(wide)
                    .map_err(|_| UnmarshalError::Overflow { field, text: text.to_string() })
            }
        })*
    };
}

macro_rules! impl_scalar_unsigned {
    ($($t:ty),*) => {
        $(impl Scalar for $t {
            fn parse_scalar(field: &'static str, text: &str) -> Result<Self, UnmarshalError> {
                let trimmed = text.trim();
                let wide: i128 = trimmed
                    .parse()
                    .map_err(|_| UnmarshalError::InvalidScalar { field, text: text.to_string() })?;
                if wide < 0 {
                    return Err(UnmarshalError::Overflow { field, text: text.to_string() });
                }
                <$t>::try_from(wide)
                    .map_err(|_| UnmarshalError::Overflow { field, text: text.to_string() })
            }
        })*
    };
}

impl_scalar_signed!(i8, i16, i32, i64);
impl_scalar_unsigned!(u8, u16, u32, u64);
