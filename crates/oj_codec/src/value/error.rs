use thiserror::Error;

use super::Value;

/// A [`Value`] that does not fit the field it is assigned to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("expected {expected}, found {found}")]
    Mismatch {
        expected: &'static str,
        found: &'static str,
    },
    #[error("value {value} does not fit in `{target}`")]
    OutOfRange { target: &'static str, value: String },
    #[error("expected {expected} elements, found {found}")]
    Length { expected: usize, found: usize },
    #[error("`{text}` is not a valid {expected}")]
    Text { expected: &'static str, text: String },
    #[error("invalid base64 text")]
    Base64(#[from] base64::DecodeError),
    #[error("expected object `{expected}`, found `{found}`")]
    WrongObject {
        expected: &'static str,
        found: &'static str,
    },
}

impl ValueError {
    #[inline]
    pub(crate) fn mismatch(expected: &'static str, found: &Value) -> Self {
        ValueError::Mismatch {
            expected,
            found: found.kind(),
        }
    }
}
