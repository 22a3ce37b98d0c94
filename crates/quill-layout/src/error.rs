//! Configuration errors.
//!
//! Layout queries fail with [`quill_text::TextError`]; only changing
//! configuration has failure modes of its own. A failed change leaves the
//! configuration exactly as it was.

use quill_text::TextError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid value for {option}: {value}")]
    InvalidValue { option: String, value: String },

    /// `no`/`!` applied to an option that is not a boolean.
    #[error("{0} is not a boolean option")]
    NotBoolean(String),

    /// Re-attribution after a font change failed.
    #[error(transparent)]
    Storage(#[from] TextError),
}

impl ConfigError {
    pub(crate) fn invalid(option: &str, value: impl ToString) -> Self {
        Self::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            ConfigError::invalid("tabstop", 0).to_string(),
            "invalid value for tabstop: 0"
        );
        assert_eq!(
            ConfigError::UnknownOption("wrap".into()).to_string(),
            "unknown option: wrap"
        );
        let storage: ConfigError = TextError::Uninitialized.into();
        assert_eq!(storage.to_string(), "no content has been assigned yet");
    }
}
