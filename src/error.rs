//! Extraction error types

use std::borrow::Cow;
use thiserror::Error;

/// Everything that can end an extraction attempt.
///
/// All variants are terminal for the current attempt. Cancelling the
/// destination choice is not an error and never shows up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ExtractError {
    #[error("Extract to function does not work in multicursors")]
    MultipleSelections,

    #[error("Select the statements or the expression to extract")]
    EmptySelection,

    #[error("Selected block should represent set of statements or an expression")]
    UnsupportedFragment,

    #[error("Unable to get scope data: {message}")]
    ScopeResolution { message: String },

    #[error("Parse error at offset {offset}: {message}")]
    Parse { offset: usize, message: String },

    #[error("Scope {id} is not a valid destination")]
    InvalidDestination { id: usize },

    #[error("Edit rejected: {message}")]
    Edit { message: String },
}

impl ExtractError {
    pub fn parse(offset: usize, message: impl Into<Cow<'static, str>>) -> Self {
        Self::Parse {
            offset,
            message: message.into().into_owned(),
        }
    }

    pub fn scope_resolution(message: impl Into<String>) -> Self {
        Self::ScopeResolution {
            message: message.into(),
        }
    }

    pub fn edit(message: impl Into<String>) -> Self {
        Self::Edit {
            message: message.into(),
        }
    }
}

/// Result type alias for extraction operations
pub type ExtractResult<T> = Result<T, ExtractError>;
