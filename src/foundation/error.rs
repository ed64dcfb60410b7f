pub type SharecardResult<T> = Result<T, SharecardError>;

/// Every variant ends the current generation; recoverable conditions are [`crate::Notice`]s.
#[derive(thiserror::Error, Debug)]
pub enum SharecardError {
    #[error("invalid input: {0}")]
    Input(String),

    #[error("metadata error: {0}")]
    Metadata(String),

    #[error("load error: {0}")]
    Load(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("packaging error: {0}")]
    Packaging(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SharecardError {
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    pub fn load(msg: impl Into<String>) -> Self {
        Self::Load(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn packaging(msg: impl Into<String>) -> Self {
        Self::Packaging(msg.into())
    }

    /// Bad URL, identifier or metadata.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Metadata(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
