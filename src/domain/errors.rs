use super::models::SectionKey;
use thiserror::Error;

/// Raised when forward navigation finds an invalid item in the active section.
///
/// `index` is 1-based so it can be shown to the user as is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{section} #{index}: end date is before start date")]
    DateOrder { section: SectionKey, index: usize },

    #[error("{section} #{index}: '{value}' is not a valid date (expected YYYY-MM)")]
    InvalidDate {
        section: SectionKey,
        index: usize,
        value: String,
    },
}

impl ValidationError {
    pub fn section(&self) -> SectionKey {
        match self {
            ValidationError::DateOrder { section, .. } => *section,
            ValidationError::InvalidDate { section, .. } => *section,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            ValidationError::DateOrder { index, .. } => *index,
            ValidationError::InvalidDate { index, .. } => *index,
        }
    }
}

/// Failure of the durable key-value backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored data: {0}")]
    Format(#[from] serde_json::Error),
}

/// Registration or login failure. The message is shown to the user verbatim.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("{0}")]
    Rejected(String),

    #[error("Could not reach the sign-in service: {0}")]
    Transport(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("An export is already in progress")]
    InProgress,

    #[error("PDF rendering failed: {0}")]
    Render(String),

    #[error("Could not write PDF: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template name must not be empty")]
    EmptyName,

    #[error("Section {0} appears more than once in the template order")]
    DuplicateSection(SectionKey),

    #[error("Built-in template '{0}' cannot be replaced")]
    Reserved(String),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },

    #[error("could not determine a data directory; set TRESUME_DATA_DIR")]
    NoDataDir,
}
