//! Error types for syntax highlighting operations.

/// Result type for syntax highlighting operations.
pub type SyntaxResult<T> = Result<T, SyntaxError>;

/// Errors that can occur during syntax highlighting.
#[derive(Debug, thiserror::Error)]
pub enum SyntaxError {
  #[error("Language '{0}' is not supported by this highlighter")]
  UnsupportedLanguage(String),
  #[error("Highlighting failed: {0}")]
  HighlightingFailed(String),
  #[error("Stylesheet generation failed: {0}")]
  StylesheetFailed(String),
  #[error(
    "No syntax highlighting backend available. Enable the 'syntect' feature."
  )]
  NoBackendAvailable,
}
