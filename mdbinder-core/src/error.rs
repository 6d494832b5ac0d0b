//! Error types for the assembly pipeline.
use std::{io, path::PathBuf};

/// Result type for assembly operations.
pub type AssembleResult<T> = Result<T, AssembleError>;

/// Errors that abort an assembly run.
///
/// Problems scoped to a single heading, link or image are recovered in place
/// and never surface here.
#[derive(Debug, thiserror::Error)]
pub enum AssembleError {
  #[error("Failed to read source file {}: {source}", path.display())]
  SourceRead {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Working directory {} cannot be resolved: {source}", path.display())]
  Root {
    path:   PathBuf,
    #[source]
    source: io::Error,
  },

  #[error("Failed to serialize page {page_id}: {source}")]
  Serialize {
    page_id: String,
    #[source]
    source:  io::Error,
  },
}
