use std::io;
use thiserror::Error;

/// Conditions that end a run with exit status 1.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("Cannot use both show_docker and show_only_docker options.")]
    DisplayModeConflict,
    #[error("Failed to write output file: {0}")]
    OutputWrite(io::Error),
}
