//! Error types.

use std::{collections::TryReserveError, io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read at all.
    #[error("cannot read configuration {}: {source}", path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// One of the three leading integers is missing or unparsable.
    #[error("malformed header: missing or invalid {field}")]
    MalformedHeader { field: &'static str },

    #[error("grid must have at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },

    /// A coordinate token is not an integer. `pair` is zero based.
    #[error("malformed coordinate pair #{pair}")]
    MalformedBody { pair: usize },

    /// Fewer coordinate pairs than the header announced.
    #[error("truncated body: {declared} coordinate pairs declared, {found} present")]
    TruncatedBody { declared: usize, found: usize },

    /// Cell storage for the world or a step snapshot could not be obtained.
    #[error("allocation failure: {0}")]
    AllocationFailure(#[from] TryReserveError),

    #[error("terminal is {have_w}x{have_h}, world needs {need_w}x{need_h}")]
    TerminalTooSmall {
        need_w: u16,
        need_h: u16,
        have_w: u16,
        have_h: u16,
    },

    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
