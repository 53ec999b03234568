use std::path::Path;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Broad class of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input file does not exist.
    NotFound,
    /// A count, comment or atom line is malformed.
    Format,
    /// A value violates an invariant, or an auxiliary input (lattice, cell table) is malformed.
    Value,
    /// A frame index or comment mode is out of range.
    Index,
    /// The underlying reader or writer failed.
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found {name} not in {directory}")]
    NotFound { name: String, directory: String },

    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("incorrect file format: number of atoms must be an integer, found '{found}' on line {line}")]
    AtomCount { line: usize, found: String },

    #[error("incorrect file format: comment on line {line} is not extended xyz: '{comment}'")]
    ExtendedComment { line: usize, comment: String },

    #[error("incorrect file format: end of file reached prematurely (expected line {line})")]
    PrematureEof { line: usize },

    #[error("incorrect file format: line {line} must contain an atomic symbol and three floats, found {found} fields")]
    FieldCount { line: usize, found: usize },

    #[error("incorrect file format: invalid atomic symbol '{symbol}' on line {line}")]
    InvalidSymbol { line: usize, symbol: String },

    #[error("incorrect file format: could not parse coordinates on line {line}")]
    Coordinates { line: usize },

    #[error("number of atoms is not constant throughout the trajectory file (found {counts:?})")]
    NonConstantAtomCount { counts: Vec<usize> },

    #[error("a lattice needs 9 or 3 floats, found {found}")]
    LatticeShape { found: usize },

    #[error("'{token}' cannot be converted to float")]
    InvalidFloat { token: String },

    #[error("cell table row for frame {frame} is unusable: {reason}")]
    CellRow { frame: usize, reason: String },

    #[error("cell table line {line} has {found} columns, expected {expected}")]
    RaggedCellTable {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("trajectory was not read as extended xyz")]
    NotExtended,

    #[error("frame index out of range: {index} (number of frames: {nframes})")]
    FrameIndexOutOfRange { index: usize, nframes: usize },

    #[error("no comment for frame {index} (number of comments: {len})")]
    CommentOutOfRange { index: usize, len: usize },

    #[error("incorrect value '{0}' for comment line type: nothing, copy, lattice, cell_array or extended")]
    UnknownCommentMode(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Io { .. } => ErrorKind::Io,
            Error::AtomCount { .. }
            | Error::ExtendedComment { .. }
            | Error::PrematureEof { .. }
            | Error::FieldCount { .. }
            | Error::InvalidSymbol { .. }
            | Error::Coordinates { .. } => ErrorKind::Format,
            Error::NonConstantAtomCount { .. }
            | Error::LatticeShape { .. }
            | Error::InvalidFloat { .. }
            | Error::CellRow { .. }
            | Error::RaggedCellTable { .. }
            | Error::NotExtended => ErrorKind::Value,
            Error::FrameIndexOutOfRange { .. }
            | Error::CommentOutOfRange { .. }
            | Error::UnknownCommentMode(_) => ErrorKind::Index,
        }
    }

    /// Build a [`Error::NotFound`] naming the file and the directory it was expected in.
    pub fn not_found(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let directory = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.display().to_string(),
            _ => ".".to_string(),
        };
        Self::NotFound { name, directory }
    }
}

/// Fail with [`Error::NotFound`] unless `path` is an existing file.
pub(crate) fn require_file(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::not_found(path))
    }
}
