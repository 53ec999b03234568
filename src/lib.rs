//! Read, validate and re-emit xyz trajectories.
//!
//! ```no_run
//! use xyzframes::{Comment, Range};
//!
//! let trajectory = xyzframes::parse_trajectory("traj.xyz", false)?;
//! for idx in Range::skip_stride(10, 5).indices(trajectory.nframes()) {
//!     xyzframes::write_frame("every_fifth.xyz", idx, &trajectory, &Comment::Nothing)?;
//! }
//! # Ok::<(), xyzframes::Error>(())
//! ```
use std::collections::BTreeSet;
use std::path::Path;

use glam::DVec3;

pub use crate::cell::{CellTable, Lattice};
pub use crate::comment::{Comment, CommentMode, StepInfo};
pub use crate::error::{Error, ErrorKind, Result};
pub use crate::reader::XYZReader;
pub use crate::selection::Range;
pub use crate::writer::{write_frame, XYZWriter};

pub mod cell;
pub mod comment;
mod error;
pub mod reader;
mod selection;
pub mod writer;

/// A single snapshot of a trajectory.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Frame {
    /// The trimmed comment line.
    pub comment: String,
    pub symbols: Vec<String>,
    pub positions: Vec<DVec3>,
}

impl Frame {
    pub fn natoms(&self) -> usize {
        self.symbols.len()
    }

    pub fn atoms(&self) -> impl Iterator<Item = (&str, DVec3)> + '_ {
        self.symbols
            .iter()
            .map(String::as_str)
            .zip(self.positions.iter().copied())
    }

    /// The lattice from an extended xyz comment.
    pub fn lattice(&self) -> Option<Lattice> {
        comment::lattice(&self.comment)
    }

    /// The step information from a CP2K comment.
    pub fn step_info(&self) -> Option<StepInfo> {
        StepInfo::parse(&self.comment)
    }
}

/// All frames of a trajectory, with the same number of atoms in each.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Trajectory {
    frames: Box<[Frame]>,
    is_extended: bool,
}

impl Trajectory {
    /// Collect `frames` into a [`Trajectory`].
    ///
    /// `is_extended` records that every comment was checked to be extended xyz.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonConstantAtomCount`] if the frames do not all have the same number of
    /// atoms.
    pub fn new(frames: Vec<Frame>, is_extended: bool) -> Result<Self> {
        let counts: BTreeSet<usize> = frames.iter().map(Frame::natoms).collect();
        if counts.len() > 1 {
            return Err(Error::NonConstantAtomCount {
                counts: counts.into_iter().collect(),
            });
        }
        Ok(Self {
            frames: frames.into_boxed_slice(),
            is_extended,
        })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, idx: usize) -> Option<&Frame> {
        self.frames.get(idx)
    }

    pub fn nframes(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn is_extended(&self) -> bool {
        self.is_extended
    }

    /// The number of atoms shared by all frames, or [`None`] for an empty trajectory.
    pub fn natoms(&self) -> Option<usize> {
        self.frames.first().map(Frame::natoms)
    }

    pub fn atom_counts(&self) -> Vec<usize> {
        self.frames.iter().map(Frame::natoms).collect()
    }

    pub fn symbols(&self, idx: usize) -> Option<&[String]> {
        self.frame(idx).map(|frame| &frame.symbols[..])
    }

    pub fn positions(&self, idx: usize) -> Option<&[DVec3]> {
        self.frame(idx).map(|frame| &frame.positions[..])
    }

    pub fn comments(&self) -> Vec<String> {
        self.frames.iter().map(|frame| frame.comment.clone()).collect()
    }

    /// The comments, provided they were all checked to be extended xyz while reading.
    pub fn extended_comments(&self) -> Result<Vec<String>> {
        if !self.is_extended {
            return Err(Error::NotExtended);
        }
        Ok(self.comments())
    }
}

/// Read and validate the whole trajectory at `path`.
///
/// If `is_extended` is set, every comment line must be an extended xyz comment.
pub fn parse_trajectory<P: AsRef<Path>>(path: P, is_extended: bool) -> Result<Trajectory> {
    XYZReader::open(path)?
        .extended(is_extended)
        .read_all_frames()
}
