use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use glam::DVec3;

use crate::comment;
use crate::error::{require_file, Error, Result};
use crate::{Frame, Trajectory};

/// A strict, line-based reader for xyz trajectories.
///
/// Frames can be pulled one at a time with [`XYZReader::read_frame`] or through the [`Iterator`]
/// implementation. Note that only [`XYZReader::read_all_frames`] checks that the number of atoms
/// is the same for every frame, since that can only be known at the end of the file.
#[derive(Debug)]
pub struct XYZReader<R> {
    pub reader: R,
    is_extended: bool,
    /// Number of lines consumed so far.
    line: usize,
    buf: String,
}

impl XYZReader<BufReader<File>> {
    /// Open the trajectory at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `path` is not an existing file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        require_file(path)?;
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> XYZReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            is_extended: false,
            line: 0,
            buf: String::new(),
        }
    }

    /// Require every comment line to be extended xyz.
    pub fn extended(mut self, is_extended: bool) -> Self {
        self.is_extended = is_extended;
        self
    }

    pub fn is_extended(&self) -> bool {
        self.is_extended
    }

    /// The number of lines read so far.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read the next line into `self.buf`. Returns `false` at the end of the input.
    fn next_line(&mut self) -> Result<bool> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(false);
        }
        self.line += 1;
        Ok(true)
    }

    /// Reads the next frame into `frame`.
    ///
    /// Returns `Ok(false)` if the input ended cleanly before the frame started, in which case
    /// `frame` is left untouched. If an error is returned, the contents of `frame` are
    /// unspecified, and so is the position of the reader.
    pub fn read_frame(&mut self, frame: &mut Frame) -> Result<bool> {
        if !self.next_line()? {
            return Ok(false);
        }
        let count = self.buf.trim();
        let natoms = parse_atom_count(count).ok_or_else(|| Error::AtomCount {
            line: self.line,
            found: count.to_string(),
        })?;

        if !self.next_line()? {
            return Err(Error::PrematureEof {
                line: self.line + 1,
            });
        }
        let comment = self.buf.trim();
        if self.is_extended && !comment::is_extended(comment) {
            return Err(Error::ExtendedComment {
                line: self.line,
                comment: comment.to_string(),
            });
        }
        frame.comment.clear();
        frame.comment.push_str(comment);

        frame.symbols.clear();
        frame.positions.clear();
        for _ in 0..natoms {
            if !self.next_line()? {
                return Err(Error::PrematureEof {
                    line: self.line + 1,
                });
            }
            let (symbol, position) = parse_atom(&self.buf, self.line)?;
            frame.symbols.push(symbol.to_string());
            frame.positions.push(position);
        }

        Ok(true)
    }

    /// Reads all remaining frames and checks that they agree on the number of atoms.
    pub fn read_all_frames(&mut self) -> Result<Trajectory> {
        let mut frames = Vec::new();
        loop {
            let mut frame = Frame::default();
            if !self.read_frame(&mut frame)? {
                break;
            }
            frames.push(frame);
        }
        Trajectory::new(frames, self.is_extended)
    }
}

impl<R: BufRead> Iterator for XYZReader<R> {
    type Item = Result<Frame>;

    /// Reads the next frame. Iteration should stop at the first error.
    fn next(&mut self) -> Option<Self::Item> {
        let mut frame = Frame::default();
        match self.read_frame(&mut frame) {
            Ok(true) => Some(Ok(frame)),
            Ok(false) => None,
            Err(err) => Some(Err(err)),
        }
    }
}

/// An atom count is a plain, unsigned decimal integer.
fn parse_atom_count(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Atomic symbols are one or two ASCII letters. Their case is not checked.
fn is_atomic_symbol(s: &str) -> bool {
    (1..=2).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_alphabetic())
}

/// Parse an atom line: a symbol followed by three coordinates.
fn parse_atom(s: &str, line: usize) -> Result<(&str, DVec3)> {
    let mut fields = [""; 4];
    let mut found = 0;
    for field in s.split_whitespace() {
        if let Some(slot) = fields.get_mut(found) {
            *slot = field;
        }
        found += 1;
    }
    if found != fields.len() {
        return Err(Error::FieldCount { line, found });
    }

    let [symbol, x, y, z] = fields;
    if !is_atomic_symbol(symbol) {
        return Err(Error::InvalidSymbol {
            line,
            symbol: symbol.to_string(),
        });
    }
    let coord = |v: &str| v.parse::<f64>().map_err(|_| Error::Coordinates { line });
    let position = DVec3::new(coord(x)?, coord(y)?, coord(z)?);

    Ok((symbol, position))
}
