//! Comment-line conventions.
//!
//! The second line of every xyz frame is free-form, but a few conventions are common enough to
//! be understood here: extended xyz (`Lattice="..." Properties=...`) and the step information
//! CP2K writes (`i = 10, time = 5.000, E = -1234.5678`).
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;

use crate::cell::{CellTable, Lattice};
use crate::error::{Error, Result};

/// The only per-atom property layout written and accepted: a species and a position.
pub const PROPERTIES: &str = "Properties=species:S:1:pos:R:3";

const FLOAT: &str = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";

fn lattice_regex() -> &'static Regex {
    static LATTICE: OnceLock<Regex> = OnceLock::new();
    LATTICE.get_or_init(|| {
        let pattern = format!(r#"Lattice="((?:{FLOAT}\s+){{8}}{FLOAT})""#);
        Regex::new(&pattern).expect("lattice pattern is valid")
    })
}

fn step_regex() -> &'static Regex {
    static STEP: OnceLock<Regex> = OnceLock::new();
    STEP.get_or_init(|| {
        Regex::new(r"i\s*=\s*(\d+),\s*time\s*=\s*(\d+\.\d+),\s*E\s*=\s*(-?\d+\.\d+)")
            .expect("step pattern is valid")
    })
}

/// Whether `comment` is an extended xyz comment line.
///
/// Both a nine-float `Lattice="..."` entry and the species/position [`PROPERTIES`] entry must
/// occur somewhere in the line. Other text around them is allowed.
pub fn is_extended(comment: &str) -> bool {
    lattice_regex().is_match(comment) && comment.contains(PROPERTIES)
}

/// Extract the lattice from the `Lattice="..."` entry of a comment, if it has one.
pub fn lattice(comment: &str) -> Option<Lattice> {
    let captures = lattice_regex().captures(comment)?;
    captures[1].parse().ok()
}

/// Step information of a CP2K trajectory frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    pub step: u64,
    /// Time in femtoseconds.
    pub time: f64,
    /// Potential energy in hartree.
    pub energy: f64,
}

impl StepInfo {
    /// Find the `i = <step>, time = <time>, E = <energy>` entry in a comment, if present.
    pub fn parse(comment: &str) -> Option<Self> {
        let captures = step_regex().captures(comment)?;
        Some(Self {
            step: captures[1].parse().ok()?,
            time: captures[2].parse().ok()?,
            energy: captures[3].parse().ok()?,
        })
    }
}

/// The kind of comment line written for each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentMode {
    Nothing,
    Copy,
    Lattice,
    CellArray,
    Extended,
}

impl CommentMode {
    pub const ALL: [CommentMode; 5] = [
        CommentMode::Nothing,
        CommentMode::Copy,
        CommentMode::Lattice,
        CommentMode::CellArray,
        CommentMode::Extended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommentMode::Nothing => "nothing",
            CommentMode::Copy => "copy",
            CommentMode::Lattice => "lattice",
            CommentMode::CellArray => "cell_array",
            CommentMode::Extended => "extended",
        }
    }
}

impl fmt::Display for CommentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| Error::UnknownCommentMode(s.to_string()))
    }
}

/// What to write on the comment line of each frame, together with the data it needs.
#[derive(Debug, Clone, Copy)]
pub enum Comment<'c> {
    /// `Frame=<index>`.
    Nothing,
    /// The comment at the frame's index, verbatim.
    Copy(&'c [String]),
    /// One lattice for every frame, as extended xyz.
    Lattice(Lattice),
    /// The lattice from the table row at the frame's index, as extended xyz.
    CellArray(&'c CellTable),
    /// The comment at the frame's index, verbatim. The comments are already extended xyz.
    Extended(&'c [String]),
}

impl<'c> Comment<'c> {
    pub fn mode(&self) -> CommentMode {
        match self {
            Comment::Nothing => CommentMode::Nothing,
            Comment::Copy(_) => CommentMode::Copy,
            Comment::Lattice(_) => CommentMode::Lattice,
            Comment::CellArray(_) => CommentMode::CellArray,
            Comment::Extended(_) => CommentMode::Extended,
        }
    }

    /// Render the comment line for frame `idx`, without a line ending.
    pub fn line(&self, idx: usize) -> Result<String> {
        match self {
            Comment::Nothing => Ok(format!("Frame={idx}")),
            Comment::Copy(comments) | Comment::Extended(comments) => {
                comments.get(idx).cloned().ok_or(Error::CommentOutOfRange {
                    index: idx,
                    len: comments.len(),
                })
            }
            Comment::Lattice(lattice) => Ok(extended_line(&lattice.to_string(), idx)),
            Comment::CellArray(table) => {
                let values = table
                    .lattice(idx)?
                    .to_row_major()
                    .map(|value| format!("{value:.4}"));
                Ok(extended_line(&values.join(" "), idx))
            }
        }
    }
}

fn extended_line(lattice: &str, idx: usize) -> String {
    format!("Lattice=\"{lattice}\" {PROPERTIES} Frame={idx}")
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXTENDED: &str =
        r#"Lattice="10.0 0.0 0.0 0.0 10.0 0.0 0.0 0.0 10.0" Properties=species:S:1:pos:R:3"#;

    #[test]
    fn extended_grammar() {
        assert!(is_extended(EXTENDED));
        assert!(is_extended(&format!("step 3 {EXTENDED} Frame=3 pbc=\"T T T\"")));
        assert!(is_extended(
            r#"Properties=species:S:1:pos:R:3 Lattice="1e1 -0 0 0 1.5E+1 0 .5 0 +10""#
        ));
    }

    #[test]
    fn not_extended() {
        // Eight values.
        assert!(!is_extended(
            r#"Lattice="10.0 0.0 0.0 0.0 10.0 0.0 0.0 10.0" Properties=species:S:1:pos:R:3"#
        ));
        // Missing the properties.
        assert!(!is_extended(
            r#"Lattice="10.0 0.0 0.0 0.0 10.0 0.0 0.0 0.0 10.0""#
        ));
        // Missing the lattice.
        assert!(!is_extended("Properties=species:S:1:pos:R:3"));
        // Different properties.
        assert!(!is_extended(
            r#"Lattice="10.0 0.0 0.0 0.0 10.0 0.0 0.0 0.0 10.0" Properties=species:S:1:velo:R:3"#
        ));
        assert!(!is_extended("Test molecule frame 1"));
    }

    #[test]
    fn lattice_from_comment() {
        let lattice = lattice(EXTENDED).unwrap();
        assert_eq!(lattice, Lattice::diagonal(10.0, 10.0, 10.0));
        assert!(super::lattice("Frame=1").is_none());
    }

    #[test]
    fn cp2k_step_info() {
        let info = StepInfo::parse(" i =       10, time =        5.000, E =     -1234.5678901234")
            .unwrap();
        assert_eq!(info.step, 10);
        assert_eq!(info.time, 5.0);
        assert_eq!(info.energy, -1234.5678901234);
        assert!(StepInfo::parse("Test molecule").is_none());
    }

    #[test]
    fn modes() {
        for mode in CommentMode::ALL {
            assert_eq!(mode.to_string().parse::<CommentMode>().unwrap(), mode);
        }
        let err = "cp2k".parse::<CommentMode>().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Index);
    }

    #[test]
    fn lines() {
        let comments = vec!["a".to_string(), "b".to_string()];
        assert_eq!(Comment::Nothing.line(7).unwrap(), "Frame=7");
        assert_eq!(Comment::Copy(&comments).line(1).unwrap(), "b");
        assert!(matches!(
            Comment::Extended(&comments).line(2),
            Err(Error::CommentOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(
            Comment::Lattice(Lattice::diagonal(1.0, 2.0, 3.0)).line(0).unwrap(),
            r#"Lattice="1.0 0.0 0.0 0.0 2.0 0.0 0.0 0.0 3.0" Properties=species:S:1:pos:R:3 Frame=0"#
        );
        let table = CellTable::from_rows([vec![
            0.0, 0.0, 12.4, 0.0, 0.0, 0.0, 12.4, 0.0, 0.0, 0.0, 12.4, 1906.624,
        ]]);
        let line = Comment::CellArray(&table).line(0).unwrap();
        assert_eq!(
            line,
            r#"Lattice="12.4000 0.0000 0.0000 0.0000 12.4000 0.0000 0.0000 0.0000 12.4000" Properties=species:S:1:pos:R:3 Frame=0"#
        );
        assert!(is_extended(&line));
    }
}
