use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::comment::Comment;
use crate::error::{Error, Result};
use crate::Trajectory;

/// Writes selected frames of a [`Trajectory`] in xyz format.
///
/// Every frame is rendered completely before any of it is written, so a frame that fails
/// validation leaves the output untouched.
#[derive(Debug)]
pub struct XYZWriter<W> {
    pub writer: W,
}

impl XYZWriter<File> {
    /// Open `path` for appending, creating it if it does not exist.
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(file))
    }
}

impl<W: Write> XYZWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Write frame `idx` of `trajectory`, with a comment line according to `comment`.
    pub fn write_frame(
        &mut self,
        trajectory: &Trajectory,
        idx: usize,
        comment: &Comment<'_>,
    ) -> Result<()> {
        let rendered = render_frame(trajectory, idx, comment)?;
        self.writer.write_all(&rendered)?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

/// Append frame `idx` of `trajectory` to the file at `path`.
///
/// The file is opened and closed again within this call. Nothing is written, and the file is
/// not created, if the frame index or the comment data is invalid.
pub fn write_frame<P: AsRef<Path>>(
    path: P,
    idx: usize,
    trajectory: &Trajectory,
    comment: &Comment<'_>,
) -> Result<()> {
    let rendered = render_frame(trajectory, idx, comment)?;
    let mut writer = XYZWriter::append(path)?;
    writer.writer.write_all(&rendered)?;
    Ok(())
}

/// Render frame `idx` as xyz text: the atom count, the comment line, and one line per atom with
/// its coordinates to six decimals.
pub fn render_frame(trajectory: &Trajectory, idx: usize, comment: &Comment<'_>) -> Result<Vec<u8>> {
    let frame = trajectory
        .frame(idx)
        .ok_or_else(|| Error::FrameIndexOutOfRange {
            index: idx,
            nframes: trajectory.nframes(),
        })?;
    let comment = comment.line(idx)?;

    // Roughly 40 bytes per atom line.
    let mut out = Vec::with_capacity(comment.len() + 16 + frame.natoms() * 40);
    writeln!(out, "{}", frame.natoms())?;
    writeln!(out, "{comment}")?;
    for (symbol, pos) in frame.atoms() {
        writeln!(out, "{symbol} {:.6} {:.6} {:.6}", pos.x, pos.y, pos.z)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use glam::DVec3;

    use super::*;
    use crate::{CellTable, ErrorKind, Frame, Lattice};

    fn trajectory() -> Trajectory {
        let frames = (0..3)
            .map(|i| Frame {
                comment: format!("step {i}"),
                symbols: vec!["C".to_string(), "H".to_string()],
                positions: vec![DVec3::ZERO, DVec3::splat(i as f64 + 1.0)],
            })
            .collect();
        Trajectory::new(frames, false).unwrap()
    }

    fn render(idx: usize, comment: Comment<'_>) -> Result<String> {
        let bytes = render_frame(&trajectory(), idx, &comment)?;
        Ok(String::from_utf8(bytes).unwrap())
    }

    #[test]
    fn nothing() {
        assert_eq!(
            render(0, Comment::Nothing).unwrap(),
            "2\nFrame=0\nC 0.000000 0.000000 0.000000\nH 1.000000 1.000000 1.000000\n"
        );
    }

    #[test]
    fn copy() {
        let comments = trajectory().comments();
        assert_eq!(
            render(2, Comment::Copy(&comments)).unwrap(),
            "2\nstep 2\nC 0.000000 0.000000 0.000000\nH 3.000000 3.000000 3.000000\n"
        );
    }

    #[test]
    fn lattice() {
        let lattice: Lattice = "10 11 12".parse().unwrap();
        let text = render(1, Comment::Lattice(lattice)).unwrap();
        let comment = text.lines().nth(1).unwrap();
        assert_eq!(
            comment,
            r#"Lattice="10.0 0.0 0.0 0.0 11.0 0.0 0.0 0.0 12.0" Properties=species:S:1:pos:R:3 Frame=1"#
        );
    }

    #[test]
    fn cell_array() {
        let table = CellTable::from_rows((0..3).map(|i| {
            let a = 10.0 + i as f64 / 3.0;
            vec![i as f64, 0.5 * i as f64, a, 0.0, 0.0, 0.0, a, 0.0, 0.0, 0.0, a, a * a * a]
        }));
        let text = render(1, Comment::CellArray(&table)).unwrap();
        let comment = text.lines().nth(1).unwrap();
        assert_eq!(
            comment,
            r#"Lattice="10.3333 0.0000 0.0000 0.0000 10.3333 0.0000 0.0000 0.0000 10.3333" Properties=species:S:1:pos:R:3 Frame=1"#
        );
    }

    #[test]
    fn out_of_range() {
        for idx in [3, 4, 100] {
            let err = render(idx, Comment::Nothing).unwrap_err();
            assert!(matches!(
                err,
                Error::FrameIndexOutOfRange { index, nframes: 3 } if index == idx
            ));
            assert_eq!(err.kind(), ErrorKind::Index);
            assert_eq!(
                err.to_string(),
                format!("frame index out of range: {idx} (number of frames: 3)")
            );
        }
    }

    #[test]
    fn short_payloads() {
        let comments = vec!["only one".to_string()];
        assert!(matches!(
            render(1, Comment::Copy(&comments)),
            Err(Error::CommentOutOfRange { index: 1, len: 1 })
        ));
        let table = CellTable::from_rows([vec![0.0; 11]]);
        assert!(matches!(
            render(2, Comment::CellArray(&table)),
            Err(Error::CellRow { frame: 2, .. })
        ));
    }

    #[test]
    fn session() {
        let trajectory = trajectory();
        let mut writer = XYZWriter::new(Vec::new());
        for idx in [0, 2] {
            writer
                .write_frame(&trajectory, idx, &Comment::Nothing)
                .unwrap();
        }
        // A failed frame writes nothing.
        assert!(writer
            .write_frame(&trajectory, 3, &Comment::Nothing)
            .is_err());
        let text = String::from_utf8(writer.into_inner()).unwrap();
        assert_eq!(text.lines().count(), 8);
        assert_eq!(text.lines().nth(5).unwrap(), "Frame=2");
    }
}
