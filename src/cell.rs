use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::ops::Range;
use std::path::Path;
use std::str::FromStr;

use glam::{DMat3, DVec3};

use crate::error::{require_file, Error, Result};

/// Columns of a cell table row that hold the row-major lattice matrix.
///
/// The leading two columns of a CP2K `.cell` file are the step and the time, and anything past
/// the matrix (the volume) is ignored.
pub const LATTICE_COLUMNS: Range<usize> = 2..11;

/// A periodic unit cell, given by its three cell vectors.
///
/// The vectors are the rows of the row-major 3×3 matrix that extended xyz writes out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice(DMat3);

impl Lattice {
    pub fn from_row_major(values: [f64; 9]) -> Self {
        // glam is column-major, so reading rows as columns and transposing gives us the rows.
        Self(DMat3::from_cols_array(&values).transpose())
    }

    /// An orthorhombic cell with edge lengths `a`, `b` and `c`.
    pub fn diagonal(a: f64, b: f64, c: f64) -> Self {
        Self(DMat3::from_diagonal(DVec3::new(a, b, c)))
    }

    pub fn matrix(&self) -> DMat3 {
        self.0
    }

    pub fn vectors(&self) -> [DVec3; 3] {
        [self.0.row(0), self.0.row(1), self.0.row(2)]
    }

    pub fn to_row_major(&self) -> [f64; 9] {
        self.0.transpose().to_cols_array()
    }
}

impl FromStr for Lattice {
    type Err = Error;

    /// Parse either nine floats (the full row-major matrix) or three floats `A B C`, which
    /// describe the diagonal matrix `diag(A, B, C)`.
    fn from_str(s: &str) -> Result<Self> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        match tokens.len() {
            9 => {
                let mut values = [0.0; 9];
                for (value, token) in values.iter_mut().zip(&tokens) {
                    *value = parse_float(token)?;
                }
                Ok(Self::from_row_major(values))
            }
            3 => {
                let a = parse_float(tokens[0])?;
                let b = parse_float(tokens[1])?;
                let c = parse_float(tokens[2])?;
                Ok(Self::diagonal(a, b, c))
            }
            found => Err(Error::LatticeShape { found }),
        }
    }
}

impl fmt::Display for Lattice {
    /// Space-separated row-major values, each in its shortest round-trip form (`10.0`, `0.5`,
    /// `1e-07`, `1.5e+16`).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, value) in self.to_row_major().into_iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write_float(f, value)?;
        }
        Ok(())
    }
}

/// Write `value` in shortest round-trip form, with a signed exponent of at least two digits
/// when it is written in scientific notation.
fn write_float(f: &mut fmt::Formatter<'_>, value: f64) -> fmt::Result {
    if value.is_nan() {
        return f.write_str("nan");
    }
    let repr = format!("{value:?}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            write!(f, "{mantissa}e{sign}{digits:0>2}")
        }
        None => f.write_str(&repr),
    }
}

fn parse_float(token: &str) -> Result<f64> {
    token.parse().map_err(|_| Error::InvalidFloat {
        token: token.to_string(),
    })
}

/// A numeric table with one row of cell information per frame.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CellTable {
    rows: Vec<Box<[f64]>>,
}

impl CellTable {
    /// Read a cell table from a file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        require_file(path)?;
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Read a whitespace-delimited table.
    ///
    /// Blank lines and lines starting with `#` are skipped. Every remaining line must have the
    /// same number of columns.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut rows: Vec<Box<[f64]>> = Vec::new();
        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let row = line
                .split_whitespace()
                .map(parse_float)
                .collect::<Result<Box<[f64]>>>()?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(Error::RaggedCellTable {
                        line: idx + 1,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            rows.push(row);
        }
        Ok(Self { rows })
    }

    pub fn from_rows(rows: impl IntoIterator<Item = Vec<f64>>) -> Self {
        Self {
            rows: rows.into_iter().map(Vec::into_boxed_slice).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, idx: usize) -> Option<&[f64]> {
        self.rows.get(idx).map(|row| &row[..])
    }

    /// The lattice stored in the [`LATTICE_COLUMNS`] of the row for `frame`.
    pub fn lattice(&self, frame: usize) -> Result<Lattice> {
        let row = self.row(frame).ok_or_else(|| Error::CellRow {
            frame,
            reason: format!("the table has only {} rows", self.len()),
        })?;
        let values = row.get(LATTICE_COLUMNS).ok_or_else(|| Error::CellRow {
            frame,
            reason: format!(
                "{} columns, at least {} needed",
                row.len(),
                LATTICE_COLUMNS.end
            ),
        })?;
        let mut matrix = [0.0; 9];
        matrix.copy_from_slice(values);
        Ok(Lattice::from_row_major(matrix))
    }
}

impl FromStr for CellTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }
}
