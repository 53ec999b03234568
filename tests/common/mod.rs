#![allow(dead_code)]

use std::path::PathBuf;

pub mod trajectories {
    pub const CARBON: &str = "tests/trajectories/carbon.xyz";
    pub const ONEFRAME: &str = "tests/trajectories/oneframe.xyz";
    pub const VARIABLE: &str = "tests/trajectories/variable.xyz";
    pub const SHIFTED: &str = "tests/trajectories/shifted.xyz";
    pub const TRUNCATED: &str = "tests/trajectories/truncated.xyz";
    pub const BAD_SYMBOL: &str = "tests/trajectories/bad_symbol.xyz";
    pub const NUMERIC_SYMBOL: &str = "tests/trajectories/numeric_symbol.xyz";
    pub const BAD_COORDINATES: &str = "tests/trajectories/bad_coordinates.xyz";
    pub const EXTENDED: &str = "tests/trajectories/extended.xyz";
    pub const CP2K: &str = "tests/trajectories/water_cp2k.xyz";
    pub const CP2K_CELL: &str = "tests/trajectories/water_cp2k.cell";
    pub const MISSING: &str = "tests/trajectories/missing.xyz";
}

/// A scratch directory that is removed when dropped, with a path for an output file in it.
pub fn scratch(name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("couldn't create a temporary directory");
    let path = dir.path().join(name);
    (dir, path)
}

/// Generate an xyz trajectory with `nframes` frames of `natoms` argon atoms. Every coordinate
/// encodes the frame and atom index, so frames can be recognized after selection.
pub fn generate(nframes: usize, natoms: usize) -> String {
    let mut s = String::new();
    for fi in 0..nframes {
        s.push_str(&format!("{natoms}\nframe {fi}\n"));
        for ai in 0..natoms {
            let v = fi as f64 + ai as f64 * 0.001;
            s.push_str(&format!("Ar {v} {} {}\n", -v, v * 0.5));
        }
    }
    s
}
