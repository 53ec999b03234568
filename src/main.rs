//! Extract frames from an xyz trajectory into a new one.
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Parser};
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use xyzframes::{CellTable, Comment, Lattice, Range, Trajectory, XYZWriter};

/// Extract frames from an xyz trajectory, optionally rewriting the comment lines.
///
/// By default, the comment line of every written frame is `Frame=<index>`. The log level can be
/// set through `RUST_LOG`.
#[derive(Parser, Debug)]
#[command(version, group(ArgGroup::new("comment").args(["copy_comment", "lattice", "cell"])))]
struct Args {
    /// Input path (xyz).
    input: PathBuf,

    /// Output path (xyz).
    output: PathBuf,

    /// Take every n-th frame.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    stride: u64,

    /// Number of frames to skip from the beginning of the trajectory.
    #[arg(long, default_value_t = 0)]
    skip: usize,

    /// The input is extended xyz. Every comment line is validated, and copied to the output
    /// unless another comment option is given.
    #[arg(long)]
    extended: bool,

    /// Copy the comment line of each frame verbatim.
    #[arg(long)]
    copy_comment: bool,

    /// Write extended xyz with this lattice for every frame.
    ///
    /// Either nine floats `"Ax Ay Az Bx By Bz Cx Cy Cz"` or three floats `"A B C"` for an
    /// orthorhombic cell.
    #[arg(long, value_name = "FLOATS")]
    lattice: Option<String>,

    /// Write extended xyz with a lattice per frame, taken from columns 3 to 11 of each row of
    /// this cell table (a CP2K `.cell` file, for instance).
    #[arg(long, value_name = "FILE")]
    cell: Option<PathBuf>,

    /// Overwrite the output file if it already exists.
    #[arg(short, long)]
    force: bool,
}

fn main() {
    init_tracing();

    let args = Args::parse();
    if let Err(err) = run(&args) {
        tracing::error!("{err:#}");
        std::process::exit(1);
    }
}

/// Initialize tracing with an env-driven filter (default INFO).
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn run(args: &Args) -> Result<()> {
    let trajectory = xyzframes::parse_trajectory(&args.input, args.extended)
        .with_context(|| format!("reading {}", args.input.display()))?;
    info!(
        "read {} frames of {} atoms from {}",
        trajectory.nframes(),
        trajectory.natoms().unwrap_or_default(),
        args.input.display()
    );

    let stride = usize::try_from(args.stride).context("stride does not fit in memory")?;
    if !trajectory.is_empty() && stride > trajectory.nframes() {
        bail!(
            "stride value ({stride}) cannot be greater than the total number of frames in the trajectory ({})",
            trajectory.nframes()
        );
    }
    let range = Range::skip_stride(args.skip, stride);

    // The payloads borrowed by the comment must outlive it.
    let comments;
    let table;
    let comment = if args.copy_comment {
        comments = trajectory.comments();
        Comment::Copy(&comments)
    } else if let Some(lattice) = &args.lattice {
        let lattice: Lattice = lattice
            .parse()
            .with_context(|| format!("invalid lattice {lattice:?}"))?;
        Comment::Lattice(lattice)
    } else if let Some(path) = &args.cell {
        table = CellTable::open(path).with_context(|| format!("reading {}", path.display()))?;
        Comment::CellArray(&table)
    } else if args.extended {
        comments = trajectory.extended_comments()?;
        Comment::Extended(&comments)
    } else {
        Comment::Nothing
    };
    // Every selected frame needs a comment line before the output is touched.
    for idx in range.indices(trajectory.nframes()) {
        comment
            .line(idx)
            .with_context(|| format!("no {} comment for frame {idx}", comment.mode()))?;
    }

    prepare_output(&args.output, args.force)?;
    debug!("writing comment lines as {}", comment.mode());

    let written = write_frames(&args.output, &trajectory, range, &comment)?;
    info!("wrote {written} frames to {}", args.output.display());

    Ok(())
}

/// Make sure the output starts out empty.
fn prepare_output(path: &Path, force: bool) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    if !force {
        bail!(
            "{} already exists, pass --force to overwrite it",
            path.display()
        );
    }
    warn!("overwriting {}", path.display());
    std::fs::remove_file(path).with_context(|| format!("removing {}", path.display()))
}

fn write_frames(
    output: &Path,
    trajectory: &Trajectory,
    range: Range,
    comment: &Comment<'_>,
) -> Result<usize> {
    let mut writer = XYZWriter::append(output)
        .with_context(|| format!("opening {}", output.display()))?;
    let mut written = 0;
    for idx in range.indices(trajectory.nframes()) {
        writer
            .write_frame(trajectory, idx, comment)
            .with_context(|| format!("writing frame {idx}"))?;
        debug!("wrote frame {idx}");
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}
