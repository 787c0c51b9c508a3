//! `copier copy*` commands: wire stdin/files to stdout/files and run one copy
//! operation.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use copier_core::{Copier, CopyLimits, ReaderSource, WriterDestination};

/// Which copier operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyMode {
    /// A single `copy` step.
    One,
    /// A single `copy_multiple` step with the given batch size.
    Multiple(usize),
    /// `copy` repeated until it stops.
    All,
    /// `copy_multiple` repeated until it stops.
    AllMultiple(usize),
}

/// Where to read from and write to. `None` means stdin / stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct Endpoints<'a> {
    pub input: Option<&'a Path>,
    pub output: Option<&'a Path>,
}

type StreamCopier = Copier<ReaderSource<Box<dyn BufRead>>, WriterDestination<Box<dyn Write>>>;

fn open_input(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(std::io::stdin().lock())),
    }
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(std::io::stdout().lock()))),
    }
}

/// Run one copy operation between `endpoints`.
pub fn run_copy(endpoints: Endpoints<'_>, mode: CopyMode, limits: CopyLimits) -> Result<()> {
    let source = ReaderSource::new(open_input(endpoints.input)?);
    let destination = WriterDestination::new(open_output(endpoints.output)?);
    let mut copier: StreamCopier = Copier::new(source, destination).with_limits(limits);

    match mode {
        CopyMode::One => {
            let step = copier.copy().context("copy failed")?;
            info!(written = step.written(), outcome = ?step, "copy finished");
        }
        CopyMode::Multiple(count) => {
            let step = copier.copy_multiple(count).context("copy failed")?;
            info!(count, written = step.written(), outcome = ?step, "copy finished");
        }
        CopyMode::All => {
            let summary = copier.copy_all().context("copy failed")?;
            info!(
                steps = summary.steps,
                written = summary.units,
                reason = ?summary.reason,
                "copy finished"
            );
        }
        CopyMode::AllMultiple(count) => {
            let summary = copier.copy_all_multiple(count).context("copy failed")?;
            info!(
                count,
                steps = summary.steps,
                written = summary.units,
                reason = ?summary.reason,
                "copy finished"
            );
        }
    }

    let (_, mut destination) = copier.into_parts();
    destination.flush()
}
