//! The copier: one guarded delegation from a [`Source`] to a [`Destination`].
//!
//! [`Copier::copy`] and [`Copier::copy_multiple`] each perform exactly one
//! read and at most one write. The streaming variants
//! ([`Copier::copy_all`], [`Copier::copy_all_multiple`]) iterate those single
//! steps and stop on the first step that did not copy a full unit or batch.

use tracing::{debug, trace};

use crate::io::{Destination, Source};
use crate::unit::{NO_DATA, is_batch_copyable, is_copyable, until_newline};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Why a copy stopped without writing (or why a streaming copy ended).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The source returned the no-data sentinel.
    NoData,
    /// The source returned a newline, or a batch starting with one.
    Newline,
    /// The source returned an empty batch.
    EmptyBatch,
    /// The configured step limit was reached.
    StepLimit,
}

/// Outcome of a single copy step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `n` units were written and no newline was seen.
    Copied(usize),
    /// `n` units were written, then a newline ended the batch.
    Terminated(usize),
    /// Nothing was written.
    Stopped(StopReason),
}

impl Step {
    /// Number of units written by this step.
    pub fn written(&self) -> usize {
        match self {
            Step::Copied(n) | Step::Terminated(n) => *n,
            Step::Stopped(_) => 0,
        }
    }
}

/// Totals for a streaming copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopySummary {
    /// Number of single-step calls made.
    pub steps: usize,
    /// Number of units written across all steps.
    pub units: usize,
    /// What ended the loop.
    pub reason: StopReason,
}

/// Bounds applied to the streaming operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyLimits {
    /// Maximum number of single steps per streaming call. `None` is unbounded.
    pub max_steps: Option<usize>,
}

/// A collaborator failed. Boundary conditions (no data, newline, empty
/// batch) are never errors.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("failed to read from source")]
    Source(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("failed to write to destination")]
    Destination(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl CopyError {
    fn from_source(err: anyhow::Error) -> Self {
        Self::Source(err.into())
    }

    fn from_destination(err: anyhow::Error) -> Self {
        Self::Destination(err.into())
    }
}

// ---------------------------------------------------------------------------
// Copier
// ---------------------------------------------------------------------------

/// Copies eligible units from `S` to `D`.
///
/// The collaborators are fixed for the lifetime of the copier; use
/// [`Copier::into_parts`] to get them back.
#[derive(Debug)]
pub struct Copier<S, D> {
    source: S,
    destination: D,
    limits: CopyLimits,
}

impl<S: Source, D: Destination> Copier<S, D> {
    pub fn new(source: S, destination: D) -> Self {
        Self {
            source,
            destination,
            limits: CopyLimits::default(),
        }
    }

    /// Bound the streaming operations.
    pub fn with_limits(mut self, limits: CopyLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn limits(&self) -> CopyLimits {
        self.limits
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn destination(&self) -> &D {
        &self.destination
    }

    pub fn into_parts(self) -> (S, D) {
        (self.source, self.destination)
    }

    /// Copy one unit.
    ///
    /// Reads exactly once. Writes the unit unless it is the no-data sentinel
    /// or a newline, in which case nothing is written.
    pub fn copy(&mut self) -> Result<Step, CopyError> {
        let c = self.source.read_one().map_err(CopyError::from_source)?;

        if !is_copyable(c) {
            let reason = if c == NO_DATA {
                StopReason::NoData
            } else {
                StopReason::Newline
            };
            trace!(unit = ?c, ?reason, "unit not copyable");
            return Ok(Step::Stopped(reason));
        }

        self.destination
            .write_one(c)
            .map_err(CopyError::from_destination)?;
        debug!(unit = ?c, "copied unit");
        Ok(Step::Copied(1))
    }

    /// Copy one batch of up to `count` units.
    ///
    /// Reads exactly once with `count` as given. An empty batch or one that
    /// starts with a newline is discarded. Otherwise the units before the
    /// first newline (or the whole batch, when there is none) are written
    /// with a single batch write.
    pub fn copy_multiple(&mut self, count: usize) -> Result<Step, CopyError> {
        let batch = self
            .source
            .read_many(count)
            .map_err(CopyError::from_source)?;

        if !is_batch_copyable(&batch) {
            let reason = if batch.is_empty() {
                StopReason::EmptyBatch
            } else {
                StopReason::Newline
            };
            trace!(requested = count, len = batch.len(), ?reason, "batch not copyable");
            return Ok(Step::Stopped(reason));
        }

        let prefix = until_newline(&batch);
        self.destination
            .write_many(prefix)
            .map_err(CopyError::from_destination)?;

        let written = prefix.len();
        debug!(requested = count, len = batch.len(), written, "copied batch");
        if written < batch.len() {
            Ok(Step::Terminated(written))
        } else {
            Ok(Step::Copied(written))
        }
    }

    /// Repeat [`Copier::copy`] until a step writes nothing.
    pub fn copy_all(&mut self) -> Result<CopySummary, CopyError> {
        let max_steps = self.limits.max_steps;
        self.drive(max_steps, |copier| copier.copy())
    }

    /// Repeat [`Copier::copy_multiple`] until a step writes nothing or hits
    /// a newline.
    ///
    /// A `count` of zero runs a single step.
    pub fn copy_all_multiple(&mut self, count: usize) -> Result<CopySummary, CopyError> {
        let max_steps = if count == 0 {
            Some(self.limits.max_steps.map_or(1, |max| max.min(1)))
        } else {
            self.limits.max_steps
        };
        self.drive(max_steps, |copier| copier.copy_multiple(count))
    }

    fn drive<F>(
        &mut self,
        max_steps: Option<usize>,
        mut next: F,
    ) -> Result<CopySummary, CopyError>
    where
        F: FnMut(&mut Self) -> Result<Step, CopyError>,
    {
        let mut summary = CopySummary {
            steps: 0,
            units: 0,
            reason: StopReason::StepLimit,
        };

        loop {
            if max_steps.is_some_and(|max| summary.steps >= max) {
                summary.reason = StopReason::StepLimit;
                break;
            }

            let step = next(self)?;
            summary.steps += 1;
            summary.units += step.written();

            match step {
                Step::Copied(_) => continue,
                Step::Terminated(_) => {
                    summary.reason = StopReason::Newline;
                    break;
                }
                Step::Stopped(reason) => {
                    summary.reason = reason;
                    break;
                }
            }
        }

        debug!(
            steps = summary.steps,
            units = summary.units,
            reason = ?summary.reason,
            "streaming copy finished"
        );
        Ok(summary)
    }
}
