use std::collections::VecDeque;

use anyhow::Result;

use crate::io::{Destination, Source};
use crate::unit::NO_DATA;

/// A source backed by an in-memory queue of units.
///
/// Once drained, `read_one` yields [`NO_DATA`] and `read_many` yields empty
/// batches.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    units: VecDeque<char>,
}

impl MemorySource {
    pub fn new(units: impl IntoIterator<Item = char>) -> Self {
        Self {
            units: units.into_iter().collect(),
        }
    }

    /// Number of units not yet read.
    pub fn remaining(&self) -> usize {
        self.units.len()
    }
}

impl From<&str> for MemorySource {
    fn from(s: &str) -> Self {
        Self::new(s.chars())
    }
}

impl From<Vec<char>> for MemorySource {
    fn from(units: Vec<char>) -> Self {
        Self::new(units)
    }
}

impl Source for MemorySource {
    fn read_one(&mut self) -> Result<char> {
        Ok(self.units.pop_front().unwrap_or(NO_DATA))
    }

    fn read_many(&mut self, count: usize) -> Result<Vec<char>> {
        let n = count.min(self.units.len());
        Ok(self.units.drain(..n).collect())
    }
}

/// A destination that collects everything written into a `String`.
#[derive(Debug, Clone, Default)]
pub struct MemoryDestination {
    buffer: String,
    single_writes: usize,
    batch_writes: usize,
}

impl MemoryDestination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }

    /// Number of `write_one` calls received.
    pub fn single_writes(&self) -> usize {
        self.single_writes
    }

    /// Number of `write_many` calls received.
    pub fn batch_writes(&self) -> usize {
        self.batch_writes
    }
}

impl Destination for MemoryDestination {
    fn write_one(&mut self, c: char) -> Result<()> {
        self.buffer.push(c);
        self.single_writes += 1;
        Ok(())
    }

    fn write_many(&mut self, batch: &[char]) -> Result<()> {
        self.buffer.extend(batch);
        self.batch_writes += 1;
        Ok(())
    }
}
