//! Shared test doubles for copier integration tests.
//!
//! [`ScriptedSource`] plays back scripted reads and records every call;
//! [`RecordingDestination`] records every write. Both are cheap handles over
//! shared state: clone one, move the clone into a `Copier`, and keep
//! inspecting the original.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::{Result, bail};

use copier_core::{Destination, NO_DATA, Source};

/// A call made on a [`ScriptedSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadCall {
    One,
    Many(usize),
}

/// A call made on a [`RecordingDestination`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    One(char),
    Many(Vec<char>),
}

#[derive(Debug, Default)]
struct SourceState {
    ones: VecDeque<char>,
    batches: VecDeque<Vec<char>>,
    failure: Option<String>,
    calls: Vec<ReadCall>,
}

/// A source that returns scripted values in order.
///
/// When a script runs out, `read_one` returns [`NO_DATA`] and `read_many`
/// returns an empty batch. Batches are returned exactly as scripted,
/// regardless of the requested count.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    state: Rc<RefCell<SourceState>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A source whose next `read_one` returns `c`.
    pub fn returning_one(c: char) -> Self {
        let source = Self::new();
        source.push_one(c);
        source
    }

    /// A source whose next `read_many` returns `batch`.
    pub fn returning_many(batch: &[char]) -> Self {
        let source = Self::new();
        source.push_many(batch);
        source
    }

    pub fn push_one(&self, c: char) {
        self.state.borrow_mut().ones.push_back(c);
    }

    pub fn push_many(&self, batch: &[char]) {
        self.state.borrow_mut().batches.push_back(batch.to_vec());
    }

    /// Make every subsequent read fail with `message`.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.state.borrow_mut().failure = Some(message.into());
    }

    /// All calls received so far, in order.
    pub fn calls(&self) -> Vec<ReadCall> {
        self.state.borrow().calls.clone()
    }

    pub fn received(&self, call: &ReadCall) -> usize {
        self.state.borrow().calls.iter().filter(|c| *c == call).count()
    }
}

impl Source for ScriptedSource {
    fn read_one(&mut self) -> Result<char> {
        let mut state = self.state.borrow_mut();
        state.calls.push(ReadCall::One);
        if let Some(message) = &state.failure {
            bail!("{message}");
        }
        Ok(state.ones.pop_front().unwrap_or(NO_DATA))
    }

    fn read_many(&mut self, count: usize) -> Result<Vec<char>> {
        let mut state = self.state.borrow_mut();
        state.calls.push(ReadCall::Many(count));
        if let Some(message) = &state.failure {
            bail!("{message}");
        }
        Ok(state.batches.pop_front().unwrap_or_default())
    }
}

#[derive(Debug, Default)]
struct DestinationState {
    failure: Option<String>,
    calls: Vec<WriteCall>,
}

/// A destination that records every write.
#[derive(Debug, Clone, Default)]
pub struct RecordingDestination {
    state: Rc<RefCell<DestinationState>>,
}

impl RecordingDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with `message`. Failed writes are
    /// still recorded.
    pub fn fail_with(&self, message: impl Into<String>) {
        self.state.borrow_mut().failure = Some(message.into());
    }

    pub fn calls(&self) -> Vec<WriteCall> {
        self.state.borrow().calls.clone()
    }

    /// Whether no write of any kind was received.
    pub fn received_nothing(&self) -> bool {
        self.state.borrow().calls.is_empty()
    }

    /// Everything written, concatenated in call order.
    pub fn written(&self) -> String {
        let state = self.state.borrow();
        let mut out = String::new();
        for call in &state.calls {
            match call {
                WriteCall::One(c) => out.push(*c),
                WriteCall::Many(batch) => out.extend(batch),
            }
        }
        out
    }
}

impl Destination for RecordingDestination {
    fn write_one(&mut self, c: char) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(WriteCall::One(c));
        if let Some(message) = &state.failure {
            bail!("{message}");
        }
        Ok(())
    }

    fn write_many(&mut self, batch: &[char]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(WriteCall::Many(batch.to_vec()));
        if let Some(message) = &state.failure {
            bail!("{message}");
        }
        Ok(())
    }
}
