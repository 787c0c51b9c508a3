//! Character copier: pulls units from a [`Source`] and pushes the eligible
//! ones to a [`Destination`], stopping at a newline or the no-data sentinel.
//!
//! ```text
//! Source --read_one / read_many(count)--> Copier --write_one / write_many--> Destination
//! ```

pub mod adapters;
pub mod copier;
pub mod io;
pub mod unit;

pub use adapters::{MemoryDestination, MemorySource, ReaderSource, WriterDestination};
pub use copier::{Copier, CopyError, CopyLimits, CopySummary, Step, StopReason};
pub use io::{Destination, Source};
pub use unit::{NEWLINE, NO_DATA};
