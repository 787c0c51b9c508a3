//! Concrete sources and destinations.
//!
//! - [`memory`]: in-memory buffers, for tests and embedding.
//! - [`stream`]: UTF-8 adapters over `std::io::BufRead` / `std::io::Write`.

pub mod memory;
pub mod stream;

pub use memory::{MemoryDestination, MemorySource};
pub use stream::{ReaderSource, WriterDestination};
