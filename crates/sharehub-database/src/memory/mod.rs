//! In-process store implementations for single-node use and tests.

pub mod share;

pub use share::MemoryShareStore;
