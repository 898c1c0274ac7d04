//! # sharehub-storage
//!
//! Implementations of the [`FileSystem`](sharehub_core::traits::FileSystem)
//! capability used to validate share sources: the local disk and an
//! in-memory tree.

pub mod providers;

pub use providers::{LocalFileSystem, MemoryFileSystem};
