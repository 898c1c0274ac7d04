//! Core traits defined in `sharehub-core` and implemented by other crates.

pub mod filesystem;

pub use filesystem::FileSystem;
