//! # sharehub-core
//!
//! Core crate for ShareHub. Contains the unified error system,
//! configuration schemas, typed user identifiers, share path helpers,
//! and the filesystem capability trait consumed by the share resolver.
//!
//! This crate has **no** internal dependencies on other ShareHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod traits;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
