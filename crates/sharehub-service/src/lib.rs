//! # sharehub-service
//!
//! Share resolution service for ShareHub. [`ShareResolver`] answers
//! "what is the real file behind this path, and may I write it?" for any
//! path in a recipient's namespace, and keeps the sparse set of share
//! records consistent across moves, permission changes, and unshares.
//!
//! Services follow constructor injection: the share store and filesystem
//! capability are provided at construction time via `Arc` references.

pub mod context;
pub mod share;

pub use context::RequestContext;
pub use share::{LinkService, ShareResolver};
