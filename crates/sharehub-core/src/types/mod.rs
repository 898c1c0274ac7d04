//! Core type definitions used across the ShareHub workspace.

pub mod id;
pub mod path;

pub use id::UserId;
