//! # sharehub-entity
//!
//! Domain entity models for ShareHub. [`share::ShareRecord`] is the row
//! stored in the `shares` table; the remaining types are value objects
//! returned by the share resolver.

pub mod share;
