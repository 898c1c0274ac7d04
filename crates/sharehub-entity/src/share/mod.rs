//! Share domain entities.

pub mod link;
pub mod model;

pub use link::PublicLink;
pub use model::{NestedShare, NewShareRecord, OwnedShare, ResolvedShare, ShareOutcome, ShareRecord};
