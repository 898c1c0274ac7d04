//! Share management: create, resolve, propagate, and remove shares.

pub mod link;
pub mod resolver;

pub use link::LinkService;
pub use resolver::ShareResolver;
