//! # sharehub-database
//!
//! PostgreSQL connection management, the [`ShareStore`] abstraction over
//! the `shares` relation, and its two implementations: the Postgres
//! [`ShareRepository`] and the in-process [`MemoryShareStore`].

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use memory::MemoryShareStore;
pub use repositories::ShareRepository;
pub use store::ShareStore;
