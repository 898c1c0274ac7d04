//! Repository implementations backed by PostgreSQL.

pub mod share;

pub use share::ShareRepository;
