//! Video metadata repositories
//!
//! The upload pipeline only needs three primitives from the metadata store: fetch a
//! record, write a record back, and create one. They live on the [`VideoStore`] trait,
//! implemented by PostgreSQL ([`PgVideoStore`]) and by an in-process map
//! ([`InMemoryVideoStore`]) used when no database is configured and in tests.

pub mod memory;
pub mod video;

pub use memory::InMemoryVideoStore;
pub use video::{run_migrations, PgVideoStore, VideoStore};
