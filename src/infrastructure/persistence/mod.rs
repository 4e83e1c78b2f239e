//! Store implementations.
//!
//! # Stores
//!
//! - [`PgSlugStore`] - Slug pool on PostgreSQL, transactional mutations with row locks
//! - [`PgClickRepository`] - Click log on PostgreSQL
//! - [`MemoryStore`] - Both contracts in process memory, for tests and local demos

pub mod memory_store;
pub mod pg_click_repository;
pub mod pg_slug_store;

pub use memory_store::MemoryStore;
pub use pg_click_repository::PgClickRepository;
pub use pg_slug_store::PgSlugStore;
