//! Store and repository trait definitions for the domain layer.
//!
//! These traits abstract the persistence store. Concrete implementations live in
//! `crate::infrastructure::persistence`.
//!
//! # Available Traits
//!
//! - [`SlugStore`] / [`SlugTransaction`] - Slug pool reads and transactional mutations
//! - [`ClickRepository`] - Click recording and retrieval
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod click_repository;
pub mod slug_store;

pub use click_repository::ClickRepository;
pub use slug_store::{SlugStore, SlugTransaction};

#[cfg(test)]
pub use click_repository::MockClickRepository;
