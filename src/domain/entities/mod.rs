//! Core domain entities.
//!
//! # Entity Types
//!
//! - [`SlugRecord`] - One slot of the fixed slug pool, free or assigned to a target URL
//! - [`Click`] - A recorded visit to an assigned slug
//! - [`PoolStatus`] - Occupancy summary of the pool
//!
//! `NewClick` is the creation-side counterpart of [`Click`]. Slug records have no creation
//! type: they only come into existence when the pool is seeded.

pub mod click;
pub mod slug;

pub use click::{Click, NewClick, UNKNOWN_ORIGIN};
pub use slug::{PoolStatus, SlugRecord};
