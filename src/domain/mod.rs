//! Domain layer containing business entities and store contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Slug records, clicks and pool occupancy
//! - [`errors`] - Registry error taxonomy
//! - [`repositories`] - Store trait definitions
//! - [`slug_pool`] - Deterministic generator for the fixed slug universe
//!
//! The domain layer has no dependency on the HTTP or infrastructure layers. Allocation
//! policy lives in [`crate::application::services::LinkRegistry`].

pub mod entities;
pub mod errors;
pub mod repositories;
pub mod slug_pool;
