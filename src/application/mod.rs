//! Application layer services implementing the link registry's business rules.
//!
//! Services consume the store traits from [`crate::domain::repositories`] and expose an
//! API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_registry::LinkRegistry`] - Slug assignment, lookup and release
//! - [`services::click_recorder::ClickRecorder`] - Click tracking and history
//! - [`services::auth_service::AuthService`] - Static API token authentication

pub mod services;
