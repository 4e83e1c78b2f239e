//! Business logic services for the application layer.

pub mod auth_service;
pub mod click_recorder;
pub mod link_registry;

pub use auth_service::AuthService;
pub use click_recorder::ClickRecorder;
pub use link_registry::LinkRegistry;
