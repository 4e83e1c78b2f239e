//! Utility functions shared by the HTTP layer and the stores.
//!
//! - [`client_origin`] - Caller address extraction for click records
//! - [`db_error`] - SQLx error classification
//! - [`url`] - Target URL acceptance checks

pub mod client_origin;
pub mod db_error;
pub mod url;
