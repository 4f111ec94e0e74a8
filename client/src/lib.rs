//! Turbo Stock Management - dashboard client
//!
//! Headless client for the turbo inventory backend: session handling, the
//! REST client, the dashboard controller and the purchase-order composer.
//! The terminal front end lives in the `pts-dashboard` binary.

pub mod api;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod notify;
pub mod orders;
pub mod session;

pub use config::Config;
pub use error::{AppError, AppResult};
