//! Shared types and domain logic for the Turbo Stock Management Platform
//!
//! This crate contains the wire models exchanged with the inventory backend,
//! the normalizer that reshapes backend lots into flat display rows, and the
//! form validation rules shared by every front end.

pub mod models;
pub mod normalize;
pub mod validation;

pub use models::*;
pub use normalize::*;
pub use validation::*;
