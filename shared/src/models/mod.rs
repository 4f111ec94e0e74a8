//! Domain models for the Turbo Stock Management Platform

mod inventory;
mod order;

pub use inventory::*;
pub use order::*;
