//! Configuration loader and schema types.
//!
//! This module exposes the settings that tune mark scheduling, flag
//! storage and the reference audio backend, plus helpers to load them.

mod load;
mod schema;

pub use load::load_settings;
pub use schema::*;
