//! # Treemap Common
//!
//! Shared types, errors, and text utilities for Treemap Explorer.
//!
//! This crate provides the foundational types used across
//! all other crates in the Treemap Explorer workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use types::*;
pub use utils::*;
