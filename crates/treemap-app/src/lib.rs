//! # Treemap Explorer
//!
//! Command line front end of the treemap renderer: loads configuration,
//! fetches datasets, drives the explicit application state and writes the
//! rendered pages.
//!
//! State changes go through [`AppState::update`], which returns the effects
//! (fetches, preference writes) the caller has to run. Rendering is
//! [`AppState::view`] followed by a [`treemap_charts::SceneRenderer`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod error;
pub mod logging;
pub mod session;
pub mod state;
pub mod theme_store;

pub use app::*;
pub use error::*;
pub use logging::*;
pub use session::*;
pub use state::*;
pub use theme_store::*;
