//! # Treemap Charts
//!
//! Hierarchy building, squarified treemap layout and rendering for
//! Treemap Explorer.
//!
//! The pipeline is `DatasetFetcher` -> [`Hierarchy`] -> [`Treemap`] ->
//! [`Scene`] -> a [`SceneRenderer`] (SVG document or PNG preview drawn
//! with plotters).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod chart;
pub mod color;
pub mod data_fetcher;
pub mod hierarchy;
pub mod label;
pub mod layout;
pub mod legend;
pub mod preview;
pub mod scene;
pub mod svg;
pub mod tooltip;
pub mod traits;

pub use chart::*;
pub use color::*;
pub use data_fetcher::*;
pub use hierarchy::*;
pub use label::*;
pub use layout::*;
pub use legend::*;
pub use preview::*;
pub use scene::*;
pub use svg::*;
pub use tooltip::*;
pub use traits::*;
