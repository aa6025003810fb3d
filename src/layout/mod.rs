//! Layout module orchestrator.
//!
//! Downstream code imports layout types from here while the implementation
//! details live in the private `core` and `placement` modules.

mod core;
mod placement;

pub use core::{BoardLayout, ChartPayload, GeometryUpdate, GridItem, ItemId, NewChart};
pub use placement::find_free_position;
