//! Layout persistence orchestrator.
//!
//! The wire document and the store implementations live in the private
//! `core` module; collaborators import the trait and concrete stores from
//! here.

mod core;

pub use core::{JsonFileStore, LayoutStore, MemoryStore, StoreError, StoreResult, decode, encode};
