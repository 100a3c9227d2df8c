//! Orphaned object tracking.

pub mod model;

pub use model::OrphanedObject;
