//! # Selection Algorithms

pub mod selection;

pub use selection::{fnv1a32, select_node};
