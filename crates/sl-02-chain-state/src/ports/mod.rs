//! # Ports
//!
//! Interfaces this crate requires the host to implement.

pub mod outbound;

pub use outbound::{
    block_key, state_key, BlockStateStore, Clock, FixedClock, ObjectStore, SystemClock,
};
