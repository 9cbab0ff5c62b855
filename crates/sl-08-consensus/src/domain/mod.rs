//! # Consensus Domain
//!
//! Protocol messages and error types.

pub mod errors;
pub mod messages;

pub use errors::ConsensusError;
pub use messages::{ConsensusMessage, MessageKind};
