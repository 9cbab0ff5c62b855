//! # Runtime Adapters
//!
//! Production implementations of ports the subsystem crates declare.

pub mod proposer;
pub mod storage;

pub use proposer::ServiceProposer;
pub use storage::RocksDbStore;
