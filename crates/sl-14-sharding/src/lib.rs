//! # SL-14 Sharding - Request-to-Validator Binding
//!
//! Deterministically maps a request key to the validator that should propose
//! it, and wraps that selection in the facade request handlers call.
//!
//! ## Purpose
//!
//! Clients do not choose validators. The shard selector pins each request
//! key to one node so retries land on the same proposer, and the facade
//! walks the remaining nodes when the chosen one is unreachable.
//!
//! ## Compatibility
//!
//! The hash function is FNV-1a 32-bit over the key's UTF-8 bytes. Live
//! clusters depend on every node computing the same mapping; changing the
//! function or its parameters is a compatibility break.
//!
//! ## Module Structure
//!
//! ```text
//! sl-14-sharding/
//! ├── algorithms/  # fnv1a32 + select_node
//! └── proposer.rs  # ShardedProposer facade + ProposerGateway port
//! ```

pub mod algorithms;
pub mod proposer;

pub use algorithms::{fnv1a32, select_node};
pub use proposer::{ProposeError, ProposerGateway, ShardedProposer};
