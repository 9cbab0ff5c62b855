//! # Shard Selection
//!
//! Stable hash-based mapping from request key to validator id.
//!
//! FNV-1a (32-bit) is implemented here rather than pulled from a crate: the
//! ecosystem `fnv` hasher fixes the 64-bit variant, and this mapping is a
//! wire-level contract on the 32-bit one.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a 32-bit over the key's UTF-8 bytes.
pub fn fnv1a32(key: &str) -> u32 {
    let mut hash = FNV_OFFSET_BASIS;
    for byte in key.as_bytes() {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

/// Deterministically choose a node identifier for the provided key.
///
/// Returns an empty string iff `nodes` is empty; the first node when there
/// is only one or the key is empty; otherwise `nodes[fnv1a32(key) % len]`.
pub fn select_node(nodes: &[String], key: &str) -> String {
    if nodes.is_empty() {
        return String::new();
    }

    if nodes.len() == 1 || key.is_empty() {
        return nodes[0].clone();
    }

    let index = fnv1a32(key) as usize % nodes.len();
    nodes[index].clone()
}
