//! Deterministic term → shard mapping for the sharded postings lock
//! (spec.md §5, §9). Every node must compute the same shard for the same
//! term, so this uses a fixed, unseeded hash rather than `DefaultHasher`
//! (whose `RandomState` seed differs per process).

/// FNV-1a, 64-bit. Simple, deterministic, and stable across processes —
/// exactly what cross-node shard assignment needs.
fn fnv1a_hash(term: &str) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    let mut hash = OFFSET_BASIS;
    for byte in term.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

/// `nonNegative(hash(term)) mod S`, per spec.md §9.
pub fn shard_for_term(term: &str, shard_count: u32) -> u32 {
    let shard_count = shard_count.max(1) as u64;
    (fnv1a_hash(term) % shard_count) as u32
}

/// Lock name for a given shard id, as spec.md §5 names it.
pub fn shard_lock_name(shard: u32) -> String {
    format!("lock:shard:{shard}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_term_always_maps_to_same_shard() {
        for _ in 0..5 {
            assert_eq!(shard_for_term("alice", 20), shard_for_term("alice", 20));
        }
    }

    #[test]
    fn shard_is_within_bounds() {
        for term in ["alice", "rabbit", "darcy", "prejudice", "war", "peace"] {
            assert!(shard_for_term(term, 20) < 20);
        }
    }

    #[test]
    fn shard_count_of_one_always_picks_shard_zero() {
        assert_eq!(shard_for_term("anything", 1), 0);
    }

    #[test]
    fn lock_name_is_stable() {
        assert_eq!(shard_lock_name(3), "lock:shard:3");
    }
}
