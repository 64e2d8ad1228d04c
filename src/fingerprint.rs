//! Content fingerprints for partial and complete mappings.
//!
//! The matcher memoizes visited search states by content, never by identity:
//! two partial mappings that bind the same pairs in a different order must
//! collide. Pairs are therefore sorted before hashing, and hashing uses
//! domain separation and length prefixing so a state key can never be confused
//! with a mapping fingerprint.
//!
//! # Citations
//! - SHA-256: NIST FIPS 180-4 (2015)
//! - Domain separation & length prefixing: Bernstein et al., "How to hash into elliptic curves" (2009)

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain for memoization keys of partial mappings.
pub const DOMAIN_SEARCH_STATE_V0: &[u8] = b"SEARCH_STATE_V0";

/// Domain for fingerprints of emitted mappings.
pub const DOMAIN_MAPPING_V0: &[u8] = b"MAPPING_V0";

/// A 256-bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Creates a zero hash (all zeros).
    #[inline]
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Computes SHA-256 of `data` with domain separation.
    ///
    /// Hashes `b"STRATUM:<domain>:v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"STRATUM:");
        hasher.update(domain);
        hasher.update(b":v1");
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Hashes two sets of `(guest, host)` index pairs, independent of the order
    /// in which the pairs are supplied.
    ///
    /// Vertex and edge pairs are kept in separate length-prefixed sections so a
    /// vertex binding can never alias an edge binding.
    pub fn of_pairs(
        domain: &[u8],
        vertex_pairs: impl IntoIterator<Item = (u32, u32)>,
        edge_pairs: impl IntoIterator<Item = (u32, u32)>,
    ) -> Self {
        let mut vertices: Vec<(u32, u32)> = vertex_pairs.into_iter().collect();
        let mut edges: Vec<(u32, u32)> = edge_pairs.into_iter().collect();
        vertices.sort_unstable();
        edges.sort_unstable();

        let mut data = Vec::with_capacity(16 + 8 * (vertices.len() + edges.len()));
        for section in [&vertices, &edges] {
            data.extend_from_slice(&(section.len() as u64).to_le_bytes());
            for &(guest, host) in section {
                data.extend_from_slice(&guest.to_le_bytes());
                data.extend_from_slice(&host.to_le_bytes());
            }
        }
        Self::hash_with_domain(domain, &data)
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // First 4 bytes are plenty for logs.
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}
