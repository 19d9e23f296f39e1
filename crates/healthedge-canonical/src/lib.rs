//! Canonical encoding and content digests for HealthEdge events.
//!
//! Every byte that feeds an event's integrity hash is produced here:
//! JSON values are encoded per RFC 8785 (sorted keys, no whitespace, raw
//! UTF-8) and the resulting bytes are hashed with SHA-256.
//!
#![deny(missing_docs)]

/// Canonicalization helpers for deterministic hashing.
pub mod canonicalizer;
/// SHA-256 digest primitives.
pub mod digest;
/// Validation helpers used by canonical types.
pub mod validation;

pub use canonicalizer::{CanonicalizationError, Canonicalizer};
pub use digest::{digest_of_mapping, sha256_hex, HexDigest, HEX_DIGEST_LEN};
pub use validation::ValidationError;
