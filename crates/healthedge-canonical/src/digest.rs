use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest as Sha2Digest, Sha256};

use std::fmt;
use std::sync::OnceLock;

use crate::canonicalizer::{CanonicalizationError, Canonicalizer};
use crate::validation::ValidationError;

/// Length of a hex-encoded SHA-256 digest.
pub const HEX_DIGEST_LEN: usize = 64;

fn hex_digest_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9a-f]{64}$").expect("invalid regex"))
}

/// Lowercase hex SHA-256 digest (always 64 characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexDigest(String);

impl HexDigest {
    /// Parses a validated digest string.
    pub fn parse(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if !hex_digest_pattern().is_match(&value) {
            return Err(ValidationError::PatternMismatch {
                field: "digest",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the digest as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for HexDigest {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<HexDigest> for String {
    fn from(value: HexDigest) -> Self {
        value.0
    }
}

impl AsRef<str> for HexDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HexDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Hashes raw bytes with SHA-256 and returns the lowercase hex digest.
///
/// ```rust
/// use healthedge_canonical::sha256_hex;
///
/// let digest = sha256_hex(b"abc");
/// assert_eq!(
///     digest.as_str(),
///     "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
/// );
/// ```
pub fn sha256_hex(raw: &[u8]) -> HexDigest {
    let hash_bytes = Sha256::digest(raw);
    HexDigest(hex::encode(hash_bytes))
}

/// Canonicalizes a mapping and hashes the resulting bytes.
///
/// Insertion order of the mapping does not affect the result.
///
/// ```rust
/// use healthedge_canonical::digest_of_mapping;
/// use serde_json::json;
///
/// let a = json!({"a": 1, "b": 2});
/// let b = json!({"b": 2, "a": 1});
/// assert_eq!(
///     digest_of_mapping(a.as_object().unwrap())?,
///     digest_of_mapping(b.as_object().unwrap())?,
/// );
/// # Ok::<(), healthedge_canonical::CanonicalizationError>(())
/// ```
///
/// # Errors
///
/// Returns [`CanonicalizationError`] if any value in the mapping cannot be
/// represented in the canonical encoding.
pub fn digest_of_mapping(map: &Map<String, Value>) -> Result<HexDigest, CanonicalizationError> {
    let bytes = Canonicalizer::new().canonicalize_map(map)?;
    Ok(sha256_hex(&bytes))
}
