//! Digest command implementation.

use healthedge_canonical::{sha256_hex, Canonicalizer};

use crate::input;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_json(input)?;

    let bytes = Canonicalizer::new()
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;
    let digest = sha256_hex(&bytes);
    tracing::debug!(bytes = bytes.len(), %digest, "digested input");

    println!("{}", digest);
    Ok(())
}
