//! Canonicalize command implementation.

use healthedge_canonical::Canonicalizer;

use crate::input;

pub fn run(input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = input::read_json(input)?;

    let bytes = Canonicalizer::new()
        .canonicalize(&value)
        .map_err(|e| format!("Canonicalization failed: {}", e))?;
    tracing::debug!(bytes = bytes.len(), "canonicalized input");

    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}
