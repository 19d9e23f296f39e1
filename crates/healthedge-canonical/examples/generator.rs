use healthedge_canonical::{sha256_hex, Canonicalizer};
use serde_json::json;

fn main() {
    let canonicalizer = Canonicalizer::new();
    let reading = json!({
        "identifier": "0b5c4f7e-2f1d-4b7e-9a53-8c7d2d1f6a10",
        "classification": "MEASUREMENT",
        "timestamp": "2025-12-20T00:00:00+00:00",
        "priority": 2,
        "payload": {
            "spo2": 97,
            "heart_rate": 88
        }
    });

    match canonicalizer.canonicalize(&reading) {
        Ok(bytes) => {
            println!("{}", String::from_utf8_lossy(&bytes));
            println!("{}", sha256_hex(&bytes));
        }
        Err(err) => {
            eprintln!("canonicalization failed: {}", err);
            std::process::exit(1);
        }
    }
}
