//! Reading JSON documents from files or stdin.

use serde_json::Value;
use std::io::{self, Read};
use thiserror::Error;

/// Failures while loading command input.
#[derive(Debug, Error)]
pub enum InputError {
    /// The file could not be read.
    #[error("Failed to read file {path}: {source}")]
    File {
        /// Path given on the command line.
        path: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// Standard input could not be read.
    #[error("Failed to read stdin: {0}")]
    Stdin(#[from] io::Error),
    /// The text is not JSON.
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads the whole input from `path`, or from stdin when no path is given.
pub fn read_text(path: Option<String>) -> Result<String, InputError> {
    match path {
        Some(path) => {
            std::fs::read_to_string(&path).map_err(|source| InputError::File { path, source })
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

/// Reads and parses a single JSON document.
pub fn read_json(path: Option<String>) -> Result<Value, InputError> {
    let text = read_text(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Splits input into event documents.
///
/// Accepts a single object, an array of objects, or one JSON document per line.
pub fn parse_documents(text: &str) -> Result<Vec<Value>, InputError> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(value) => Ok(vec![value]),
        Err(whole_err) => {
            let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
            if lines.len() < 2 {
                return Err(whole_err.into());
            }
            lines
                .into_iter()
                .map(|line| serde_json::from_str(line).map_err(InputError::from))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_single_array_and_lines() {
        assert_eq!(parse_documents(r#"{"a":1}"#).unwrap(), vec![json!({"a": 1})]);
        assert_eq!(
            parse_documents(r#"[{"a":1},{"a":2}]"#).unwrap(),
            vec![json!({"a": 1}), json!({"a": 2})]
        );
        assert_eq!(
            parse_documents("{\"a\":1}\n\n{\"a\":2}\n").unwrap(),
            vec![json!({"a": 1}), json!({"a": 2})]
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_documents("{not json"), Err(InputError::Json(_))));
        assert!(parse_documents("{\"a\":1}\nnope").is_err());
    }
}
