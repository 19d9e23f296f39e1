//! Output formatting utilities.

use serde_json::Value;

/// Formats a value as JSON, pretty or compact.
pub fn format_json(value: &Value, pretty: bool) -> String {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    rendered.unwrap_or_else(|_| "{}".to_string())
}

/// Formats one verification result as a table row.
pub fn format_table_row(identifier: &str, classification: &str, verdict: &str) -> String {
    format!(
        "{:<38} {:<12} {}",
        truncate(identifier, 38),
        truncate(classification, 12),
        verdict
    )
}

/// Prints table header.
#[allow(clippy::print_literal)]
pub fn print_table_header() {
    println!("{:<38} {:<12} {}", "IDENTIFIER", "TYPE", "VERDICT");
    println!("{}", "-".repeat(70));
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_cells_are_truncated() {
        let row = format_table_row(&"x".repeat(50), "MEASUREMENT", "ok");
        assert!(row.starts_with(&format!("{}...", "x".repeat(35))));
        assert!(row.ends_with("ok"));
    }
}
