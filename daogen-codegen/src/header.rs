//! The export origin header.
//!
//! Exported output opens with a fixed recognizable line naming the model
//! document it was generated from, so a later run can find its way back to
//! the source model.

/// Fixed prefix of the origin line; everything after it is the path.
pub const EXPORT_PREFIX: &str = "// Made with daogen. Exported from ";

/// Render the origin line for output exported from `path`.
pub fn export_header(path: &str) -> String {
    format!("{}{}", EXPORT_PREFIX, path)
}

/// Recover the origin path from exported output, if its first line carries
/// the header.
pub fn exported_from(content: &str) -> Option<&str> {
    content
        .lines()
        .next()?
        .strip_prefix(EXPORT_PREFIX)
        .map(str::trim)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_round_trips() {
        let header = export_header("models/shop.json");
        let content = format!("{}\n\npackage com.example\n", header);
        assert_eq!(exported_from(&content), Some("models/shop.json"));
    }

    #[test]
    fn test_unheadered_content_yields_nothing() {
        assert_eq!(exported_from("package com.example\n"), None);
        assert_eq!(exported_from(""), None);
    }
}
