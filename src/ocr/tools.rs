//! External tool discovery.

/// Check if a binary is available in PATH.
pub fn check_binary(name: &str) -> bool {
    which::which(name).is_ok()
}

/// Availability of every external tool the OCR fallback shells out to.
pub fn check_tools() -> Vec<(String, bool)> {
    ["pdftoppm", "tesseract"]
        .iter()
        .map(|tool| (tool.to_string(), check_binary(tool)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_tools() {
        let tools = check_tools();
        assert_eq!(tools.len(), 2);
        for (tool, available) in tools {
            println!("{}: {}", tool, if available { "found" } else { "missing" });
        }
    }

    #[test]
    fn test_missing_binary() {
        assert!(!check_binary("definitely-not-a-real-binary-name"));
    }
}
