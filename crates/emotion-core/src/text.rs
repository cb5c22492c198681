//! Text normalization applied to request input before inference

/// Collapse runs of whitespace into single spaces and trim the ends.
///
/// `None` (a missing or non-string value upstream) becomes the empty string.
pub fn preprocess_text(text: Option<&str>) -> String {
    match text {
        Some(text) => text.split_whitespace().collect::<Vec<_>>().join(" "),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            preprocess_text(Some("  I am\tso \n\n happy  ")),
            "I am so happy"
        );
    }

    #[test]
    fn test_missing_and_blank() {
        assert_eq!(preprocess_text(None), "");
        assert_eq!(preprocess_text(Some("")), "");
        assert_eq!(preprocess_text(Some(" \t\n")), "");
    }

    #[test]
    fn test_preserves_inner_punctuation() {
        assert_eq!(
            preprocess_text(Some("You do right,  if you don't care!")),
            "You do right, if you don't care!"
        );
    }
}
