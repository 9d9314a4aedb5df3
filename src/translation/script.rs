//! Urdu script detection

use std::ops::RangeInclusive;
use std::path::Path;

/// Arabic Unicode block, which hosts the Urdu alphabet
pub const URDU_BLOCK: RangeInclusive<char> = '\u{0600}'..='\u{06FF}';

pub fn is_urdu_char(c: char) -> bool {
    URDU_BLOCK.contains(&c)
}

/// True if any of the first `sample_chars` characters of `text` is Urdu.
pub fn contains_urdu(text: &str, sample_chars: usize) -> bool {
    text.chars().take(sample_chars).any(is_urdu_char)
}

/// True if the file at `path` exists, is readable UTF-8, and starts with Urdu
/// text within its first `sample_chars` characters.
pub fn has_urdu_content(path: &Path, sample_chars: usize) -> bool {
    match std::fs::read_to_string(path) {
        Ok(content) => contains_urdu(&content, sample_chars),
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!("Cannot inspect {}: {}", path.display(), e);
            }
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_detects_urdu() {
        assert!(contains_urdu("---\ntitle: فزیکل اے آئی\n---", 1000));
        assert!(!contains_urdu("---\ntitle: Physical AI\n---", 1000));
    }

    #[test]
    fn test_only_sample_prefix_counts() {
        let text = format!("{}روبوٹ", "a".repeat(600));

        assert!(!contains_urdu(&text, 500));
        assert!(contains_urdu(&text, 1000));
    }

    #[test]
    fn test_block_boundaries() {
        assert!(is_urdu_char('\u{0600}'));
        assert!(is_urdu_char('\u{06FF}'));
        assert!(!is_urdu_char('\u{05FF}'));
        assert!(!is_urdu_char('\u{0700}'));
    }

    #[test]
    fn test_has_urdu_content_reads_file() {
        let dir = TempDir::new().unwrap();
        let urdu = dir.path().join("urdu.md");
        let english = dir.path().join("english.md");
        std::fs::write(&urdu, "# سینسر").unwrap();
        std::fs::write(&english, "# Sensors").unwrap();

        assert!(has_urdu_content(&urdu, 1000));
        assert!(!has_urdu_content(&english, 1000));
        assert!(!has_urdu_content(&dir.path().join("missing.md"), 1000));
    }

    #[test]
    fn test_has_urdu_content_invalid_utf8() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("binary.md");
        std::fs::write(&path, [0xff, 0xfe, 0xfd]).unwrap();

        assert!(!has_urdu_content(&path, 1000));
    }

    proptest! {
        #[test]
        fn ascii_text_is_never_urdu(text in "[ -~\\n]{0,2000}", sample in 0usize..3000) {
            prop_assert!(!contains_urdu(&text, sample));
        }

        #[test]
        fn urdu_found_iff_within_sample(prefix_len in 0usize..1500, sample in 0usize..1500) {
            let text = format!("{}ک", "x".repeat(prefix_len));

            prop_assert_eq!(contains_urdu(&text, sample), prefix_len < sample);
        }
    }
}
