/// Telegram rejects messages longer than 4096 characters; readings are sent
/// in slices with the same margin the original service used.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Splits `text` into chunks of at most `max_chars` characters, never
/// cutting inside a code point.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<String> {
    debug_assert!(max_chars > 0, "chunk size must be positive");

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;

    for ch in text.chars() {
        if count == max_chars {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_one_chunk() {
        assert_eq!(chunk_text("hello", 10), vec!["hello"]);
    }

    #[test]
    fn test_empty_text_has_no_chunks() {
        assert!(chunk_text("", 10).is_empty());
    }

    #[test]
    fn test_chunks_respect_char_limit() {
        let text = "a".repeat(25);
        let chunks = chunk_text(&text, 10);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(chunks[2].len(), 5);
    }

    #[test]
    fn test_multibyte_text_splits_on_char_boundaries() {
        let text = "🔮".repeat(7);
        let chunks = chunk_text(&text, 3);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 3);
        assert_eq!(chunks.concat(), text);
    }
}
