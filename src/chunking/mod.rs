//! Document chunking: markdown-aware recursive splitting with overlap.

pub mod markdown;

use uuid::Uuid;

use crate::models::{Chunk, Document};
pub use markdown::MarkdownSplitter;

/// Split every document into chunks, recording each chunk's char offset in
/// its source document.
pub fn split_documents(splitter: &MarkdownSplitter, documents: &[Document]) -> Vec<Chunk> {
    let mut chunks = Vec::new();

    for doc in documents {
        let mut start = 0usize;
        let mut prev_len = 0usize;

        for content in splitter.split_text(&doc.content) {
            let search_from = (start + prev_len).saturating_sub(splitter.chunk_overlap());
            start = find_from(&doc.content, &content, search_from).unwrap_or(search_from);
            prev_len = markdown::char_len(&content);

            chunks.push(Chunk {
                id: Uuid::new_v4(),
                source: doc.source.clone(),
                start_index: start,
                content,
            });
        }
    }

    tracing::info!("Split into {} chunks.", chunks.len());
    chunks
}

/// Char offset of `needle` in `haystack`, searching from char offset `from`.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<usize> {
    let byte_from = haystack
        .char_indices()
        .nth(from)
        .map(|(i, _)| i)
        .unwrap_or(haystack.len());
    let rest = &haystack[byte_from..];
    rest.find(needle)
        .map(|pos| from + rest[..pos].chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(source: &str, content: &str) -> Document {
        Document {
            source: source.into(),
            content: content.into(),
        }
    }

    #[test]
    fn test_split_documents_records_start_index() {
        let splitter = MarkdownSplitter::new(10, 5);
        let chunks = split_documents(&splitter, &[doc("./data/a.txt", "aaaa bbbb cccc dddd")]);
        let starts: Vec<usize> = chunks.iter().map(|c| c.start_index).collect();
        assert_eq!(starts, vec![0, 5, 10]);
    }

    #[test]
    fn test_split_documents_keeps_source_per_chunk() {
        let splitter = MarkdownSplitter::new(600, 175);
        let chunks = split_documents(
            &splitter,
            &[doc("./data/a.txt", "first doc"), doc("./data/b.txt", "second doc")],
        );
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].source, "./data/a.txt");
        assert_eq!(chunks[1].source, "./data/b.txt");
        assert_ne!(chunks[0].id, chunks[1].id);
    }

    #[test]
    fn test_split_documents_skips_blank_documents() {
        let splitter = MarkdownSplitter::new(600, 175);
        let chunks = split_documents(&splitter, &[doc("./data/empty.txt", "  \n ")]);
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_find_from_counts_chars() {
        assert_eq!(find_from("ééab", "ab", 0), Some(2));
        assert_eq!(find_from("abab", "ab", 1), Some(2));
        assert_eq!(find_from("abc", "zz", 0), None);
        assert_eq!(find_from("abc", "a", 10), None);
    }

    #[test]
    fn test_start_index_after_leading_whitespace() {
        let splitter = MarkdownSplitter::new(600, 175);
        let chunks = split_documents(&splitter, &[doc("./data/a.txt", "\n\n  Intro text")]);
        assert_eq!(chunks[0].content, "Intro text");
        assert_eq!(chunks[0].start_index, 4);
    }
}
