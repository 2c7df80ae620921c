//! Recursive character splitter tuned for markdown-ish text.
//!
//! Splitting strategy:
//! 1. Pick the coarsest separator (heading, code fence, rule, blank line,
//!    newline, space, character) that occurs in the text
//! 2. Split on it, keeping the separator at the start of the following piece
//! 3. Merge small pieces up to the character budget, carrying an overlap
//!    between consecutive chunks
//! 4. Recurse into pieces that are still too large with finer separators

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex::Regex;

const SEPARATOR_PATTERNS: &[&str] = &[
    r"\n#{1,6} ",
    r"```\n",
    r"\n\*\*\*+\n",
    r"\n---+\n",
    r"\n___+\n",
    r"\n\n",
    r"\n",
    r" ",
];

static SEPARATORS: LazyLock<Vec<Separator>> = LazyLock::new(|| {
    SEPARATOR_PATTERNS
        .iter()
        .map(|p| Separator::Pattern(Regex::new(p).expect("separator patterns are valid")))
        .chain(std::iter::once(Separator::Char))
        .collect()
});

enum Separator {
    Pattern(Regex),
    /// Split between every character.
    Char,
}

impl Separator {
    fn occurs_in(&self, text: &str) -> bool {
        match self {
            Separator::Pattern(re) => re.is_match(text),
            Separator::Char => true,
        }
    }

    /// Split `text`, attaching each separator match to the piece after it.
    fn split<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let cuts: Vec<usize> = match self {
            Separator::Pattern(re) => re.find_iter(text).map(|m| m.start()).collect(),
            Separator::Char => text.char_indices().map(|(i, _)| i).collect(),
        };

        let mut pieces = Vec::with_capacity(cuts.len() + 1);
        let mut prev = 0;
        for cut in cuts {
            pieces.push(&text[prev..cut]);
            prev = cut;
        }
        pieces.push(&text[prev..]);
        pieces.retain(|p| !p.is_empty());
        pieces
    }
}

/// Splits text into chunks of at most `chunk_size` characters with
/// `chunk_overlap` characters shared between neighbours.
#[derive(Debug, Clone, Copy)]
pub struct MarkdownSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl MarkdownSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
    }

    fn split_recursive(&self, text: &str, separators: &[Separator]) -> Vec<String> {
        let Some(chosen) = separators.iter().position(|s| s.occurs_in(text)) else {
            return Vec::new();
        };
        let finer = &separators[chosen + 1..];

        let mut chunks = Vec::new();
        let mut small: Vec<&str> = Vec::new();

        for piece in separators[chosen].split(text) {
            if char_len(piece) < self.chunk_size {
                small.push(piece);
                continue;
            }

            if !small.is_empty() {
                chunks.extend(self.merge_pieces(&small));
                small.clear();
            }
            if finer.is_empty() {
                chunks.push(piece.to_string());
            } else {
                chunks.extend(self.split_recursive(piece, finer));
            }
        }

        if !small.is_empty() {
            chunks.extend(self.merge_pieces(&small));
        }

        chunks
    }

    fn merge_pieces(&self, pieces: &[&str]) -> Vec<String> {
        let mut merged = Vec::new();
        let mut window: VecDeque<&str> = VecDeque::new();
        let mut total = 0usize;

        for &piece in pieces {
            let len = char_len(piece);

            if total + len > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_trimmed(&window) {
                    merged.push(chunk);
                }
                // Keep at most `chunk_overlap` chars as the head of the next chunk
                while total > self.chunk_overlap || (total + len > self.chunk_size && total > 0) {
                    match window.pop_front() {
                        Some(front) => total -= char_len(front),
                        None => break,
                    }
                }
            }

            window.push_back(piece);
            total += len;
        }

        if let Some(chunk) = join_trimmed(&window) {
            merged.push(chunk);
        }

        merged
    }
}

fn join_trimmed(window: &VecDeque<&str>) -> Option<String> {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}
