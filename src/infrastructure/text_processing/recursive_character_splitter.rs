use async_trait::async_trait;

use crate::application::ports::{TextSplitter, TextSplitterError};
use crate::domain::{Chunk, Page};

pub const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits on the coarsest separator present, recursing into pieces that are still
/// too long, then greedily merges neighbours back up to `chunk_size` characters
/// with `chunk_overlap` characters carried between consecutive chunks.
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, TextSplitterError> {
        if chunk_size == 0 {
            return Err(TextSplitterError::SplittingFailed(
                "chunk_size must be positive".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(TextSplitterError::SplittingFailed(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }

        Ok(Self {
            chunk_size,
            chunk_overlap,
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        let (separator, remaining) = pick_separator(text, separators);
        let pieces = split_keeping_separator(text, separator);

        let mut chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for piece in pieces {
            if char_len(&piece) < self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge(&pending));
                pending.clear();
            }

            if remaining.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge(&pending));
        }

        chunks
    }

    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut window: std::collections::VecDeque<&str> = std::collections::VecDeque::new();
        let mut total = 0;

        for piece in pieces {
            let len = char_len(piece);
            if total + len > self.chunk_size && !window.is_empty() {
                push_trimmed(&mut chunks, &window);
                while total > self.chunk_overlap
                    || (total + len > self.chunk_size && total > 0)
                {
                    match window.pop_front() {
                        Some(dropped) => total -= char_len(dropped),
                        None => break,
                    }
                }
            }
            window.push_back(piece);
            total += len;
        }

        push_trimmed(&mut chunks, &window);
        chunks
    }
}

fn pick_separator<'a>(text: &str, separators: &'a [String]) -> (&'a str, &'a [String]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() || text.contains(separator.as_str()) {
            return (separator, &separators[i + 1..]);
        }
    }
    ("", &[])
}

/// Splits `text` so that every piece after the first starts with `separator`,
/// which keeps `pieces.concat() == text`.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut pieces = Vec::new();
    let mut start = 0;
    for (idx, _) in text.match_indices(separator).skip_while(|(idx, _)| *idx == 0) {
        pieces.push(text[start..idx].to_string());
        start = idx;
    }
    pieces.push(text[start..].to_string());
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn push_trimmed(chunks: &mut Vec<String>, window: &std::collections::VecDeque<&str>) {
    let joined: String = window.iter().copied().collect();
    let trimmed = joined.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[async_trait]
impl TextSplitter for RecursiveCharacterSplitter {
    async fn split(&self, page: &Page, source: &str) -> Result<Vec<Chunk>, TextSplitterError> {
        let mut chunks = Vec::new();
        let mut search_from = 0;

        for text in self.split_text(&page.text) {
            let byte_offset = page.text[search_from..]
                .find(&text)
                .map(|i| i + search_from)
                .unwrap_or(search_from);
            let offset = char_len(&page.text[..byte_offset]);
            search_from = next_char_boundary(&page.text, byte_offset);

            chunks.push(Chunk::new(
                text,
                Some(page.number),
                offset,
                source.to_string(),
            ));
        }

        Ok(chunks)
    }
}

fn next_char_boundary(text: &str, byte_offset: usize) -> usize {
    text[byte_offset..]
        .chars()
        .next()
        .map(|c| byte_offset + c.len_utf8())
        .unwrap_or(text.len())
}
