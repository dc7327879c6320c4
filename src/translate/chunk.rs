//! Paragraph-aware chunking for long text and ordered, concurrent reassembly.

use super::backend::Translate;
use futures::stream::{self, StreamExt};
use tracing::debug;

const PARAGRAPH_BREAK: &str = "\n\n";

/// A piece of the source text plus the separator that preceded it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// `""` for the first chunk, a paragraph break between paragraphs, a
    /// space when one paragraph had to be split.
    pub joiner: &'static str,
}

/// Split on blank lines and pack whole paragraphs into chunks of at most
/// `max_chars` characters. A paragraph longer than that is split on
/// whitespace, and a single overlong word is cut hard.
pub fn split_into_chunks(text: &str, max_chars: usize) -> Vec<Chunk> {
    let max_chars = max_chars.max(1);
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;
    let mut current_joiner: &'static str = "";
    let mut pending_joiner: &'static str = "";

    let paragraphs = text
        .split(PARAGRAPH_BREAK)
        .map(str::trim)
        .filter(|p| !p.is_empty());

    for para in paragraphs {
        let para_len = para.chars().count();
        let sep_len = if current.is_empty() { 0 } else { PARAGRAPH_BREAK.len() };

        if current_len + sep_len + para_len <= max_chars {
            if current.is_empty() {
                current_joiner = pending_joiner;
            } else {
                current.push_str(PARAGRAPH_BREAK);
            }
            current.push_str(para);
            current_len += sep_len + para_len;
            pending_joiner = PARAGRAPH_BREAK;
            continue;
        }

        if !current.is_empty() {
            chunks.push(Chunk {
                text: std::mem::take(&mut current),
                joiner: current_joiner,
            });
            current_len = 0;
        }

        if para_len <= max_chars {
            current.push_str(para);
            current_len = para_len;
            current_joiner = if chunks.is_empty() { "" } else { PARAGRAPH_BREAK };
        } else {
            for (i, piece) in split_paragraph(para, max_chars).into_iter().enumerate() {
                let joiner = match (i, chunks.is_empty()) {
                    (0, true) => "",
                    (0, false) => PARAGRAPH_BREAK,
                    _ => " ",
                };
                chunks.push(Chunk { text: piece, joiner });
            }
        }
        pending_joiner = PARAGRAPH_BREAK;
    }

    if !current.is_empty() {
        chunks.push(Chunk {
            text: current,
            joiner: current_joiner,
        });
    }
    chunks
}

fn split_paragraph(para: &str, max_chars: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in para.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            pieces.extend(chars.chunks(max_chars).map(|c| c.iter().collect::<String>()));
            continue;
        }
        let sep = usize::from(!current.is_empty());
        if current_len + sep + word_len > max_chars {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Stitch chunks back together with their original separators.
pub fn reassemble<S: AsRef<str>>(chunks: &[Chunk], texts: &[S]) -> String {
    let mut out = String::new();
    for (chunk, text) in chunks.iter().zip(texts) {
        out.push_str(chunk.joiner);
        out.push_str(text.as_ref());
    }
    out
}

/// Result of a chunked translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkedTranslation {
    pub text: String,
    pub chunks: usize,
    /// Chunks left in the source language because their call failed.
    pub failed: usize,
}

/// Translate chunks with at most `workers` calls in flight.
///
/// Output order always follows input order; `buffered` yields results in
/// submission order even when later chunks finish first. A failed chunk keeps
/// its source text.
pub async fn translate_chunks<T: Translate>(
    backend: &T,
    chunks: &[Chunk],
    source_lang: &str,
    workers: usize,
) -> ChunkedTranslation {
    let results: Vec<(String, bool)> = stream::iter(chunks.iter().enumerate())
        .map(|(idx, chunk)| async move {
            match backend.translate(&chunk.text, source_lang).await {
                Ok(text) => (text, true),
                Err(e) => {
                    debug!(chunk = idx, error = %e, "chunk translation failed; keeping source text");
                    (chunk.text.clone(), false)
                }
            }
        })
        .buffered(workers.max(1))
        .collect()
        .await;

    let failed = results.iter().filter(|(_, ok)| !ok).count();
    let texts: Vec<&str> = results.iter().map(|(t, _)| t.as_str()).collect();
    ChunkedTranslation {
        text: reassemble(chunks, &texts),
        chunks: chunks.len(),
        failed,
    }
}
