//! Keyword retrieval over the official provision notes.
//!
//! The provision file is plain markdown, chunked at `## ` headings. A chunk
//! scores one point per distinct query token its text contains, matched
//! case-insensitively; ties keep document order. The top chunks back the
//! `explain` answers.

use std::collections::BTreeSet;

use serde::Serialize;

/// How many chunks an explanation draws on by default.
pub const DEFAULT_TOP_K: usize = 5;

/// One `## ` section of the provision notes, heading line included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub title: String,
    pub content: String,
}

/// Chunked provision notes plus the original text for fallback.
#[derive(Debug, Clone)]
pub struct ProvisionLibrary {
    chunks: Vec<Chunk>,
    full_text: String,
}

impl ProvisionLibrary {
    /// Chunks a markdown document at lines opening a `## ` section. Text
    /// before the first heading becomes its own chunk.
    pub fn from_markdown(text: &str) -> Self {
        let mut sections: Vec<Vec<&str>> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        for line in text.lines() {
            if is_section_heading(line) && !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
            current.push(line);
        }
        if !current.is_empty() {
            sections.push(current);
        }

        let chunks = sections
            .into_iter()
            .filter_map(|lines| {
                let content = lines.join("\n").trim().to_string();
                if content.is_empty() {
                    return None;
                }
                let title = content
                    .lines()
                    .next()
                    .unwrap_or("")
                    .trim_start_matches('#')
                    .trim()
                    .to_string();
                Some(Chunk { title, content })
            })
            .collect();

        Self {
            chunks,
            full_text: text.trim().to_string(),
        }
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    /// The `top_k` chunks scoring highest for the query.
    ///
    /// Single-character tokens are ignored. Chunks scoring zero still rank,
    /// in document order, so a vague query returns the opening sections
    /// rather than nothing.
    pub fn retrieve(&self, query: &str, top_k: usize) -> Vec<&Chunk> {
        let lowered = query.to_lowercase();
        let tokens: BTreeSet<String> = lowered
            .split_whitespace()
            .filter(|token| token.chars().count() > 1)
            .map(str::to_string)
            .collect();

        let mut scored: Vec<(usize, &Chunk)> = self
            .chunks
            .iter()
            .map(|chunk| {
                let content = chunk.content.to_lowercase();
                let score = tokens
                    .iter()
                    .filter(|token| content.contains(token.as_str()))
                    .count();
                (score, chunk)
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(_, chunk)| chunk)
            .collect()
    }

    /// Joins retrieved chunks for display, falling back to the whole
    /// document when nothing was selected.
    pub fn format_chunks(&self, chunks: &[&Chunk]) -> String {
        if chunks.is_empty() {
            return self.full_text.clone();
        }
        chunks
            .iter()
            .map(|chunk| chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n---\n\n")
    }
}

fn is_section_heading(line: &str) -> bool {
    line.strip_prefix("##")
        .is_some_and(|rest| rest.starts_with(char::is_whitespace))
}
