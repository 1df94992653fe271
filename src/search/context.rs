//! Reconstruction of before/match/after windows around each match.

use std::collections::BTreeMap;

use crate::models::{LineMap, MatchWindow};
use crate::search::engine::{RawFileMatches, RawLine};

/// Build one window per match from the engine's raw match and context lines.
///
/// Context lines are a single-use pool shared across the whole file: once a
/// window claims a line it is gone, so a later match whose window would
/// overlap shows a gap instead of repeating the line. Lines that are blank
/// after trimming are never included, which also produces gaps. Matches whose
/// own text trims to empty are dropped entirely.
pub fn assemble(raw: &RawFileMatches, before_size: usize, after_size: usize) -> Vec<MatchWindow> {
    let mut pool: BTreeMap<usize, &str> = raw
        .context
        .iter()
        .map(|line| (line.line_number, line.text.as_str()))
        .collect();

    let mut windows = Vec::new();

    for RawLine { line_number, text } in &raw.matches {
        let line_number = *line_number;
        let matched_text = text.trim_end();
        if matched_text.is_empty() {
            continue;
        }

        let mut before = LineMap::new();
        for ln in line_number.saturating_sub(before_size)..line_number {
            if let Some(text) = pool.remove(&ln) {
                let trimmed = text.trim_end();
                if !trimmed.is_empty() {
                    before.insert(ln, trimmed.to_string());
                }
            }
        }

        let mut after = LineMap::new();
        for ln in line_number + 1..=line_number + after_size {
            if let Some(text) = pool.remove(&ln) {
                let trimmed = text.trim_end();
                if !trimmed.is_empty() {
                    after.insert(ln, trimmed.to_string());
                }
            }
        }

        let mut matched = LineMap::new();
        matched.insert(line_number, matched_text.to_string());

        windows.push(MatchWindow {
            before,
            matched,
            after,
        });
    }

    windows
}
