//! Anchor-based fuzzy phrase matching against a word-level transcript.
//!
//! Every transcript word compatible with a highlight's first token seeds a short search window.
//! The remaining highlight tokens are then located greedily inside that window, left to right,
//! and the resulting span is kept only if it covers enough of the phrase and is not implausibly
//! wide. All functions here are pure.

use crate::transcript::Word;

/// Extra transcript words a window may hold beyond the highlight's own token count.
const WINDOW_SLACK: usize = 3;

/// Minimum allowed span width, in seconds, before the per-token allowance kicks in.
const MIN_SPAN_LIMIT_SECONDS: f64 = 2.5;
const SPAN_LIMIT_PER_TOKEN_SECONDS: f64 = 0.75;

/// Display time allowance for matched highlights.
const MIN_DISPLAY_SECONDS: f64 = 1.2;
const DISPLAY_PER_TOKEN_SECONDS: f64 = 0.7;

/// Characters compared by the prefix rule.
const PREFIX_LEN: usize = 4;

/// A scored time span where a highlight was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
    pub start: f64,
    pub end: f64,
    /// Fraction of highlight tokens located in the window.
    pub score: f64,
}

/// Whether transcript token `b` may stand in for highlight token `a`.
///
/// Tolerates thousands separators and ASR truncation/inflection (shared 4-character prefix),
/// while short tokens and acronyms must match exactly.
pub fn compatible(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }

    if (a.contains(',') || b.contains(',')) && a.replace(',', "") == b.replace(',', "") {
        return true;
    }

    let a_len = a.chars().count();
    let b_len = b.chars().count();

    if is_acronym(a, a_len) && is_acronym(b, b_len) {
        return a == b;
    }

    if a_len < PREFIX_LEN || b_len < PREFIX_LEN {
        return false;
    }

    a.chars().take(PREFIX_LEN).eq(b.chars().take(PREFIX_LEN))
}

fn is_acronym(token: &str, len: usize) -> bool {
    len <= 3
        && token.chars().any(char::is_alphabetic)
        && !token.chars().any(char::is_lowercase)
}

/// Minimum match ratio for a highlight of `token_count` tokens.
///
/// Longer phrases tolerate proportionally more missed tokens.
pub fn threshold(token_count: usize) -> f64 {
    match token_count {
        0..=2 => 0.75,
        3..=4 => 0.55,
        _ => 0.35,
    }
}

/// Find every plausible occurrence of `tokens` in `words`.
///
/// `words` are expected to carry match keys (see [`crate::Transcript::match_words`]).
/// Candidates are returned in anchor order. An empty token list never matches.
pub fn find_matches(words: &[Word], tokens: &[String]) -> Vec<MatchCandidate> {
    let Some(anchor) = tokens.first() else {
        return Vec::new();
    };

    let n = tokens.len();
    let min_ratio = threshold(n);
    let span_limit = MIN_SPAN_LIMIT_SECONDS.max(n as f64 * SPAN_LIMIT_PER_TOKEN_SECONDS);
    let mut candidates = Vec::new();

    for (i, word) in words.iter().enumerate() {
        if !compatible(anchor, &word.text) {
            continue;
        }

        let window_end = (i + n + WINDOW_SLACK).min(words.len());
        let mut matched = 1usize;
        let mut last = i;
        let mut cursor = i + 1;

        for token in &tokens[1..] {
            // A token absent from the rest of the window is skipped; the cursor stays put so
            // later tokens can still be found.
            if let Some(j) = (cursor..window_end).find(|&j| compatible(token, &words[j].text)) {
                matched += 1;
                last = j;
                cursor = j + 1;
            }
        }

        let ratio = matched as f64 / n as f64;
        if ratio < min_ratio {
            continue;
        }

        let start = word.start;
        let end = words[last].end;
        if end - start > span_limit {
            continue;
        }

        candidates.push(MatchCandidate {
            start,
            end,
            score: ratio,
        });
    }

    candidates
}

/// Highest score wins; ties go to the earliest start.
pub fn best_candidate(candidates: &[MatchCandidate]) -> Option<MatchCandidate> {
    candidates.iter().copied().fold(None, |best, c| match best {
        None => Some(c),
        Some(b) if c.score > b.score || (c.score == b.score && c.start < b.start) => Some(c),
        keep => keep,
    })
}

/// Clamp a candidate into a display window, or `None` if nothing is left of it.
pub fn display_window(
    candidate: &MatchCandidate,
    token_count: usize,
    audio_duration: f64,
) -> Option<(f64, f64)> {
    let allowance = MIN_DISPLAY_SECONDS.max(token_count as f64 * DISPLAY_PER_TOKEN_SECONDS);
    let start = candidate.start;
    let end = (start + allowance).min(candidate.end).min(audio_duration);
    (end > start).then_some((start, end))
}

/// Locate a highlight and resolve its display window in one step.
pub fn match_phrase(
    words: &[Word],
    tokens: &[String],
    audio_duration: f64,
) -> Option<(MatchCandidate, f64, f64)> {
    let candidates = find_matches(words, tokens);
    let best = best_candidate(&candidates)?;
    let (start, end) = display_window(&best, tokens.len(), audio_duration)?;
    Some((best, start, end))
}
