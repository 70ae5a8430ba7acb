//! Text canonicalization shared by highlights and transcript words.
//!
//! Both sides of a comparison must go through the same functions here, otherwise the matcher
//! ends up comparing differently-shaped tokens (e.g. `"20,000"` vs `"20 000"`). Transcript
//! words are tokenized exactly like highlights; a word that splits into several tokens
//! shares its timing among them.

/// Uppercase `text`, collapse every run of punctuation/whitespace into a single space, and trim.
///
/// Underscores are treated as punctuation; only alphanumeric characters survive.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        if ch.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.extend(ch.to_uppercase());
        } else {
            pending_space = true;
        }
    }

    out
}

/// Normalize then split into tokens. Empty or whitespace-only input yields no tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    normalize(text)
        .split_whitespace()
        .map(str::to_owned)
        .collect()
}

/// Merge adjacent digit-only tokens pairwise, left to right (`"20" + "000"` → `"20000"`).
pub fn merge_number_tokens(tokens: Vec<String>) -> Vec<String> {
    let mut merged = Vec::with_capacity(tokens.len());
    let mut iter = tokens.into_iter().peekable();

    while let Some(token) = iter.next() {
        if is_digits(&token) {
            if let Some(next) = iter.next_if(|next| is_digits(next)) {
                merged.push(token + &next);
                continue;
            }
        }
        merged.push(token);
    }

    merged
}

pub(crate) fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}
