use serde::{Deserialize, Serialize};

/// A short on-screen phrase, in script order. `index` is its identity through the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub index: usize,
    pub text: String,
}

impl Highlight {
    /// Wrap raw highlight strings, numbering them by position.
    pub fn from_texts<I, S>(texts: I) -> Vec<Highlight>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Highlight {
                index,
                text: text.into(),
            })
            .collect()
    }
}

/// How a highlight's time window was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Located in the transcript by the phrase matcher.
    Matched,
    /// Placed into an uncovered stretch of narration.
    GapFilled,
}

/// A highlight with its resolved screen time window.
///
/// Invariant: `0 <= start < end <= audio_duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedHighlight {
    pub index: usize,
    pub text: String,
    pub start: f64,
    pub end: f64,
    /// Match ratio in `[0, 1]`; always `0.0` for gap-filled items.
    pub score: f64,
    pub mode: MatchMode,
}

impl TimedHighlight {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Numeric callouts ("200 KM RANGE") are kept on the edge palette.
    pub fn is_numeric(&self) -> bool {
        self.text.chars().any(|c| c.is_ascii_digit())
    }
}
