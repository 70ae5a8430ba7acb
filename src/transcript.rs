use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::normalize::{is_digits, tokenize};

/// A single timestamped word produced by an external transcription engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    #[serde(alias = "word")]
    pub text: String,
    /// Start time in seconds.
    pub start: f64,
    /// End time in seconds.
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }
}

/// Word-level transcript of the narration for one clip.
///
/// Construct through [`Transcript::new`] (or deserialize and call [`Transcript::validate`])
/// so the ordering and timing invariants the scheduler relies on hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub words: Vec<Word>,

    /// Total narration length in seconds. Defaults to the last word's end when omitted.
    #[serde(default)]
    pub audio_duration: Option<f64>,
}

impl Transcript {
    pub fn new(words: Vec<Word>, audio_duration: Option<f64>) -> Result<Self> {
        let transcript = Self {
            words,
            audio_duration,
        };
        transcript.validate()?;
        Ok(transcript)
    }

    /// Check that words are ordered by start, every interval is well formed, and the audio
    /// duration (if given) covers every word.
    pub fn validate(&self) -> Result<()> {
        let mut prev_start = 0.0_f64;

        for (idx, word) in self.words.iter().enumerate() {
            if !word.start.is_finite() || !word.end.is_finite() || word.start < 0.0 {
                return Err(Error::invalid_input(format!(
                    "word {idx} ({:?}) has invalid timing {}..{}",
                    word.text, word.start, word.end
                )));
            }
            if word.end < word.start {
                return Err(Error::invalid_input(format!(
                    "word {idx} ({:?}) ends before it starts",
                    word.text
                )));
            }
            if word.start < prev_start {
                return Err(Error::invalid_input(format!(
                    "word {idx} ({:?}) starts at {} before the previous word at {prev_start}",
                    word.text, word.start
                )));
            }
            prev_start = word.start;
        }

        if let Some(duration) = self.audio_duration {
            if !duration.is_finite() || duration < 0.0 {
                return Err(Error::invalid_input(format!(
                    "audio duration {duration} is not a valid length"
                )));
            }
            let last_end = self.last_word_end();
            if duration < last_end {
                return Err(Error::invalid_input(format!(
                    "audio duration {duration} is shorter than the last word end {last_end}"
                )));
            }
        }

        Ok(())
    }

    /// The narration length: the explicit duration, or the latest word end.
    pub fn duration(&self) -> f64 {
        self.audio_duration.unwrap_or_else(|| self.last_word_end())
    }

    fn last_word_end(&self) -> f64 {
        self.words.iter().map(|w| w.end).fold(0.0, f64::max)
    }

    /// Words re-keyed for matching: each word is run through [`tokenize`] (a word such as
    /// `"e-tron"` yields one entry per token, all with the word's timing), and (optionally)
    /// adjacent digit-only tokens are merged into one spanning word.
    pub fn match_words(&self, merge_split_numbers: bool) -> Vec<Word> {
        let keyed = self.words.iter().flat_map(|w| {
            tokenize(&w.text)
                .into_iter()
                .map(|token| Word::new(token, w.start, w.end))
        });

        if !merge_split_numbers {
            return keyed.collect();
        }

        let mut merged: Vec<Word> = Vec::with_capacity(self.words.len());
        let mut iter = keyed.peekable();
        while let Some(word) = iter.next() {
            if is_digits(&word.text) {
                if let Some(next) = iter.next_if(|next| is_digits(&next.text)) {
                    merged.push(Word::new(word.text + &next.text, word.start, next.end));
                    continue;
                }
            }
            merged.push(word);
        }
        merged
    }
}
