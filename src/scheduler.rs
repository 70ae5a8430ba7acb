//! Two-pass highlight timing.
//!
//! Pass one locates each highlight in the transcript. Pass two lays every highlight that was
//! not found into the time left uncovered by pass one. The merged result is returned in script
//! order.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::gaps::{Unmatched, fill_gaps};
use crate::highlight::{Highlight, MatchMode, TimedHighlight};
use crate::matcher::match_phrase;
use crate::normalize::{merge_number_tokens, tokenize};
use crate::opts::{CoveragePolicy, Opts};
use crate::transcript::Transcript;

/// Timed highlights for one clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    /// One entry per placed highlight, ordered by index.
    pub items: Vec<TimedHighlight>,
    /// Indices that could not be placed, in script order.
    pub dropped: Vec<usize>,
    pub audio_duration: f64,
}

impl Schedule {
    pub fn matched(&self) -> impl Iterator<Item = &TimedHighlight> {
        self.items.iter().filter(|t| t.mode == MatchMode::Matched)
    }

    pub fn gap_filled(&self) -> impl Iterator<Item = &TimedHighlight> {
        self.items.iter().filter(|t| t.mode == MatchMode::GapFilled)
    }

    pub fn is_complete(&self) -> bool {
        self.dropped.is_empty()
    }
}

/// Runs the matcher and gap filler over a transcript.
#[derive(Debug, Clone, Default)]
pub struct HighlightScheduler {
    opts: Opts,
}

impl HighlightScheduler {
    pub fn new(opts: Opts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &Opts {
        &self.opts
    }

    /// Time every highlight against `transcript`.
    ///
    /// Dropped highlights are listed on [`Schedule::dropped`]. Under
    /// [`CoveragePolicy::Strict`] they turn into [`Error::Coverage`], which carries the
    /// partial schedule.
    pub fn schedule(&self, transcript: &Transcript, highlights: &[Highlight]) -> Result<Schedule> {
        transcript.validate()?;

        let audio_duration = transcript.duration();
        let merge = self.opts.merge_split_numbers();
        let words = transcript.match_words(merge);

        let mut matched = Vec::new();
        let mut unmatched = Vec::new();

        for highlight in highlights {
            let mut tokens = tokenize(&highlight.text);
            if merge {
                tokens = merge_number_tokens(tokens);
            }

            match match_phrase(&words, &tokens, audio_duration) {
                Some((candidate, start, end)) => {
                    debug!(
                        index = highlight.index,
                        score = candidate.score,
                        start,
                        end,
                        "highlight matched"
                    );
                    matched.push(TimedHighlight {
                        index: highlight.index,
                        text: highlight.text.clone(),
                        start,
                        end,
                        score: candidate.score,
                        mode: MatchMode::Matched,
                    });
                }
                None => {
                    debug!(index = highlight.index, "highlight unmatched");
                    unmatched.push(Unmatched {
                        index: highlight.index,
                        text: highlight.text.clone(),
                        token_count: tokens.len(),
                    });
                }
            }
        }

        let fill = fill_gaps(&matched, &unmatched, audio_duration);
        if !fill.dropped.is_empty() {
            warn!(dropped = ?fill.dropped, audio_duration, "no gap left for highlight(s)");
        }

        let mut items = matched;
        items.extend(fill.placed);
        items.sort_by_key(|t| t.index);

        debug!(
            total = highlights.len(),
            placed = items.len(),
            dropped = fill.dropped.len(),
            "schedule complete"
        );

        let schedule = Schedule {
            items,
            dropped: fill.dropped,
            audio_duration,
        };

        if self.opts.coverage == CoveragePolicy::Strict && !schedule.is_complete() {
            return Err(Error::Coverage {
                dropped: schedule.dropped.clone(),
                partial: Box::new(schedule),
            });
        }

        Ok(schedule)
    }

    /// Convenience wrapper numbering `texts` by position.
    pub fn schedule_texts<S: AsRef<str>>(
        &self,
        transcript: &Transcript,
        texts: &[S],
    ) -> Result<Schedule> {
        let highlights = Highlight::from_texts(texts.iter().map(|t| t.as_ref().to_owned()));
        self.schedule(transcript, &highlights)
    }
}
