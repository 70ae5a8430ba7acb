//! Fallback placement for highlights the matcher could not locate.
//!
//! The timeline left uncovered by matched highlights is cut into gaps. Unmatched highlights
//! are then laid into those gaps in script order, with one cursor that only moves forward, so
//! the fallback items keep their relative order on screen and never overlap each other.

use crate::highlight::{MatchMode, TimedHighlight};

/// A leading gap shorter than this is not worth filling.
const MIN_LEADING_GAP_SECONDS: f64 = 0.3;

/// Gaps with less free capacity than this are skipped.
const MIN_GAP_CAPACITY_SECONDS: f64 = 0.6;

/// Lead-in between the start of a gap and the item placed in it.
const LEAD_IN_SECONDS: f64 = 0.2;

const MIN_FILL_SECONDS: f64 = 1.0;
const FILL_PER_TOKEN_SECONDS: f64 = 0.6;

/// A stretch of narration not covered by any matched highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub start: f64,
    pub end: f64,
}

impl Gap {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Remaining free time in this gap. Negative when the bounding matches overlap.
    pub fn capacity(&self) -> f64 {
        self.end - self.start
    }
}

/// A highlight waiting for a fallback slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unmatched {
    pub index: usize,
    pub text: String,
    pub token_count: usize,
}

/// Result of a gap-filling pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GapFill {
    /// Newly placed items, in the order they were placed.
    pub placed: Vec<TimedHighlight>,
    /// Indices of highlights that found no gap with room left.
    pub dropped: Vec<usize>,
}

/// Cut `[0, audio_duration]` into the gaps around `matched` spans.
///
/// Spans are sorted by start first. Each gap begins at the furthest end seen so far, so gaps
/// never reach back into a matched window even when matched windows overlap.
pub fn build_gaps(matched: &[(f64, f64)], audio_duration: f64) -> Vec<Gap> {
    let mut spans = matched.to_vec();
    spans.sort_by(|a, b| a.0.total_cmp(&b.0));

    let Some(&(first_start, first_end)) = spans.first() else {
        return vec![Gap::new(0.0, audio_duration)];
    };

    let mut gaps = Vec::with_capacity(spans.len() + 1);
    if first_start > MIN_LEADING_GAP_SECONDS {
        gaps.push(Gap::new(0.0, first_start));
    }

    let mut covered_until = first_end;
    for &(start, end) in &spans[1..] {
        gaps.push(Gap::new(covered_until, start));
        covered_until = covered_until.max(end);
    }

    if covered_until < audio_duration {
        gaps.push(Gap::new(covered_until, audio_duration));
    }

    gaps
}

/// Display time given to a fallback item.
pub fn fill_duration(token_count: usize) -> f64 {
    MIN_FILL_SECONDS.max(token_count as f64 * FILL_PER_TOKEN_SECONDS)
}

/// Place `unmatched` highlights (in the order given) into the gaps left by `matched`.
pub fn fill_gaps(
    matched: &[TimedHighlight],
    unmatched: &[Unmatched],
    audio_duration: f64,
) -> GapFill {
    let spans: Vec<(f64, f64)> = matched.iter().map(|m| (m.start, m.end)).collect();
    let mut gaps = build_gaps(&spans, audio_duration);
    fill_into(&mut gaps, unmatched, audio_duration)
}

/// Consume capacity from `gaps` for each unmatched item. Gaps passed by the cursor are never
/// revisited.
pub fn fill_into(gaps: &mut [Gap], unmatched: &[Unmatched], audio_duration: f64) -> GapFill {
    let mut out = GapFill::default();
    let mut cursor = 0usize;

    'items: for item in unmatched {
        let duration = fill_duration(item.token_count);

        while let Some(gap) = gaps.get_mut(cursor) {
            if gap.capacity() >= MIN_GAP_CAPACITY_SECONDS {
                let start = gap.start + LEAD_IN_SECONDS;
                let end = (start + duration).min(gap.end).min(audio_duration);

                if end > start {
                    gap.start = end;
                    out.placed.push(TimedHighlight {
                        index: item.index,
                        text: item.text.clone(),
                        start,
                        end,
                        score: 0.0,
                        mode: MatchMode::GapFilled,
                    });
                    continue 'items;
                }
            }
            cursor += 1;
        }

        out.dropped.push(item.index);
    }

    out
}
