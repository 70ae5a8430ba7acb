use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::highlight::{MatchMode, TimedHighlight};
use crate::zone::{Align, Zone, ZoneAllocator};

/// A timed highlight with its screen zone: the record handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub index: usize,
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub score: f64,
    pub mode: MatchMode,
    pub zone: Zone,
    pub align: Align,
}

/// Assign a zone to every timed highlight.
///
/// The allocator is queried in ascending start order (ties by index), as it requires; the
/// returned placements are ordered by index. Highlights containing digits are restricted to
/// the edge palette.
pub fn place<R: Rng>(timed: &[TimedHighlight], allocator: &mut ZoneAllocator<R>) -> Vec<Placement> {
    let mut by_start: Vec<&TimedHighlight> = timed.iter().collect();
    by_start.sort_by(|a, b| a.start.total_cmp(&b.start).then(a.index.cmp(&b.index)));

    let mut placements: Vec<Placement> = by_start
        .into_iter()
        .map(|t| {
            let zone = allocator.choose(t.start, t.end, t.is_numeric());
            Placement {
                index: t.index,
                text: t.text.clone(),
                start: t.start,
                end: t.end,
                score: t.score,
                mode: t.mode,
                zone,
                align: zone.align(),
            }
        })
        .collect();

    placements.sort_by_key(|p| p.index);
    placements
}
