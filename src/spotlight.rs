//! High-level API for timing and placing highlights with Spotlight.
//!
//! We expose a single entry point (`Spotlight`) that wires the scheduler, the zone allocator
//! and an output encoder together:
//! - Construct once with `Opts` and a random source.
//! - Call `place` or `render` once per clip; every call gets a fresh zone allocator so
//!   occupancy never leaks from one clip into the next.
//!
//! The lower-level pieces (`matcher`, `gaps`, `zone`) stay usable and testable on their own.

use std::io::{BufWriter, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Result;
use crate::highlight::Highlight;
use crate::json_array_encoder::JsonArrayEncoder;
use crate::opts::Opts;
use crate::output_type::OutputType;
use crate::placement::{Placement, place};
use crate::placement_encoder::PlacementEncoder;
use crate::scheduler::{HighlightScheduler, Schedule};
use crate::transcript::Transcript;
use crate::vtt_encoder::VttEncoder;
use crate::zone::ZoneAllocator;

/// Result of one clip: the timing pass and the zones assigned on top of it.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipLayout {
    pub schedule: Schedule,
    /// One placement per scheduled item, ordered by index.
    pub placements: Vec<Placement>,
}

/// The main high-level entry point.
///
/// `Spotlight` owns the options and the random source used for zone shuffling. Not meant for
/// concurrent use; give each worker its own instance.
pub struct Spotlight<R: Rng = StdRng> {
    scheduler: HighlightScheduler,
    rng: R,
}

impl Spotlight<StdRng> {
    /// A `Spotlight` whose zone shuffling is seeded from OS entropy.
    pub fn new(opts: Opts) -> Self {
        Self::with_rng(opts, StdRng::from_entropy())
    }

    /// A `Spotlight` with reproducible zone placement.
    pub fn seeded(opts: Opts, seed: u64) -> Self {
        Self::with_rng(opts, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Spotlight<R> {
    pub fn with_rng(opts: Opts, rng: R) -> Self {
        Self {
            scheduler: HighlightScheduler::new(opts),
            rng,
        }
    }

    pub fn opts(&self) -> &Opts {
        self.scheduler.opts()
    }

    /// Time and place `highlights` for one clip.
    pub fn place(&mut self, transcript: &Transcript, highlights: &[Highlight]) -> Result<ClipLayout> {
        let schedule = self.scheduler.schedule(transcript, highlights)?;
        Ok(self.layout(schedule))
    }

    /// Assign zones to an already timed schedule, such as the partial schedule carried by
    /// [`crate::Error::Coverage`].
    pub fn layout(&mut self, schedule: Schedule) -> ClipLayout {
        let palette = self.scheduler.opts().palette;
        let mut allocator = ZoneAllocator::with_rng(&mut self.rng, palette);
        let placements = place(&schedule.items, &mut allocator);

        ClipLayout {
            schedule,
            placements,
        }
    }

    /// Time and place `highlights`, then write the placements to `w` in `output_type` format.
    ///
    /// The encoder is always closed, even when writing fails part-way, so partial JSON output
    /// is still terminated.
    pub fn render<W: Write>(
        &mut self,
        transcript: &Transcript,
        highlights: &[Highlight],
        w: W,
        output_type: OutputType,
    ) -> Result<ClipLayout> {
        let layout = self.place(transcript, highlights)?;
        let writer = BufWriter::new(w);

        // Select an encoder explicitly (no trait objects) to keep the writer's lifetime simple.
        let res = match output_type {
            OutputType::Json => {
                let mut encoder = JsonArrayEncoder::new(writer);
                let run_res = write_all(&mut encoder, &layout.placements);
                merge_run_and_close(run_res, encoder.close())
            }
            OutputType::Vtt => {
                let mut encoder = VttEncoder::new(writer);
                let run_res = write_all(&mut encoder, &layout.placements);
                merge_run_and_close(run_res, encoder.close())
            }
        };

        res.map(|()| layout)
    }
}

fn write_all<E: PlacementEncoder>(encoder: &mut E, placements: &[Placement]) -> Result<()> {
    for placement in placements {
        encoder.write_placement(placement)?;
    }
    Ok(())
}

/// Prefer the write error; a close error only surfaces when the writes succeeded.
fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), _) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::highlight::MatchMode;
    use crate::opts::CoveragePolicy;
    use crate::transcript::Word;

    fn transcript() -> anyhow::Result<Transcript> {
        let words = "THE NEW MODEL HAS 350 LITERS OF BOOT SPACE AND A PANORAMIC SUNROOF"
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| Word::new(w, i as f64 * 0.4, i as f64 * 0.4 + 0.35))
            .collect();
        Ok(Transcript::new(words, Some(8.0))?)
    }

    fn highlights() -> Vec<Highlight> {
        Highlight::from_texts(["350 LITERS BOOT SPACE", "PANORAMIC SUNROOF", "5 YEAR WARRANTY"])
    }

    #[test]
    fn place_returns_one_placement_per_item() -> anyhow::Result<()> {
        let mut spotlight = Spotlight::seeded(Opts::default(), 4);
        let layout = spotlight.place(&transcript()?, &highlights())?;

        assert_eq!(layout.placements.len(), 3);
        assert_eq!(layout.schedule.items[0].mode, MatchMode::Matched);
        assert_eq!(layout.schedule.items[1].mode, MatchMode::Matched);
        assert_eq!(layout.schedule.items[2].mode, MatchMode::GapFilled);
        for (p, t) in layout.placements.iter().zip(&layout.schedule.items) {
            assert_eq!(p.index, t.index);
            assert_eq!(p.start, t.start);
        }
        Ok(())
    }

    fn crowded_clip() -> anyhow::Result<(Transcript, Vec<Highlight>)> {
        let transcript = Transcript::new(
            vec![
                Word::new("PREMIUM", 0.0, 0.4),
                Word::new("LEATHER", 0.5, 0.9),
                Word::new("SEATS", 1.0, 1.4),
            ],
            Some(2.0),
        )?;
        let highlights =
            Highlight::from_texts(["PREMIUM LEATHER SEATS", "FREE SERVICE", "ZERO EMISSIONS"]);
        Ok((transcript, highlights))
    }

    #[test]
    fn default_opts_keep_partial_layout_when_a_highlight_is_dropped() -> anyhow::Result<()> {
        let (transcript, highlights) = crowded_clip()?;
        let layout = Spotlight::seeded(Opts::default(), 1).place(&transcript, &highlights)?;

        assert_eq!(layout.schedule.dropped, vec![2]);
        let indices: Vec<usize> = layout.placements.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![0, 1]);
        Ok(())
    }

    #[test]
    fn strict_coverage_error_can_still_be_laid_out() -> anyhow::Result<()> {
        let (transcript, highlights) = crowded_clip()?;
        let opts = Opts {
            coverage: CoveragePolicy::Strict,
            ..Opts::default()
        };
        let mut spotlight = Spotlight::seeded(opts, 1);

        let partial = match spotlight.place(&transcript, &highlights) {
            Err(Error::Coverage { dropped, partial }) => {
                assert_eq!(dropped, vec![2]);
                partial
            }
            other => panic!("expected a coverage error, got {other:?}"),
        };

        let layout = spotlight.layout(*partial);
        assert_eq!(layout.placements.len(), 2);
        assert_eq!(layout.placements[0].mode, MatchMode::Matched);
        assert_eq!(layout.placements[1].mode, MatchMode::GapFilled);
        Ok(())
    }

    #[test]
    fn same_seed_same_layout() -> anyhow::Result<()> {
        let a = Spotlight::seeded(Opts::default(), 8).place(&transcript()?, &highlights())?;
        let b = Spotlight::seeded(Opts::default(), 8).place(&transcript()?, &highlights())?;
        assert_eq!(a, b);
        Ok(())
    }

    #[test]
    fn render_json_writes_every_placement() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut spotlight = Spotlight::seeded(Opts::default(), 1);
        spotlight.render(&transcript()?, &highlights(), &mut out, OutputType::Json)?;

        let parsed: serde_json::Value = serde_json::from_slice(&out)?;
        assert_eq!(parsed.as_array().map(Vec::len), Some(3));
        assert_eq!(parsed[2]["mode"], "gap_filled");
        Ok(())
    }

    #[test]
    fn render_vtt_writes_cues() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut spotlight = Spotlight::seeded(Opts::default(), 1);
        spotlight.render(&transcript()?, &highlights(), &mut out, OutputType::Vtt)?;

        let s = String::from_utf8(out)?;
        assert!(s.starts_with("WEBVTT\n\n"));
        assert_eq!(s.matches(" --> ").count(), 3);
        Ok(())
    }
}
