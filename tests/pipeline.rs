use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use spotlight::diagnostics::Diagnostics;
use spotlight::{
    CoveragePolicy, Highlight, HighlightScheduler, MatchMode, Opts, Palette, Spotlight,
    TimedHighlight, Transcript, Word, ZoneAllocator,
};

fn load_fixture() -> anyhow::Result<(Transcript, Vec<Highlight>)> {
    let raw = std::fs::read_to_string("tests/fixtures/voyager_transcript.json")?;
    let transcript: Transcript = serde_json::from_str(&raw)?;
    transcript.validate()?;

    let texts = std::fs::read_to_string("tests/fixtures/voyager_highlights.txt")?;
    let highlights = Highlight::from_texts(
        texts
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_owned),
    );
    Ok((transcript, highlights))
}

#[test]
fn car_feature_highlights_match_in_script_order() -> anyhow::Result<()> {
    let text = "THE CAR OFFERS 200 KILOMETERS OF RANGE WITH PREMIUM LEATHER SEATS";
    let words: Vec<Word> = text
        .split_whitespace()
        .enumerate()
        .map(|(i, w)| Word::new(w, i as f64 * 0.5, i as f64 * 0.5 + 0.45))
        .collect();
    let transcript = Transcript::new(words, Some(6.0))?;

    let schedule = HighlightScheduler::default()
        .schedule_texts(&transcript, &["200 KM RANGE", "PREMIUM LEATHER SEATS"])?;

    let [range, seats] = schedule.items.as_slice() else {
        panic!("expected two items, got {:?}", schedule.items);
    };
    assert_eq!((range.index, seats.index), (0, 1));
    assert_eq!(range.mode, MatchMode::Matched);
    assert_eq!(seats.mode, MatchMode::Matched);
    assert!(range.score >= 0.55, "range score {}", range.score);
    assert!(seats.score >= 0.55, "seats score {}", seats.score);
    assert_eq!(range.start, 1.5);
    assert_eq!(seats.start, 4.0);
    assert!(range.end <= seats.start);
    Ok(())
}

#[test]
fn fixture_schedule_matches_asr_variants() -> anyhow::Result<()> {
    let (transcript, highlights) = load_fixture()?;
    let schedule = HighlightScheduler::default().schedule(&transcript, &highlights)?;

    let modes: Vec<MatchMode> = schedule.items.iter().map(|t| t.mode).collect();
    assert_eq!(
        modes,
        vec![
            MatchMode::Matched,
            MatchMode::Matched,
            MatchMode::Matched,
            MatchMode::Matched,
            MatchMode::Matched,
            MatchMode::GapFilled,
        ]
    );

    // "20,000 KM" vs "20,000 kilometres": the number lines up, KM is missed.
    let service = &schedule.items[1];
    assert_eq!(service.start, 3.95);
    assert_eq!(service.end, 6.53);
    assert!((service.score - 0.75).abs() < 1e-9);

    // The only gap with room is the lead-in before the first match.
    let safety = &schedule.items[5];
    assert!((safety.start - 0.2).abs() < 1e-9);
    assert_eq!(safety.end, 1.1);
    assert!(safety.end <= schedule.items[0].start);
    Ok(())
}

#[test]
fn fixture_layout_is_reproducible_and_complete() -> anyhow::Result<()> {
    let (transcript, highlights) = load_fixture()?;

    let a = Spotlight::seeded(Opts::default(), 2024).place(&transcript, &highlights)?;
    let b = Spotlight::seeded(Opts::default(), 2024).place(&transcript, &highlights)?;
    assert_eq!(a, b);
    assert_eq!(a.placements.len(), highlights.len());

    for pair in a.placements.windows(2) {
        let overlap = pair[0].start < pair[1].end && pair[1].start < pair[0].end;
        if overlap {
            assert_ne!(pair[0].zone, pair[1].zone);
        }
    }
    Ok(())
}

#[test]
fn diagnostics_round_trip_through_a_file() -> anyhow::Result<()> {
    let (transcript, highlights) = load_fixture()?;
    let schedule = HighlightScheduler::default().schedule(&transcript, &highlights)?;

    let file = tempfile::NamedTempFile::new()?;
    Diagnostics::from_schedule(Some("voyager".to_owned()), &schedule).write_json(file.reopen()?)?;

    let read: Diagnostics = serde_json::from_reader(std::fs::File::open(file.path())?)?;
    assert_eq!(read.audio_id, "voyager");
    assert_eq!(read.audio_duration, 16.46);
    assert_eq!(read.matched_items.len(), 5);
    assert_eq!(read.gap_filled_items.len(), 1);
    assert!(read.dropped_indices.is_empty());
    Ok(())
}

const VOCAB: &[&str] = &[
    "the", "engine", "delivers", "torque", "across", "every", "gear", "with", "smooth", "power",
    "and", "quiet", "cabin", "comfort", "plus", "wireless", "charging", "for", "all", "phones",
    "300", "horsepower", "turbo", "hybrid", "system", "heated", "mirrors", "night", "vision",
];

fn random_transcript(rng: &mut StdRng) -> anyhow::Result<Transcript> {
    let count = rng.gen_range(0..40);
    let mut t = rng.gen_range(0.0..1.0);
    let mut words = Vec::with_capacity(count);
    for _ in 0..count {
        let len = rng.gen_range(0.1..0.6);
        let text = *VOCAB.choose(rng).unwrap_or(&"the");
        words.push(Word::new(text, t, t + len));
        t += len + rng.gen_range(0.0..0.8);
    }
    let duration = t + rng.gen_range(0.0..3.0);
    Ok(Transcript::new(words, Some(duration))?)
}

fn random_highlights(rng: &mut StdRng, transcript: &Transcript) -> Vec<Highlight> {
    let count = rng.gen_range(0..12);
    let texts = (0..count).map(|_| {
        let words = &transcript.words;
        if !words.is_empty() && rng.gen_bool(0.6) {
            let start = rng.gen_range(0..words.len());
            let len = rng.gen_range(1..=5).min(words.len() - start);
            words[start..start + len]
                .iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        } else {
            (0..rng.gen_range(0..4))
                .map(|_| *VOCAB.choose(rng).unwrap_or(&"x"))
                .collect::<Vec<_>>()
                .join(" ")
        }
    });
    Highlight::from_texts(texts.collect::<Vec<_>>())
}

#[test]
fn every_highlight_is_timed_or_reported_dropped() -> anyhow::Result<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let scheduler = HighlightScheduler::new(Opts {
        coverage: CoveragePolicy::Lenient,
        ..Opts::default()
    });

    for _ in 0..300 {
        let transcript = random_transcript(&mut rng)?;
        let highlights = random_highlights(&mut rng, &transcript);
        let schedule = scheduler.schedule(&transcript, &highlights)?;
        let duration = transcript.duration();

        let mut seen: HashSet<usize> = HashSet::new();
        for item in &schedule.items {
            assert!(seen.insert(item.index), "index {} emitted twice", item.index);
            assert!(item.start >= 0.0, "{item:?}");
            assert!(item.start < item.end, "{item:?}");
            assert!(item.end <= duration, "{item:?} exceeds {duration}");
        }
        for idx in &schedule.dropped {
            assert!(seen.insert(*idx), "index {idx} both placed and dropped");
        }
        assert_eq!(seen, (0..highlights.len()).collect::<HashSet<_>>());

        let filled: Vec<&TimedHighlight> = schedule.gap_filled().collect();
        for (i, a) in filled.iter().enumerate() {
            for b in &filled[i + 1..] {
                assert!(
                    a.end <= b.start || b.end <= a.start,
                    "gap-filled items overlap: {a:?} {b:?}"
                );
            }
        }
    }
    Ok(())
}

#[test]
fn zones_never_collide_when_there_is_room() {
    let mut rng = StdRng::seed_from_u64(77);

    for seed in 0..50 {
        // At most three overlays are on screen at once, so a free zone always exists.
        let items: Vec<TimedHighlight> = (0..40)
            .map(|i| {
                let start = i as f64 * 0.5 + rng.gen_range(0.0..0.2);
                TimedHighlight {
                    index: i,
                    text: if i % 4 == 0 { "4WD".to_owned() } else { "COMFORT".to_owned() },
                    start,
                    end: start + rng.gen_range(0.3..1.2),
                    score: 1.0,
                    mode: MatchMode::Matched,
                }
            })
            .collect();

        let mut alloc = ZoneAllocator::seeded(seed, Palette::Grid);
        let placements = spotlight::placement::place(&items, &mut alloc);

        for pair in placements.windows(2) {
            assert_ne!(pair[0].zone, pair[1].zone, "consecutive repeat at {}", pair[1].index);
        }
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                let overlap = a.start < b.end && b.start < a.end;
                assert!(!(overlap && a.zone == b.zone), "{a:?} collides with {b:?}");
            }
        }
    }
}
