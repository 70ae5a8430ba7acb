//! Screen zone assignment for timed highlights.
//!
//! The allocator keeps a list of active occupancies and the last zone it handed out. Each
//! request shuffles the eligible zones, skips the previous zone, and takes the first one that
//! is free for the requested interval. When nothing is free it still answers, accepting a
//! visual overlap rather than failing.
//!
//! Requests must arrive in ascending start order: stale occupancies are purged relative to the
//! incoming request's start.

use std::fmt;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A named screen region eligible for an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Zone {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

/// The canonical corner/edge palette.
pub const EDGE_ZONES: [Zone; 6] = [
    Zone::TopLeft,
    Zone::TopCenter,
    Zone::TopRight,
    Zone::BottomLeft,
    Zone::BottomCenter,
    Zone::BottomRight,
];

/// Every position a renderer can resolve, including the middle row.
pub const GRID_ZONES: [Zone; 9] = [
    Zone::TopLeft,
    Zone::TopCenter,
    Zone::TopRight,
    Zone::CenterLeft,
    Zone::Center,
    Zone::CenterRight,
    Zone::BottomLeft,
    Zone::BottomCenter,
    Zone::BottomRight,
];

impl Zone {
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::TopLeft => "top-left",
            Zone::TopCenter => "top-center",
            Zone::TopRight => "top-right",
            Zone::CenterLeft => "center-left",
            Zone::Center => "center",
            Zone::CenterRight => "center-right",
            Zone::BottomLeft => "bottom-left",
            Zone::BottomCenter => "bottom-center",
            Zone::BottomRight => "bottom-right",
        }
    }

    /// Text alignment that hugs the zone's screen edge.
    pub fn align(self) -> Align {
        match self {
            Zone::TopLeft | Zone::CenterLeft | Zone::BottomLeft => Align::Left,
            Zone::TopRight | Zone::CenterRight | Zone::BottomRight => Align::Right,
            Zone::TopCenter | Zone::Center | Zone::BottomCenter => Align::Center,
        }
    }

    /// Vertical placement as a percentage of frame height (0 = top).
    pub fn line_percent(self) -> u8 {
        match self {
            Zone::TopLeft | Zone::TopCenter | Zone::TopRight => 10,
            Zone::CenterLeft | Zone::Center | Zone::CenterRight => 50,
            Zone::BottomLeft | Zone::BottomCenter | Zone::BottomRight => 85,
        }
    }

    /// Horizontal anchor as a percentage of frame width (0 = left).
    pub fn position_percent(self) -> u8 {
        match self.align() {
            Align::Left => 5,
            Align::Center => 50,
            Align::Right => 95,
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizontal text alignment inside an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Which zones are eligible for requests that don't insist on the edge palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    /// The 6 corner/edge zones.
    #[default]
    Edge,
    /// All 9 grid positions.
    Grid,
}

impl Palette {
    pub fn zones(self) -> &'static [Zone] {
        match self {
            Palette::Edge => &EDGE_ZONES,
            Palette::Grid => &GRID_ZONES,
        }
    }
}

/// A zone blocked for `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupancy {
    pub zone: Zone,
    pub start: f64,
    pub end: f64,
}

impl Occupancy {
    fn overlaps(&self, start: f64, end: f64) -> bool {
        !(end <= self.start || start >= self.end)
    }
}

/// Assigns zones so that no two overlapping highlights share one.
///
/// Not meant to be shared between clips; create one allocator per clip.
pub struct ZoneAllocator<R: Rng = StdRng> {
    rng: R,
    palette: Palette,
    active: Vec<Occupancy>,
    last_zone: Option<Zone>,
}

impl ZoneAllocator<StdRng> {
    /// An allocator seeded from OS entropy.
    pub fn new(palette: Palette) -> Self {
        Self::with_rng(StdRng::from_entropy(), palette)
    }

    /// A reproducible allocator.
    pub fn seeded(seed: u64, palette: Palette) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), palette)
    }
}

impl<R: Rng> ZoneAllocator<R> {
    pub fn with_rng(rng: R, palette: Palette) -> Self {
        Self {
            rng,
            palette,
            active: Vec::new(),
            last_zone: None,
        }
    }

    /// Pick a zone for `[start, end)`.
    ///
    /// `prefer_upper` restricts the choice to the edge palette regardless of the configured
    /// palette. Never fails; if every candidate conflicts, the first shuffled candidate is
    /// returned anyway.
    pub fn choose(&mut self, start: f64, end: f64, prefer_upper: bool) -> Zone {
        self.active.retain(|occ| occ.end > start);

        let mut candidates: Vec<Zone> = if prefer_upper {
            EDGE_ZONES.to_vec()
        } else {
            self.palette.zones().to_vec()
        };
        candidates.shuffle(&mut self.rng);

        let free = candidates
            .iter()
            .copied()
            .filter(|&zone| Some(zone) != self.last_zone)
            .find(|&zone| self.is_free(zone, start, end));

        let zone = match free {
            Some(zone) => zone,
            None => {
                let zone = candidates[0];
                debug!(%zone, start, end, "all zones busy; accepting overlap");
                zone
            }
        };

        self.active.push(Occupancy { zone, start, end });
        self.last_zone = Some(zone);
        zone
    }

    pub fn is_free(&self, zone: Zone, start: f64, end: f64) -> bool {
        !self
            .active
            .iter()
            .any(|occ| occ.zone == zone && occ.overlaps(start, end))
    }

    /// Occupancies that have not yet been purged.
    pub fn active(&self) -> &[Occupancy] {
        &self.active
    }

    pub fn last_zone(&self) -> Option<Zone> {
        self.last_zone
    }
}
