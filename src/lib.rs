//! `spotlight` times and places on-screen highlight phrases against narrated audio.
//!
//! Given highlight phrases in script order and a word-level transcript of the narration,
//! this crate provides:
//! - Fuzzy, anchor-based phrase matching that tolerates ASR slips
//! - Gap filling for highlights the transcript never clearly says
//! - Screen zone allocation that keeps concurrent overlays apart
//! - Streaming output encoders (JSON, WebVTT)
//!
//! No audio or video is touched here; transcription and rendering are the caller's business.

// High-level API (most consumers should start here).
pub mod opts;
pub mod spotlight;

// Input and output records.
pub mod highlight;
pub mod placement;
pub mod transcript;

// Timing.
pub mod gaps;
pub mod matcher;
pub mod normalize;
pub mod scheduler;

// Screen layout.
pub mod zone;

// Output selection and encoder interfaces.
pub mod output_type;
pub mod placement_encoder;

// Output encoders that serialize placements into various formats.
pub mod json_array_encoder;
pub mod vtt_encoder;

pub mod diagnostics;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use error::{Error, Result};
pub use highlight::{Highlight, MatchMode, TimedHighlight};
pub use opts::{CoveragePolicy, Opts};
pub use output_type::OutputType;
pub use placement::Placement;
pub use scheduler::{HighlightScheduler, Schedule};
pub use spotlight::{ClipLayout, Spotlight};
pub use transcript::{Transcript, Word};
pub use zone::{Align, Palette, Zone, ZoneAllocator};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
