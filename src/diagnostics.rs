use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::highlight::TimedHighlight;
use crate::scheduler::Schedule;

/// Non-authoritative record of one scheduling run, for offline inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub audio_id: String,
    pub audio_duration: f64,
    pub matched_items: Vec<TimedHighlight>,
    pub gap_filled_items: Vec<TimedHighlight>,
    #[serde(default)]
    pub dropped_indices: Vec<usize>,
}

impl Diagnostics {
    /// Summarize `schedule`. Without an `audio_id` a random one is generated so records from
    /// separate runs don't collide.
    pub fn from_schedule(audio_id: Option<String>, schedule: &Schedule) -> Self {
        Self {
            audio_id: audio_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            audio_duration: schedule.audio_duration,
            matched_items: schedule.matched().cloned().collect(),
            gap_filled_items: schedule.gap_filled().cloned().collect(),
            dropped_indices: schedule.dropped.clone(),
        }
    }

    /// Write as pretty-printed JSON.
    pub fn write_json<W: Write>(&self, mut w: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut w, self)?;
        w.write_all(b"\n")?;
        w.flush()?;
        Ok(())
    }
}
