use std::io::Write;

use crate::Result;
use crate::placement::Placement;
use crate::placement_encoder::PlacementEncoder;
use crate::zone::Align;

/// A `PlacementEncoder` that writes placements as WebVTT cues.
///
/// Each cue is identified by the highlight index and carries `line`/`position`/`align` cue
/// settings derived from its zone, so a plain subtitle player shows a rough preview of the
/// overlay layout. The `WEBVTT` header is written lazily on the first cue.
pub struct VttEncoder<W: Write> {
    w: W,
    started: bool,
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            closed: false,
        }
    }

    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"WEBVTT\n\n")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> PlacementEncoder for VttEncoder<W> {
    fn write_placement(&mut self, placement: &Placement) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write placement: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        let start = format_timestamp_vtt(placement.start);
        let end = format_timestamp_vtt(placement.end);
        let zone = placement.zone;

        writeln!(&mut self.w, "{}", placement.index)?;
        writeln!(
            &mut self.w,
            "{start} --> {end} line:{}% position:{}% align:{}",
            zone.line_percent(),
            zone.position_percent(),
            align_setting(placement.align)
        )?;
        writeln!(&mut self.w, "{}", escape_cue_text(&placement.text))?;
        writeln!(&mut self.w)?;

        Ok(())
    }

    /// Flush the underlying writer. Idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

fn align_setting(align: Align) -> &'static str {
    match align {
        Align::Left => "left",
        Align::Center => "center",
        Align::Right => "right",
    }
}

/// Cue payloads may not contain raw `&`, `<` or `>`.
fn escape_cue_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Format seconds as a WebVTT timestamp (`HH:MM:SS.mmm`), rounded to the nearest millisecond.
fn format_timestamp_vtt(seconds: f64) -> String {
    let total_ms = (seconds.max(0.0) * 1000.0).round() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}
