use std::io::Write;

use crate::Result;
use crate::placement::Placement;
use crate::placement_encoder::PlacementEncoder;

/// A `PlacementEncoder` that writes placements as a single JSON array.
///
/// The array is opened lazily and closed by `close()`, so a run with no placements still
/// produces valid JSON (`[]`).
///
/// Example output:
/// ```json
/// [
///   { "index": 0, "text": "200 KM RANGE", "start": 1.5, "end": 3.4, "score": 0.67,
///     "mode": "matched", "zone": "top-left", "align": "left" }
/// ]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    w: W,

    /// Whether the opening `[` has been written.
    started: bool,

    /// Whether the next element is the first one (no leading comma).
    first: bool,

    closed: bool,
}

impl<W: Write> JsonArrayEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            first: true,
            closed: false,
        }
    }

    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"[")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> PlacementEncoder for JsonArrayEncoder<W> {
    fn write_placement(&mut self, placement: &Placement) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write placement: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        if !self.first {
            self.w.write_all(b",")?;
        }
        self.first = false;

        serde_json::to_writer(&mut self.w, placement)?;
        Ok(())
    }

    /// Finalize the JSON array and flush. Idempotent.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.start_if_needed()?;
        self.w.write_all(b"]")?;
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}
