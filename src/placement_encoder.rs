use crate::Result;
use crate::placement::Placement;

/// Streams placement records to some output format.
///
/// Implementations must tolerate `close()` being called more than once and reject writes
/// after the first close.
pub trait PlacementEncoder {
    fn write_placement(&mut self, placement: &Placement) -> Result<()>;
    fn close(&mut self) -> Result<()>;
}
