/// The supported output formats for encoded placements.
///
/// Each variant maps to a concrete `PlacementEncoder` implementation. With the `cli` feature
/// this enum doubles as a `clap` value so the CLI flag and the library share one definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Output placements as a JSON array.
    #[default]
    Json,

    /// Output placements as positioned WebVTT cues.
    Vtt,
}
