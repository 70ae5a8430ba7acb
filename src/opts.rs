use crate::zone::Palette;

/// What to do when a highlight can be neither matched nor fitted into a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoveragePolicy {
    /// Return the partial schedule; dropped indices are reported on it.
    #[default]
    Lenient,
    /// Fail the run with [`crate::Error::Coverage`] listing every dropped index. The error
    /// still carries the partial schedule.
    Strict,
}

/// Options that control how highlights are timed and placed.
///
/// This struct represents *library-level configuration*, not CLI flags directly.
/// The CLI is responsible for mapping user input into this type so that other frontends
/// (services, tests, batch jobs) can construct options programmatically.
#[derive(Debug, Clone, Default)]
pub struct Opts {
    /// Whether a highlight that finds no room counts as a failure.
    pub coverage: CoveragePolicy,

    /// Leave adjacent digit-only tokens apart instead of gluing them together before matching.
    ///
    /// ASR engines commonly emit `"20,000"` as `"20"` `"000"`; merging on both sides (the
    /// default) lets the phrase still line up. Merging is applied identically to highlights
    /// and transcript words.
    pub keep_split_numbers: bool,

    /// Zones eligible for highlights without digits. Numeric highlights always use the edge
    /// palette.
    pub palette: Palette,
}

impl Opts {
    pub(crate) fn merge_split_numbers(&self) -> bool {
        !self.keep_split_numbers
    }
}
