use std::fs::File;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};

use spotlight::diagnostics::Diagnostics;
use spotlight::{
    CoveragePolicy, Error, Highlight, Opts, OutputType, Palette, Spotlight, Transcript,
};

fn main() {
    spotlight::init_logging();

    if let Err(err) = run() {
        error!(error = ?err, "spotlight-cli failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(name = "spotlight")]
#[command(about = "Time and place highlight phrases against a word-level transcript")]
struct Params {
    /// Transcript JSON: `{"words": [{"text", "start", "end"}...], "audio_duration": 12.3}`.
    #[arg(short = 't', long = "transcript")]
    transcript_path: PathBuf,

    /// Highlights: a JSON array of strings, or plain text with one highlight per line.
    #[arg(short = 'H', long = "highlights")]
    highlights_path: PathBuf,

    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::Json
    )]
    output_type: OutputType,

    /// Seed for zone shuffling; omit for a different layout on every run.
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Fail instead of emitting a partial layout when a highlight finds no room.
    #[arg(long = "strict", default_value_t = false)]
    strict: bool,

    /// Match "20" "000" literally instead of merging them into "20000".
    #[arg(long = "no-merge-numbers", default_value_t = false)]
    no_merge_numbers: bool,

    /// Allow non-numeric highlights in the middle row of the screen too.
    #[arg(long = "wide-palette", default_value_t = false)]
    wide_palette: bool,

    /// Write a diagnostics JSON record to this path.
    #[arg(short = 'd', long = "diagnostics")]
    diagnostics_path: Option<PathBuf>,

    /// Identifier recorded in diagnostics (defaults to a random UUID).
    #[arg(long = "audio-id")]
    audio_id: Option<String>,
}

impl Params {
    fn opts(&self) -> Opts {
        Opts {
            coverage: if self.strict {
                CoveragePolicy::Strict
            } else {
                CoveragePolicy::Lenient
            },
            keep_split_numbers: self.no_merge_numbers,
            palette: if self.wide_palette {
                Palette::Grid
            } else {
                Palette::Edge
            },
        }
    }
}

fn run() -> Result<()> {
    let params = Params::parse();

    let transcript = read_transcript(&params.transcript_path)?;
    let highlights = read_highlights(&params.highlights_path)?;

    let opts = params.opts();
    let mut spotlight = match params.seed {
        Some(seed) => Spotlight::seeded(opts, seed),
        None => Spotlight::new(opts),
    };

    let stdout = io::stdout();
    let layout = spotlight
        .render(&transcript, &highlights, stdout.lock(), params.output_type)
        .map_err(|err| match err {
            Error::Coverage { dropped, .. } => anyhow::anyhow!(
                "highlight(s) {dropped:?} did not fit anywhere on the timeline (drop --strict to \
                 accept a partial layout)"
            ),
            other => anyhow::Error::new(other),
        })?;

    info!(
        placed = layout.placements.len(),
        dropped = layout.schedule.dropped.len(),
        "layout written"
    );

    if let Some(path) = &params.diagnostics_path {
        let diagnostics = Diagnostics::from_schedule(params.audio_id.clone(), &layout.schedule);
        let file = File::create(path)
            .with_context(|| format!("failed to create diagnostics file '{}'", path.display()))?;
        diagnostics.write_json(file)?;
    }

    Ok(())
}

fn read_transcript(path: &Path) -> Result<Transcript> {
    let file = File::open(path)
        .with_context(|| format!("failed to open transcript '{}'", path.display()))?;
    let transcript: Transcript = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("failed to parse transcript '{}'", path.display()))?;
    transcript
        .validate()
        .with_context(|| format!("invalid transcript '{}'", path.display()))?;
    Ok(transcript)
}

fn read_highlights(path: &Path) -> Result<Vec<Highlight>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read highlights '{}'", path.display()))?;
    Ok(Highlight::from_texts(parse_highlights(&raw)))
}

/// A JSON array of strings, or failing that, one highlight per non-empty line.
fn parse_highlights(raw: &str) -> Vec<String> {
    if raw.trim_start().starts_with('[') {
        match serde_json::from_str::<Vec<String>>(raw) {
            Ok(texts) => return texts,
            Err(err) => debug!(error = %err, "highlights are not a JSON array; reading lines"),
        }
    }

    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_owned)
        .collect()
}
