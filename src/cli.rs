//! CLI argument parser for the `soundscape` binary.
//!
//! Global flags override the environment-derived [`EngineConfig`]; each
//! subcommand maps onto one pipeline entry point.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::audio::ExportFormat;
use crate::config::EngineConfig;
use crate::mixer::{FillPolicy, MixMode, MAX_TARGET_DURATION_MS};
use crate::tags::PunctuationPolicy;

/// Combination modes accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Layer every clip from time zero
    Overlay,
    /// Play clips one after another, ordered by path
    Concatenate,
}

impl From<ModeArg> for MixMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Overlay => MixMode::Overlay,
            ModeArg::Concatenate => MixMode::Concatenate,
        }
    }
}

/// Fill policies accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FillArg {
    /// Leave short mixes short
    Truncate,
    /// Pad short mixes with silence
    Pad,
    /// Loop short mixes to the target
    Loop,
}

impl From<FillArg> for FillPolicy {
    fn from(arg: FillArg) -> Self {
        match arg {
            FillArg::Truncate => FillPolicy::TruncateOnly,
            FillArg::Pad => FillPolicy::PadWithSilence,
            FillArg::Loop => FillPolicy::LoopToFill,
        }
    }
}

/// Output encodings accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// 192 kbps MP3
    Mp3,
    /// 16-bit integer PCM WAV
    Pcm16,
    /// 32-bit float PCM WAV
    Float32,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Mp3 => ExportFormat::Mp3,
            FormatArg::Pcm16 => ExportFormat::Pcm16,
            FormatArg::Float32 => ExportFormat::Float32,
        }
    }
}

/// soundscape: turn image captions into ambient audio
#[derive(Parser, Debug)]
#[command(name = "soundscape")]
#[command(about = "Build ambient soundscapes from caption text or keyword tags")]
#[command(version)]
pub struct Cli {
    /// JSON registry file mapping tags to clip paths
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Directory of clips named <tag>_<n>.<ext>, scanned when no registry file is given
    #[arg(long, global = true)]
    pub asset_dir: Option<PathBuf>,

    /// Strip leading and trailing punctuation from caption words
    #[arg(long, global = true)]
    pub strip_punctuation: bool,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the tags extracted from a caption
    Tags {
        /// Caption text
        #[arg(required = true, num_args = 1..)]
        caption: Vec<String>,
    },

    /// Build a soundscape and write it with a JSON sidecar
    Build(BuildArgs),

    /// Print tags that have no clips in the registry
    Check(TagSource),
}

/// Where the tags for a build or check come from.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct TagSource {
    /// Comma-separated tags, e.g. "water,forest,birds"
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Caption text to extract tags from
    #[arg(short, long)]
    pub caption: Option<String>,
}

/// Arguments for `build`.
#[derive(Args, Debug, Clone)]
pub struct BuildArgs {
    #[command(flatten)]
    pub source: TagSource,

    /// Combination mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,

    /// Target duration in milliseconds
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..=MAX_TARGET_DURATION_MS))]
    pub duration_ms: Option<u64>,

    /// What to do when the mix is shorter than the target
    #[arg(long, value_enum)]
    pub fill: Option<FillArg>,

    /// Output encoding
    #[arg(long, value_enum)]
    pub format: Option<FormatArg>,

    /// Output path; defaults to <output-dir>/<soundscape-id>.<mp3|wav>
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Skip writing the JSON metadata sidecar
    #[arg(long)]
    pub no_sidecar: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Cli::parse()
    }

    /// Applies global flag overrides to `config`.
    pub fn apply_to(&self, config: &mut EngineConfig) {
        if let Some(ref path) = self.registry {
            config.registry_path = Some(path.clone());
        }
        if let Some(ref dir) = self.asset_dir {
            config.asset_dir = Some(dir.clone());
        }
        if self.strip_punctuation {
            config.punctuation = PunctuationPolicy::Strip;
        }
        if let Command::Build(ref args) = self.command {
            args.apply_to(config);
        }
    }
}

impl BuildArgs {
    /// Applies build flag overrides to `config`.
    pub fn apply_to(&self, config: &mut EngineConfig) {
        if let Some(mode) = self.mode {
            config.mode = mode.into();
        }
        if let Some(ms) = self.duration_ms {
            config.target_duration_ms = ms;
        }
        if let Some(fill) = self.fill {
            config.fill_policy = fill.into();
        }
        if let Some(format) = self.format {
            config.export_format = format.into();
        }
    }
}
