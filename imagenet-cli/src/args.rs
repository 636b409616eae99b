//! Command-line argument definitions for imagenet-profile.

use std::{ffi::OsString, path::PathBuf};

use clap::{ArgAction, CommandFactory, Parser, error::ErrorKind};

const NETWORK_HELP: &str = "\
classification networks:
  alexnet, googlenet, googlenet-12, resnet-18, resnet-50, resnet-101,
  resnet-152, vgg-16, vgg-19, inception-v4 (or `all` for every network)";

/// Profile per-image latency of ImageNet classification networks.
#[derive(Debug, Parser)]
#[command(author, version, about, after_help = NETWORK_HELP)]
pub struct ProfileArgs {
    /// Pre-trained model to load (see below for options), or `all`.
    #[arg(long, default_value = "googlenet")]
    pub network: String,

    /// Whether to record per-image timings: `True` or `False`.
    #[arg(
        long,
        action = ArgAction::Set,
        default_value = "False",
        value_name = "True|False",
        value_parser = parse_profile_flag
    )]
    pub profile: bool,

    /// GPU label used in output file names.
    #[arg(long, default_value = "4090")]
    pub gpu: String,

    /// Optional settings JSON (defaults to built-in parameters).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the precision tag used in output paths (e.g. FP16, FP32).
    #[arg(long)]
    pub precision: Option<String>,

    /// Override the number of timed repetitions per image.
    #[arg(long)]
    pub repeat_count: Option<usize>,

    /// Override the number of manifest images used for warm-up.
    #[arg(long)]
    pub warmup_images: Option<usize>,

    /// Override the image manifest path.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Override the directory image names are resolved against.
    #[arg(long)]
    pub image_dir: Option<PathBuf>,

    /// Override the directory holding `<network>.onnx` files.
    #[arg(long)]
    pub model_dir: Option<PathBuf>,

    /// Override the root directory of the runtime and results tables.
    #[arg(long)]
    pub output_root: Option<PathBuf>,

    /// Override the pause before each network is loaded (milliseconds).
    #[arg(long)]
    pub settle_delay_ms: Option<u64>,

    /// Override the pause before the runtime table is aggregated (milliseconds).
    #[arg(long)]
    pub aggregate_delay_ms: Option<u64>,
}

/// Outcome of reading the command line.
#[derive(Debug)]
pub enum ParsedArgs {
    Run(Box<ProfileArgs>),
    /// Arguments were unusable; usage should be shown and the process should exit cleanly.
    ShowUsage(clap::Error),
}

/// Parse arguments without exiting on malformed input.
///
/// `--help` and `--version` still print and exit through clap.
pub fn parse_from<I, T>(args: I) -> ParsedArgs
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match ProfileArgs::try_parse_from(args) {
        Ok(parsed) => ParsedArgs::Run(Box::new(parsed)),
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => ParsedArgs::ShowUsage(err),
    }
}

/// Print the usage text after a parse failure.
pub fn print_usage_fallback(err: &clap::Error) {
    eprintln!("error: {}", err.kind());
    println!();
    let _ = ProfileArgs::command().print_help();
}

fn parse_profile_flag(value: &str) -> Result<bool, String> {
    match value.trim() {
        "True" => Ok(true),
        "False" => Ok(false),
        other => Err(format!("expected `True` or `False`, got '{other}'")),
    }
}
