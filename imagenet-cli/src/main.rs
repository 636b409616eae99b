mod args;
mod config;

use anyhow::Result;
use imagenet_core::{ImageSet, TractEngine, run_profile};
use imagenet_utils::init_logging;
use log::{LevelFilter, info};

use crate::{
    args::{ParsedArgs, print_usage_fallback},
    config::{apply_cli_overrides, build_plan, load_settings},
};

fn main() -> Result<()> {
    let args = match args::parse_from(std::env::args_os()) {
        ParsedArgs::Run(args) => args,
        ParsedArgs::ShowUsage(err) => {
            print_usage_fallback(&err);
            std::process::exit(0);
        }
    };

    init_logging(LevelFilter::Info)?;

    let mut settings = load_settings(args.config.as_ref())?;
    apply_cli_overrides(&mut settings, &args);

    info!("network: {}; profile: {}", args.network, args.profile);
    let plan = build_plan(&settings, &args)?;

    let images = ImageSet::load(&settings.manifest, settings.image_dir.clone())?;
    let engine = TractEngine::new(&settings.model_dir);
    run_profile(&engine, &plan, &images)?;

    info!("Profiling complete");
    Ok(())
}
