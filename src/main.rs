use anyhow::{Context, Result};
use human_panic::setup_panic;
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;
use log::{debug, LevelFilter};
use std::path::PathBuf;

mod args;
mod config;
mod error;
mod extract;
mod format;
mod idx;
mod input;
mod process;
mod render;
mod script;
mod size;
mod time;
mod timeline;

use args::{Args, Command, USAGE};
use input::Input;
use render::{Ffmpeg, Renderer};

fn init_logging(level: LevelFilter) -> Result<MultiProgress> {
    let logger = pretty_env_logger::formatted_builder()
        .filter_level(level)
        .build();
    let level = logger.filter();
    let progress = MultiProgress::new();

    LogWrapper::new(progress.clone(), logger)
        .try_init()
        .context("Failed to initialize logger")?;
    log::set_max_level(level);
    Ok(progress)
}

fn run(args: Args) -> Result<PathBuf> {
    let progress = init_logging(args.verbosity)?;

    let renderer = Ffmpeg::new(&args.config.tools.ffmpeg, progress);

    let idx = match Input::classify(&args.file)? {
        Input::Video => {
            renderer.check()?;
            debug!("{}: extracting subtitles from video", args.file.display());
            extract::extract_subs(&args.config.tools, &args.file, args.track)?
        }
        Input::Index => args.file,
    };

    process::process_idx(&idx, args.size, &args.config, &renderer)
}

fn main() {
    setup_panic!();

    let result = Command::parse_from_env().and_then(|command| match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(None)
        }
        Command::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
            Ok(None)
        }
        Command::Run(args) => run(args).map(Some),
    });

    match result {
        Ok(Some(script)) => println!("{}", script.display()),
        Ok(None) => {}
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(1);
        }
    }
}
