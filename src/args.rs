use crate::config::Config;
use crate::size::VideoSize;
use anyhow::{Error, Result};
use log::LevelFilter;
use std::ffi::OsString;
use std::path::PathBuf;

pub const USAGE: &str = "\
Convert DVD subtitles to Adobe Encore image scripts

Usage: fabsub [OPTIONS] <FILE>

Arguments:
  <FILE>  the idx or video file to parse

Options:
      --size <WxH>          for idx files without a size value: specify video size
  -t, --track <INDEX>       for video files: specify a stream (by index) to extract
      --fps <FPS>           frame rate of the render pass [default: 30]
      --ffmpeg <PATH>       ffmpeg executable
      --ffprobe <PATH>      ffprobe executable
      --mkvextract <PATH>   mkvextract executable
  -v[v..]                   increase verbosity
  -h, --help                print help
  -V, --version             print version";

pub enum Command {
    Run(Args),
    Help,
    Version,
}

pub struct Args {
    pub file: PathBuf,
    pub size: Option<VideoSize>,
    pub track: Option<usize>,
    pub config: Config,
    pub verbosity: LevelFilter,
}

fn verbosity(value: Option<OsString>) -> Result<LevelFilter> {
    let Some(value) = value else {
        return Ok(LevelFilter::Warn);
    };
    match value.to_str() {
        Some("v") => Ok(LevelFilter::Info),
        Some("vv") => Ok(LevelFilter::Debug),
        Some("vvv") => Ok(LevelFilter::Trace),
        Some(val) => Err(Error::msg(format!(
            "\"{}\" is not a valid value for the verbosity flag \"-v\"",
            val
        ))),
        None => Err(Error::msg(format!(
            "Failed to parse verbosity option: Invalid unicode: {}",
            value.to_string_lossy()
        ))),
    }
}

impl Command {
    pub fn parse_from_env() -> Result<Self> {
        Self::parse(lexopt::Parser::from_env())
    }

    pub fn parse(mut parser: lexopt::Parser) -> Result<Self> {
        use lexopt::prelude::*;

        let mut file: Option<PathBuf> = None;
        let mut size = None;
        let mut track = None;
        let mut config = Config::default();
        let mut verbosity_level = LevelFilter::Error;

        while let Some(arg) = parser.next()? {
            match arg {
                Long("size") => {
                    size = Some(parser.value()?.parse()?);
                }
                Short('t') | Long("track") => {
                    track = Some(parser.value()?.parse()?);
                }
                Long("fps") => {
                    config.fps = parser.value()?.parse()?;
                }
                Long("ffmpeg") => {
                    config.tools.ffmpeg = parser.value()?.into();
                }
                Long("ffprobe") => {
                    config.tools.ffprobe = parser.value()?.into();
                }
                Long("mkvextract") => {
                    config.tools.mkvextract = parser.value()?.into();
                }
                Short('v') => {
                    verbosity_level = verbosity(parser.optional_value())?;
                }
                Short('h') | Long("help") => return Ok(Command::Help),
                Short('V') | Long("version") => return Ok(Command::Version),
                Value(val) if file.is_none() => {
                    file = Some(val.into());
                }
                _ => return Err(arg.unexpected().into()),
            }
        }

        let file = file.ok_or_else(|| {
            Error::msg("missing argument <FILE>, pass a video or .idx file (see --help)")
        })?;

        Ok(Command::Run(Args {
            file,
            size,
            track,
            config,
            verbosity: verbosity_level,
        }))
    }
}
