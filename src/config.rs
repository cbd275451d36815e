use crate::format::FrameName;
use std::num::NonZeroU32;
use std::path::PathBuf;

/// Locations of the external programs. The defaults can be baked in at build time
/// through the `FFMPEG`, `FFPROBE` and `MKVEXTRACT` environment variables.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Tools {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub mkvextract: PathBuf,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            ffmpeg: option_env!("FFMPEG").unwrap_or("ffmpeg").into(),
            ffprobe: option_env!("FFPROBE").unwrap_or("ffprobe").into(),
            mkvextract: option_env!("MKVEXTRACT").unwrap_or("mkvextract").into(),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Config {
    pub tools: Tools,
    /// Frame rate of the render pass. 30 avoids duplicated and skipped frames
    /// that lower rates ran into.
    pub fps: NonZeroU32,
    /// Directory, next to the `*.idx` file, that receives the frames and script.
    pub output_dir: String,
    pub script_name: String,
    pub frames: FrameName,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tools: Default::default(),
            fps: NonZeroU32::new(30).unwrap_or(NonZeroU32::MIN),
            output_dir: "fabscript".to_string(),
            script_name: "Fab_Image_script.txt".to_string(),
            frames: Default::default(),
        }
    }
}
