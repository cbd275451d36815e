use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FabError {
    SubFile,
    UnrecognizedFormat,
    MissingSize,
    InvalidSize(String),
    ToolMissing { tool: String, flag: &'static str },
    NoStreamAtIndex(usize),
    NotDvdSubtitle(usize),
    NoDvdSubtitle,
}

impl fmt::Display for FabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FabError::SubFile => write!(
                f,
                "Please pass a video or .idx file, not a .sub file. Plaintext .sub files are not supported."
            ),
            FabError::UnrecognizedFormat => write!(
                f,
                "Unrecognized file format provided. Please use a video or .idx file."
            ),
            FabError::MissingSize => write!(
                f,
                "Video size is required to accurately render subtitles. Please add a `size:` line to the source `.idx` file or specify the size with `--size 1920x1080`."
            ),
            FabError::InvalidSize(size) => write!(
                f,
                "\"{}\" is not a valid video size, expected WIDTHxHEIGHT (e.g. 1920x1080)",
                size
            ),
            FabError::ToolMissing { tool, flag } => write!(
                f,
                "{} was not found. Install it or point to it with `{} PATH`.",
                tool, flag
            ),
            FabError::NoStreamAtIndex(index) => {
                write!(f, "There was no stream at index {}.", index)
            }
            FabError::NotDvdSubtitle(index) => {
                write!(f, "There was no dvd_subtitle stream at index {}.", index)
            }
            FabError::NoDvdSubtitle => write!(f, "The video has no dvd_subtitle tracks."),
        }
    }
}

impl std::error::Error for FabError {}
