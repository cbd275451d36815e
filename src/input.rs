use crate::error::FabError;
use std::path::Path;

const VIDEO_EXTENSIONS: [&str; 17] = [
    "mkv", "mk3d", "webm", "mp4", "m4v", "mov", "avi", "mpg", "mpeg", "vob", "ts", "m2ts",
    "mts", "wmv", "flv", "ogv", "3gp",
];

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Input {
    /// A container to extract a `dvd_subtitle` stream from.
    Video,
    Index,
}

impl Input {
    pub fn classify(path: &Path) -> Result<Self, FabError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "idx" => Ok(Input::Index),
            "sub" => Err(FabError::SubFile),
            ext if VIDEO_EXTENSIONS.contains(&ext) => Ok(Input::Video),
            _ => Err(FabError::UnrecognizedFormat),
        }
    }
}
