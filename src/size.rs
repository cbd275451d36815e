use crate::error::FabError;
use std::fmt;
use std::str::FromStr;

/// Canvas size of the video the subtitles belong to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct VideoSize {
    width: u32,
    height: u32,
}

impl VideoSize {
    pub fn new(width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            Some(Self { width, height })
        }
    }

    pub const fn width(&self) -> u32 {
        self.width
    }

    pub const fn height(&self) -> u32 {
        self.height
    }
}

impl FromStr for VideoSize {
    type Err = FabError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FabError::InvalidSize(s.to_string());

        let (width, height) = s.trim().split_once('x').ok_or_else(invalid)?;
        let width = width.trim().parse().map_err(|_| invalid())?;
        let height = height.trim().parse().map_err(|_| invalid())?;
        Self::new(width, height).ok_or_else(invalid)
    }
}

impl fmt::Display for VideoSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}
