use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// Naming scheme of the rendered frames, `IMAGE001`, `IMAGE002`, ...
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct FrameName {
    prefix: String,
    width: NonZeroUsize,
}

impl Default for FrameName {
    fn default() -> Self {
        Self {
            prefix: "IMAGE".to_string(),
            width: NonZeroUsize::new(3).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl FrameName {
    /// Label of frame `index` without extension.
    pub fn label(&self, index: usize) -> String {
        format!(
            "{}{:0width$}",
            self.prefix,
            index,
            width = self.width.get()
        )
    }

    pub fn file(&self, dir: &Path, index: usize) -> PathBuf {
        dir.join(format!("{}.png", self.label(index)))
    }

    /// Labels of frames `1..=count`, the frames that carry a subtitle.
    pub fn labels(&self, count: usize) -> Vec<String> {
        (1..=count).map(|index| self.label(index)).collect()
    }

    /// `image2` muxer pattern matching [`FrameName::file`].
    pub fn pattern(&self, dir: &Path) -> PathBuf {
        dir.join(self.to_string())
    }
}

impl fmt::Display for FrameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%0{}d.png", self.prefix, self.width)
    }
}
