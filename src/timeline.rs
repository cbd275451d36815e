//! Remaps subtitles onto consecutive video frames so that an external renderer
//! outputs exactly one image per subtitle.

use crate::idx::{Index, Paragraph};
use crate::size::VideoSize;
use crate::time::Timestamp;
use itertools::Itertools;
use std::num::NonZeroU32;

const HEADER: &str = "# VobSub index file, v7 (do not modify this line!)";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct SyntheticEntry {
    pub timestamp: Timestamp,
    pub file_offset: u64,
}

/// Places paragraph `i` on frame `i + 1`. The renderer never overlays a subtitle on
/// its first frame, so frame 0 is left empty.
pub fn synthesize(paragraphs: &[Paragraph], fps: NonZeroU32) -> Vec<SyntheticEntry> {
    (1u64..)
        .zip(paragraphs)
        .map(|(frame, paragraph)| SyntheticEntry {
            timestamp: Timestamp::from_frame(frame, fps),
            file_offset: paragraph.file_offset,
        })
        .collect()
}

/// Builds the text of an `*.idx` file that references the original `*.sub` data at
/// the synthetic timestamps. Only a single English track is declared.
pub fn synthetic_index(index: &Index, size: VideoSize, entries: &[SyntheticEntry]) -> String {
    let header = [
        HEADER.to_string(),
        format!("size: {}", size),
        format!("palette: {}", index.palette.iter().join(", ")),
        "langidx: 0".to_string(),
        "id: en, index: 0".to_string(),
    ];
    let timestamps = entries.iter().map(|entry| {
        format!(
            "timestamp: {}, filepos: {:09x}",
            entry.timestamp.delimited(':'),
            entry.file_offset
        )
    });

    header.into_iter().chain(timestamps).join("\n")
}

/// What to ask the renderer for.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct RenderPlan {
    /// Paragraph count plus the discarded first frame.
    pub frames: usize,
    /// Whole seconds of canvas, with one second of slack so the last frame isn't cut.
    pub duration_secs: u64,
}

impl RenderPlan {
    pub fn new(paragraphs: usize, fps: NonZeroU32) -> Self {
        Self {
            frames: paragraphs + 1,
            duration_secs: (paragraphs as u64).div_ceil(u64::from(fps.get())) + 1,
        }
    }
}
