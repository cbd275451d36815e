use crate::idx::Paragraph;
use crate::size::VideoSize;
use crate::time::{Duration, Timestamp};
use itertools::Itertools;
use log::{debug, warn};
use std::fmt;

/// `*.idx` files carry no end times, so every subtitle is shown for at most this long.
pub const MAX_DURATION: Duration = Duration::from_ms(6000);
/// Minimum blank time left before the next subtitle appears.
pub const MIN_GAP: Duration = Duration::from_ms(500);

/// One line of the image script.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct DisplayWindow {
    pub frame: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for DisplayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.png {} {} {} {} {} {}",
            self.frame,
            self.start.delimited(';'),
            self.end.delimited(';'),
            self.x,
            self.y,
            self.width,
            self.height
        )
    }
}

fn end_time(paragraph: &Paragraph, next: Option<&Paragraph>) -> Timestamp {
    let capped = paragraph.start + MAX_DURATION;
    let end = match next {
        Some(next) => capped.min(next.start - MIN_GAP),
        None => capped,
    };

    if end <= paragraph.start {
        debug!(
            "subtitle at {} is followed too closely, showing it for 1ms",
            paragraph.start
        );
        paragraph.start + Duration::from_ms(1)
    } else {
        end
    }
}

pub fn generate<S: AsRef<str>>(
    paragraphs: &[Paragraph],
    size: VideoSize,
    frame_labels: &[S],
) -> Vec<DisplayWindow> {
    if frame_labels.len() < paragraphs.len() {
        warn!(
            "only {} frame(s) for {} subtitle(s), the rest are left out",
            frame_labels.len(),
            paragraphs.len()
        );
    }

    paragraphs
        .iter()
        .zip(frame_labels)
        .enumerate()
        .map(|(i, (paragraph, label))| DisplayWindow {
            frame: label.as_ref().to_string(),
            start: paragraph.start,
            end: end_time(paragraph, paragraphs.get(i + 1)),
            x: 0,
            y: 0,
            width: size.width(),
            height: size.height(),
        })
        .collect()
}

pub fn render_script(windows: &[DisplayWindow]) -> String {
    windows.iter().join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraphs(starts: &[u64]) -> Vec<Paragraph> {
        starts
            .iter()
            .map(|&ms| Paragraph {
                start: Timestamp::from_ms(ms),
                file_offset: 0,
            })
            .collect()
    }

    fn size() -> VideoSize {
        VideoSize::new(720, 480).unwrap()
    }

    fn ends(starts: &[u64]) -> Vec<u64> {
        let paragraphs = paragraphs(starts);
        let labels = vec!["IMAGE"; paragraphs.len()];
        generate(&paragraphs, size(), &labels)
            .iter()
            .map(|w| w.end.as_millis())
            .collect()
    }

    #[test]
    fn end_time_heuristic() {
        let starts = [1000, 2000, 20000];
        let expected: Vec<u64> = vec![
            (1000 + 6000).min(2000 - 500),
            (2000 + 6000).min(20000 - 500),
            20000 + 6000,
        ];
        assert_eq!(expected, vec![1500, 8000, 26000]);
        assert_eq!(ends(&starts), expected);
    }

    #[test]
    fn close_subtitles_are_clamped() {
        assert_eq!(ends(&[1000, 1200, 1300]), vec![1001, 1201, 7300]);
        assert_eq!(ends(&[0, 100]), vec![1, 6100]);
    }

    #[test]
    fn windows() {
        let windows = generate(
            &paragraphs(&[1401, 62345]),
            size(),
            &["IMAGE001", "IMAGE002"],
        );
        assert_eq!(
            windows[0],
            DisplayWindow {
                frame: "IMAGE001".to_string(),
                start: Timestamp::from_ms(1401),
                end: Timestamp::from_ms(7401),
                x: 0,
                y: 0,
                width: 720,
                height: 480,
            }
        );
        assert_eq!(
            render_script(&windows),
            "IMAGE001.png 00;00;01;401 00;00;07;401 0 0 720 480\n\
             IMAGE002.png 00;01;02;345 00;01;08;345 0 0 720 480"
        );
    }

    #[test]
    fn missing_labels() {
        let windows = generate(&paragraphs(&[0, 10000, 20000]), size(), &["IMAGE001"]);
        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].end, Timestamp::from_ms(6000));
    }

    #[test]
    fn empty() {
        let windows = generate::<&str>(&[], size(), &[]);
        assert!(windows.is_empty());
        assert_eq!(render_script(&windows), "");
    }
}
