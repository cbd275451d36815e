//! Pulls an `*.idx`/`*.sub` pair out of a video with ffprobe and mkvextract.

use crate::config::Tools;
use crate::error::FabError;
use crate::render::check_tool;
use anyhow::{Context, Error, Result};
use log::{debug, info, trace, warn};
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

const DVD_SUBTITLE: &str = "dvd_subtitle";
const MATROSKA_EXTENSIONS: [&str; 4] = ["mkv", "mka", "mk3d", "webm"];

#[derive(Debug, Clone, Deserialize)]
pub struct Probe {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProbeStream {
    pub index: usize,
    pub codec_name: Option<String>,
    pub codec_type: Option<String>,
    pub tags: Option<StreamTags>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StreamTags {
    pub language: Option<String>,
}

impl ProbeStream {
    fn is_dvd_subtitle(&self) -> bool {
        self.codec_name.as_deref() == Some(DVD_SUBTITLE)
    }

    fn language(&self) -> Option<&str> {
        self.tags.as_ref()?.language.as_deref()
    }
}

pub fn select_stream(streams: &[ProbeStream], track: Option<usize>) -> Result<&ProbeStream, FabError> {
    match track {
        Some(track) => match streams.iter().find(|stream| stream.index == track) {
            Some(stream) if stream.is_dvd_subtitle() => Ok(stream),
            Some(stream) => {
                debug!(
                    "stream {} is a {} {} stream",
                    track,
                    stream.codec_name.as_deref().unwrap_or("unknown"),
                    stream.codec_type.as_deref().unwrap_or("unknown")
                );
                Err(FabError::NotDvdSubtitle(track))
            }
            None => Err(FabError::NoStreamAtIndex(track)),
        },
        None => streams
            .iter()
            .find(|stream| stream.is_dvd_subtitle())
            .ok_or(FabError::NoDvdSubtitle),
    }
}

fn run(command: &mut Command) -> Result<Vec<u8>> {
    debug!("running {:?}", command);
    let program = command.get_program().to_string_lossy().into_owned();
    let output = command
        .output()
        .with_context(|| format!("Failed to run {}", program))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(Error::msg(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        )))
    }
}

pub fn probe_streams(ffprobe: &Path, file: &Path) -> Result<Vec<ProbeStream>> {
    let stdout = run(Command::new(ffprobe)
        .args(["-v", "quiet", "-of", "json", "-show_streams"])
        .arg(file))
    .with_context(|| format!("{}: Failed to probe streams", file.display()))?;

    let probe: Probe = serde_json::from_slice(&stdout)
        .with_context(|| format!("{}: Failed to parse ffprobe output", file.display()))?;
    trace!("{}: found {} stream(s)", file.display(), probe.streams.len());
    Ok(probe.streams)
}

pub fn is_matroska(file: &Path) -> bool {
    file.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            MATROSKA_EXTENSIONS
                .iter()
                .any(|mkv| ext.eq_ignore_ascii_case(mkv))
        })
}

/// `<dir>/<stem>.<suffix>`, next to `file`.
fn sibling(file: &Path, suffix: &str) -> PathBuf {
    let mut name = file.file_stem().map(OsString::from).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    file.with_file_name(name)
}

/// Extracts the chosen (or first) `dvd_subtitle` stream of `file` and returns the
/// path of the `*.idx` file. mkvextract writes the `*.sub` file next to it.
pub fn extract_subs(tools: &Tools, file: &Path, track: Option<usize>) -> Result<PathBuf> {
    check_tool(&tools.mkvextract, &["-h"], "--mkvextract")?;
    check_tool(&tools.ffprobe, &["-version"], "--ffprobe")?;

    let streams = probe_streams(&tools.ffprobe, file)?;
    let stream = select_stream(&streams, track)?;
    debug!(
        "{}: Using subtitle stream at index {} ({})",
        file.display(),
        stream.index,
        stream.language().unwrap_or("no language")
    );

    let idx = sibling(
        file,
        &format!(
            "{}.idx",
            stream
                .language()
                .map(str::to_string)
                .unwrap_or_else(|| stream.index.to_string())
        ),
    );

    let remuxed = if is_matroska(file) {
        None
    } else {
        info!(
            "Video is not a matroska, muxing the desired stream ({})",
            stream.index
        );
        let mkv = sibling(file, &format!("{}.mkv", stream.index));
        run(Command::new(&tools.ffmpeg)
            .args(["-loglevel", "warning", "-i"])
            .arg(file)
            .arg("-map")
            .arg(format!("0:{}", stream.index))
            .args(["-c:s", "copy", "-f", "matroska"])
            .arg(&mkv)
            .arg("-y"))
        .with_context(|| format!("{}: Failed to remux subtitle stream", file.display()))?;
        Some(mkv)
    };

    let (source, track_id) = match &remuxed {
        Some(mkv) => (mkv.as_path(), 0),
        None => (file, stream.index),
    };

    let mut track_spec = OsString::from(format!("{}:", track_id));
    track_spec.push(&idx);
    let result = run(Command::new(&tools.mkvextract)
        .arg("tracks")
        .arg(source)
        .arg(track_spec))
    .with_context(|| format!("{}: Failed to extract subtitles", file.display()));

    if let Some(mkv) = remuxed {
        if let Err(err) = fs::remove_file(&mkv) {
            warn!("{}: Failed to remove: {}", mkv.display(), err);
        }
    }
    result?;

    info!("{}: Extracted subtitles to {}", file.display(), idx.display());
    Ok(idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROBE: &str = r#"{
        "streams": [
            { "index": 0, "codec_name": "h264", "codec_type": "video" },
            { "index": 1, "codec_name": "ac3", "codec_type": "audio", "tags": { "language": "eng" } },
            { "index": 2, "codec_name": "subrip", "codec_type": "subtitle" },
            { "index": 3, "codec_name": "dvd_subtitle", "codec_type": "subtitle", "tags": { "language": "fre" } },
            { "index": 4, "codec_name": "dvd_subtitle", "codec_type": "subtitle" }
        ]
    }"#;

    fn streams() -> Vec<ProbeStream> {
        serde_json::from_str::<Probe>(PROBE).unwrap().streams
    }

    #[test]
    fn first_dvd_subtitle() {
        let streams = streams();
        let stream = select_stream(&streams, None).unwrap();
        assert_eq!(stream.index, 3);
        assert_eq!(stream.language(), Some("fre"));
    }

    #[test]
    fn explicit_track() {
        let streams = streams();
        assert_eq!(select_stream(&streams, Some(4)).unwrap().index, 4);
        assert_eq!(
            select_stream(&streams, Some(2)).unwrap_err(),
            FabError::NotDvdSubtitle(2)
        );
        assert_eq!(
            select_stream(&streams, Some(9)).unwrap_err(),
            FabError::NoStreamAtIndex(9)
        );
    }

    #[test]
    fn no_dvd_subtitles() {
        let streams: Vec<_> = streams()
            .into_iter()
            .filter(|s| !s.is_dvd_subtitle())
            .collect();
        let err = select_stream(&streams, None).unwrap_err();
        assert_eq!(err, FabError::NoDvdSubtitle);
        assert_eq!(err.to_string(), "The video has no dvd_subtitle tracks.");
    }

    #[test]
    fn empty_probe() {
        let probe: Probe = serde_json::from_str("{}").unwrap();
        assert!(probe.streams.is_empty());
    }

    #[test]
    fn matroska() {
        assert!(is_matroska(Path::new("movie.mkv")));
        assert!(is_matroska(Path::new("movie.WEBM")));
        assert!(!is_matroska(Path::new("movie.mp4")));
        assert!(!is_matroska(Path::new("movie")));
    }

    #[test]
    fn sibling_names() {
        assert_eq!(
            sibling(Path::new("dir/movie.mp4"), "fre.idx"),
            Path::new("dir/movie.fre.idx")
        );
        assert_eq!(
            sibling(Path::new("movie.vob"), "3.mkv"),
            Path::new("movie.3.mkv")
        );
    }
}
