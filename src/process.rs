use crate::config::Config;
use crate::error::FabError;
use crate::idx::Index;
use crate::render::{RenderJob, Renderer};
use crate::script;
use crate::size::VideoSize;
use crate::timeline::{self, RenderPlan};
use anyhow::{Context, Result};
use log::{debug, info, trace, warn};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `<path><suffix>`, e.g. `movie.idx` -> `movie.idx.rw.idx`.
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    name.into()
}

fn resolve_size(override_size: Option<VideoSize>, index: &Index) -> Result<VideoSize, FabError> {
    match (override_size, &index.size) {
        (Some(size), _) => Ok(size),
        (None, Some(declared)) => declared.parse(),
        (None, None) => Err(FabError::MissingSize),
    }
}

fn remove(path: &Path) -> Result<()> {
    fs::remove_file(path).with_context(|| format!("{}: Failed to remove", path.display()))?;
    trace!("{}: removed", path.display());
    Ok(())
}

/// Turns the `*.idx` file at `path` (with its `*.sub` sibling) into rendered frames
/// and an image script. Returns the path of the script.
///
/// The temporary `*.rw.idx`/`*.rw.sub` files are left behind if rendering fails.
pub fn process_idx(
    path: &Path,
    size: Option<VideoSize>,
    config: &Config,
    renderer: &dyn Renderer,
) -> Result<PathBuf> {
    let content = fs::read(path).with_context(|| format!("{}: Failed to read", path.display()))?;
    let content = String::from_utf8_lossy(&content);
    let index = Index::parse(content.lines());
    debug!(
        "{}: {} subtitle(s), {} palette color(s), languages: [{}]",
        path.display(),
        index.paragraphs.len(),
        index.palette.len(),
        index
            .languages
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );
    if index.paragraphs.is_empty() {
        warn!("{}: Contained no subtitles", path.display());
    }

    let size = resolve_size(size, &index)?;
    renderer.check()?;

    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let out_dir = dir.join(&config.output_dir);

    let entries = timeline::synthesize(&index.paragraphs, config.fps);
    let rw_idx = with_suffix(path, ".rw.idx");
    let rw_sub = with_suffix(path, ".rw.sub");
    let sub = path.with_extension("sub");

    fs::write(&rw_idx, timeline::synthetic_index(&index, size, &entries))
        .with_context(|| format!("{}: Failed to write", rw_idx.display()))?;
    fs::copy(&sub, &rw_sub).with_context(|| {
        format!(
            "{}: Failed to copy to {}",
            sub.display(),
            rw_sub.display()
        )
    })?;
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("{}: Failed to create directory", out_dir.display()))?;

    let job = RenderJob {
        index: rw_idx.clone(),
        size,
        fps: config.fps,
        plan: RenderPlan::new(index.paragraphs.len(), config.fps),
        output: config.frames.pattern(&out_dir),
    };
    info!(
        "{}: Rendering {} subtitle(s) at {}",
        path.display(),
        index.paragraphs.len(),
        size
    );
    renderer.render(&job)?;

    remove(&rw_idx)?;
    remove(&rw_sub)?;
    let blank = config.frames.file(&out_dir, 0);
    match fs::remove_file(&blank) {
        Ok(()) => trace!("{}: removed", blank.display()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            warn!("{}: Renderer did not write the blank frame", blank.display())
        }
        Err(err) => {
            return Err(err).with_context(|| format!("{}: Failed to remove", blank.display()))
        }
    }

    let missing = (1..=index.paragraphs.len())
        .filter(|&frame| !config.frames.file(&out_dir, frame).exists())
        .count();
    if missing > 0 {
        warn!(
            "{}: {} of {} frame(s) were not rendered",
            out_dir.display(),
            missing,
            index.paragraphs.len()
        );
    }

    let labels = config.frames.labels(index.paragraphs.len());
    let windows = script::generate(&index.paragraphs, size, &labels);
    let out = out_dir.join(&config.script_name);
    fs::write(&out, script::render_script(&windows))
        .with_context(|| format!("{}: Failed to write script", out.display()))?;
    info!("{}: Wrote {} line(s)", out.display(), windows.len());

    Ok(out)
}
