use crate::error::FabError;
use crate::size::VideoSize;
use crate::timeline::RenderPlan;
use anyhow::{Context, Error, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, trace};
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Everything the external renderer needs to turn a synthetic index into frames.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RenderJob {
    pub index: PathBuf,
    pub size: VideoSize,
    pub fps: NonZeroU32,
    pub plan: RenderPlan,
    /// `image2` style output pattern, e.g. `fabscript/IMAGE%03d.png`.
    pub output: PathBuf,
}

pub trait Renderer {
    /// Fails with [`FabError::ToolMissing`] if the renderer can't be run.
    fn check(&self) -> Result<()>;

    fn render(&self, job: &RenderJob) -> Result<()>;
}

pub struct Ffmpeg {
    executable: PathBuf,
    progress: MultiProgress,
}

impl Ffmpeg {
    pub fn new(executable: impl Into<PathBuf>, progress: MultiProgress) -> Self {
        Self {
            executable: executable.into(),
            progress,
        }
    }

    /// Overlays the subtitles on a transparent canvas and writes every frame as PNG.
    pub fn command(&self, job: &RenderJob) -> Command {
        let mut command = Command::new(&self.executable);

        command.arg("-loglevel").arg("warning");
        command.arg("-f").arg("lavfi");
        command.arg("-i").arg(format!(
            "color=size={}:duration={}:rate={}:color=black@0.0,format=rgba",
            job.size, job.plan.duration_secs, job.fps
        ));
        command.arg("-i").arg(&job.index);
        command.arg("-filter_complex").arg("[0:v][1:s]overlay[v]");
        command.arg("-map").arg("[v]");
        command.arg("-f").arg("image2");
        command.arg("-frame_pts").arg("true");
        command.arg("-c:s").arg("png");
        command.arg("-vsync").arg("0");
        command.arg("-frames:v").arg(job.plan.frames.to_string());
        command.arg(&job.output);
        command.arg("-y");

        command
    }
}

/// Runs `executable` with `args` to see whether it exists.
pub fn check_tool(executable: &Path, args: &[&str], flag: &'static str) -> Result<()> {
    let missing = || FabError::ToolMissing {
        tool: executable.to_string_lossy().into_owned(),
        flag,
    };

    match Command::new(executable).args(args).output() {
        Ok(output) if output.status.success() => {
            trace!("{}: found", executable.display());
            Ok(())
        }
        Ok(output) => {
            debug!(
                "{}: exited with {} when probed",
                executable.display(),
                output.status
            );
            Err(missing().into())
        }
        Err(err) => {
            debug!("{}: {}", executable.display(), err);
            Err(missing().into())
        }
    }
}

impl Renderer for Ffmpeg {
    fn check(&self) -> Result<()> {
        check_tool(&self.executable, &["-version"], "--ffmpeg")
    }

    fn render(&self, job: &RenderJob) -> Result<()> {
        let mut command = self.command(job);
        debug!("running {:?}", command);

        let spinner = self.progress.add(ProgressBar::new_spinner());
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg} [{elapsed}]")
                .context("Invalid progress template")?,
        );
        spinner.set_message(format!("Rendering {} frames", job.plan.frames));
        spinner.enable_steady_tick(Duration::from_millis(100));

        let output = command.output();
        spinner.finish_and_clear();
        self.progress.remove(&spinner);

        let output = output.with_context(|| {
            format!("Failed to run {}", self.executable.to_string_lossy())
        })?;
        if !output.status.success() {
            return Err(Error::msg(format!(
                "{} failed to render subtitles ({}): {}",
                self.executable.to_string_lossy(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        trace!("rendered {} frames", job.plan.frames);
        Ok(())
    }
}
