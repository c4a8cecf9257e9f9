use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::info;

use crate::foundation::error::{ReelError, ReelResult};

/// Configuration for encoding a persisted frame sequence into one MP4.
#[derive(Clone, Debug)]
pub struct EncodeConfig {
    /// Directory holding the numbered PNG frames.
    pub frames_dir: PathBuf,
    /// ffmpeg `image2` numeric pattern (e.g. `frame_%04d.png`).
    pub pattern: String,
    /// Input and output frame rate.
    pub fps: u32,
    /// Output width; must be even for yuv420p.
    pub width: u32,
    /// Output height; must be even for yuv420p.
    pub height: u32,
    /// Output MP4 path.
    pub out_path: PathBuf,
    /// Overwrite the output file if it already exists.
    pub overwrite: bool,
}

impl EncodeConfig {
    pub fn validate(&self) -> ReelResult<()> {
        if self.fps == 0 {
            return Err(ReelError::validation("encode fps must be > 0"));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ReelError::validation("encode width/height must be > 0"));
        }
        if !self.width.is_multiple_of(2) || !self.height.is_multiple_of(2) {
            return Err(ReelError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if !self.pattern.contains('%') {
            return Err(ReelError::validation(
                "encode pattern must be an ffmpeg numeric pattern (e.g. frame_%04d.png)",
            ));
        }
        Ok(())
    }
}

/// Encode the frame sequence by driving the system `ffmpeg` binary.
///
/// Output is H.264 + yuv420p with the container index relocated for progressive playback
/// (`+faststart`), scaled to the configured resolution (a no-op when frames already
/// match). Succeeds only on clean process exit; on failure the partial output file is
/// removed and nothing is retried.
pub fn encode_sequence(cfg: &EncodeConfig) -> ReelResult<PathBuf> {
    cfg.validate()?;

    ensure_parent_dir(&cfg.out_path)?;
    if !cfg.overwrite && cfg.out_path.exists() {
        return Err(ReelError::validation(format!(
            "output file '{}' already exists",
            cfg.out_path.display()
        )));
    }

    if !is_ffmpeg_on_path() {
        return Err(ReelError::encode(
            "ffmpeg is required for MP4 encoding, but was not found on PATH",
        ));
    }

    let input = cfg.frames_dir.join(&cfg.pattern);
    let scale = format!("scale={}:{}", cfg.width, cfg.height);

    let mut cmd = Command::new("ffmpeg");
    cmd.arg(if cfg.overwrite { "-y" } else { "-n" })
        .args(["-loglevel", "error"])
        .args(["-framerate", &cfg.fps.to_string()])
        .args(["-start_number", "1"])
        .arg("-i")
        .arg(&input)
        .args(["-c:v", "libx264"])
        .args(["-pix_fmt", "yuv420p"])
        .args(["-vf", &scale])
        .args(["-r", &cfg.fps.to_string()])
        .args(["-movflags", "+faststart"])
        .arg(&cfg.out_path)
        .stdin(Stdio::null());

    let out = cmd.output().map_err(|e| {
        ReelError::encode(format!(
            "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
        ))
    })?;

    if !out.status.success() {
        // No partial artifact survives a failed encode.
        let _ = std::fs::remove_file(&cfg.out_path);
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(ReelError::encode(format!(
            "ffmpeg exited with status {}: {}",
            out.status,
            stderr.trim()
        )));
    }

    if !cfg.out_path.exists() {
        return Err(ReelError::encode(format!(
            "ffmpeg reported success but '{}' was not written",
            cfg.out_path.display()
        )));
    }

    info!(out = %cfg.out_path.display(), fps = cfg.fps, "encoded video artifact");
    Ok(cfg.out_path.clone())
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> ReelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::io(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
