use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::debug;

use crate::compose::frame::{FrameCompositor, FrameRGBA, write_png};
use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};
use crate::palette::normalize::Palette;
use crate::script::segment::Scene;

/// Threading/chunking configuration for frame rendering.
///
/// Frame computation is embarrassingly parallel (each frame is a pure function of its
/// spec); emission order is not negotiable, so parallel chunks are always written back
/// in sequence order.
#[derive(Clone, Debug)]
pub struct DriverThreading {
    pub parallel: bool,
    pub chunk_size: usize,
    pub threads: Option<usize>,
}

impl Default for DriverThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Description of a persisted frame sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedSequence {
    /// Total frames written (`frames_per_scene × scene count`).
    pub frame_count: u64,
    /// Zero-pad width used in file names (4 minimum).
    pub pad: usize,
    /// ffmpeg-style numeric pattern matching the written files.
    pub pattern: String,
}

/// Zero-pad width for `total` frames: at least 4 digits, growing so that lexicographic
/// and numeric file ordering always agree.
pub fn pad_width(total: u64) -> usize {
    let mut digits = 1;
    let mut n = total;
    while n >= 10 {
        digits += 1;
        n /= 10;
    }
    digits.max(4)
}

/// File name of the 1-based frame `seq` at pad width `pad`.
pub fn frame_file_name(seq: u64, pad: usize) -> String {
    format!("frame_{seq:0pad$}.png")
}

/// ffmpeg `image2` input pattern matching [`frame_file_name`].
pub fn frame_pattern(pad: usize) -> String {
    format!("frame_%0{pad}d.png")
}

/// Local progress of frame `local` within a scene of `frames_per_scene` frames.
///
/// Spans [0, 1] inclusive; a single-frame scene sits at 1.0 rather than dividing by
/// zero.
pub fn progress_for(local: u64, frames_per_scene: u64) -> f64 {
    if frames_per_scene <= 1 {
        1.0
    } else {
        (local as f64) / ((frames_per_scene - 1) as f64)
    }
}

/// Renders every scene's frames into `frames_dir` as an ordered PNG sequence.
pub struct AnimationDriver {
    canvas: Canvas,
    font_bytes: Arc<Vec<u8>>,
    threading: DriverThreading,
}

impl AnimationDriver {
    pub fn new(canvas: Canvas, font_bytes: Vec<u8>, threading: DriverThreading) -> Self {
        Self {
            canvas,
            font_bytes: Arc::new(font_bytes),
            threading,
        }
    }

    /// Render `frames_per_scene` frames for each scene, in scene order then local
    /// chronological order, persisted under strictly increasing 1-based sequence
    /// numbers. Any frame write failure aborts the whole sequence.
    #[tracing::instrument(skip(self, scenes, palette, title), fields(scenes = scenes.len()))]
    pub fn render(
        &self,
        scenes: &[Scene],
        palette: &Palette,
        title: &str,
        frames_per_scene: u64,
        frames_dir: &Path,
    ) -> ReelResult<RenderedSequence> {
        if frames_per_scene == 0 {
            return Err(ReelError::validation("frames_per_scene must be > 0"));
        }
        if scenes.is_empty() {
            return Err(ReelError::validation("scene list must be non-empty"));
        }

        let frame_count = frames_per_scene
            .checked_mul(scenes.len() as u64)
            .ok_or_else(|| ReelError::validation("frame count overflow"))?;
        let pad = pad_width(frame_count);

        std::fs::create_dir_all(frames_dir).map_err(|e| {
            ReelError::io(format!(
                "create frames dir '{}': {e}",
                frames_dir.display()
            ))
        })?;

        if self.threading.parallel {
            self.render_parallel(scenes, palette, title, frames_per_scene, frames_dir, pad)?;
        } else {
            self.render_sequential(scenes, palette, title, frames_per_scene, frames_dir, pad)?;
        }

        Ok(RenderedSequence {
            frame_count,
            pad,
            pattern: frame_pattern(pad),
        })
    }

    fn render_sequential(
        &self,
        scenes: &[Scene],
        palette: &Palette,
        title: &str,
        frames_per_scene: u64,
        frames_dir: &Path,
        pad: usize,
    ) -> ReelResult<()> {
        let mut compositor =
            FrameCompositor::new(self.canvas, self.font_bytes.as_ref().clone())?;

        let mut seq = 0u64;
        for scene in scenes {
            for local in 0..frames_per_scene {
                seq += 1;
                let progress = progress_for(local, frames_per_scene);
                let frame = compositor.composite(scene, progress, palette, title)?;
                write_png(&frame, &frames_dir.join(frame_file_name(seq, pad)))?;
            }
            debug!(scene = scene.index, frames = frames_per_scene, "scene rendered");
        }
        Ok(())
    }

    fn render_parallel(
        &self,
        scenes: &[Scene],
        palette: &Palette,
        title: &str,
        frames_per_scene: u64,
        frames_dir: &Path,
        pad: usize,
    ) -> ReelResult<()> {
        let pool = build_thread_pool(self.threading.threads)?;
        let chunk_size = (self.threading.chunk_size.max(1)) as u64;
        let total = frames_per_scene * scenes.len() as u64;

        let mut chunk_start = 1u64;
        while chunk_start <= total {
            let chunk_end = (chunk_start + chunk_size - 1).min(total);
            let seqs: Vec<u64> = (chunk_start..=chunk_end).collect();

            // Compute in parallel; collect preserves input order, then writes happen
            // sequentially so on-disk emission order matches sequence order.
            let frames: Vec<Result<FrameRGBA, String>> = pool.install(|| {
                seqs.par_iter()
                    .map_init(
                        || {
                            FrameCompositor::new(
                                self.canvas,
                                self.font_bytes.as_ref().clone(),
                            )
                            .map_err(|e| e.to_string())
                        },
                        |compositor, &seq| -> Result<FrameRGBA, String> {
                            let compositor = compositor.as_mut().map_err(|e| e.clone())?;
                            let scene_idx = ((seq - 1) / frames_per_scene) as usize;
                            let local = (seq - 1) % frames_per_scene;
                            compositor
                                .composite(
                                    &scenes[scene_idx],
                                    progress_for(local, frames_per_scene),
                                    palette,
                                    title,
                                )
                                .map_err(|e| e.to_string())
                        },
                    )
                    .collect()
            });

            for (&seq, frame) in seqs.iter().zip(frames) {
                let frame = frame.map_err(ReelError::render)?;
                write_png(&frame, &frames_dir.join(frame_file_name(seq, pad)))?;
            }
            chunk_start = chunk_end + 1;
        }
        Ok(())
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "driver threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::render(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/driver.rs"]
mod tests;
