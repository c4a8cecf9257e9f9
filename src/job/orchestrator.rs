use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{error, info};

use crate::encode::ffmpeg::{EncodeConfig, encode_sequence};
use crate::foundation::core::{Canvas, Fps};
use crate::foundation::error::{ReelError, ReelResult};
use crate::palette::normalize::Palette;
use crate::render::driver::{AnimationDriver, DriverThreading};
use crate::script::segment::segment;

/// One timeline entry. Append-only per job; completes exactly once and never reverses.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Checkpoint {
    pub label: String,
    pub detail: Option<String>,
    pub completed: bool,
}

/// Linear job stages. `Failed` is absorbing and reachable from any non-terminal stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum JobStage {
    Segmenting,
    Rendering,
    Encoding,
    Done,
    Failed,
}

/// A single generation job and its public progress record.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Job {
    pub job_id: String,
    pub stage: JobStage,
    pub timeline: Vec<Checkpoint>,
    pub frame_count: u64,
    /// Populated only once the encoded artifact is confirmed written.
    pub video_path: Option<PathBuf>,
}

impl Job {
    pub fn new() -> Self {
        Self {
            job_id: new_job_id(),
            stage: JobStage::Segmenting,
            timeline: Vec::new(),
            frame_count: 0,
            video_path: None,
        }
    }

    fn begin_checkpoint(&mut self, label: &str) -> usize {
        self.timeline.push(Checkpoint {
            label: label.to_string(),
            detail: None,
            completed: false,
        });
        self.timeline.len() - 1
    }

    fn complete_checkpoint(&mut self, idx: usize, detail: Option<String>) {
        let cp = &mut self.timeline[idx];
        debug_assert!(!cp.completed, "checkpoint completes exactly once");
        cp.detail = detail;
        cp.completed = true;
    }
}

impl Default for Job {
    fn default() -> Self {
        Self::new()
    }
}

/// Validated request fields as supplied by the request boundary.
///
/// Bounds checks (title/script/style lengths, palette arity) belong to the boundary;
/// the orchestrator tolerates anything and falls back deterministically.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct JobRequest {
    pub title: String,
    pub script: String,
    /// Informational only; carried through metadata, not consumed by rendering math.
    pub style: String,
    pub palette: Vec<String>,
}

/// Orchestrator configuration shared across jobs.
#[derive(Clone, Debug)]
pub struct JobOpts {
    /// Scratch root; each job renders under `<work_dir>/<job_id>/frames`.
    pub work_dir: PathBuf,
    /// Durable artifact root; each job writes `<out_dir>/<job_id>.mp4`.
    pub out_dir: PathBuf,
    pub canvas: Canvas,
    pub fps: Fps,
    pub frames_per_scene: u64,
    pub threading: DriverThreading,
}

impl JobOpts {
    pub fn new(work_dir: impl Into<PathBuf>, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
            out_dir: out_dir.into(),
            canvas: Canvas::HD,
            fps: Fps(24),
            frames_per_scene: 72,
            threading: DriverThreading::default(),
        }
    }
}

static JOB_SEQ: AtomicU64 = AtomicU64::new(0);

/// Opaque unique job token; namespaces all transient and durable paths so concurrent
/// jobs on one machine never collide.
fn new_job_id() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let seq = JOB_SEQ.fetch_add(1, Ordering::Relaxed);
    format!("job-{}-{:x}-{}", std::process::id(), nanos, seq)
}

/// Best-effort scratch cleanup on every exit path: the transient frame sequence is
/// discarded after a successful encode and must not leak after a failure either.
struct ScratchGuard(Option<PathBuf>);

impl Drop for ScratchGuard {
    fn drop(&mut self) {
        if let Some(dir) = self.0.take() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

/// Run one job through Segmenting → Rendering → Encoding → Done.
///
/// On any stage failure the job is marked `Failed`, scratch state is cleaned up
/// best-effort, no artifact path is exposed, and the single underlying error surfaces.
/// Checkpoints completed before the failure stay visible on the job.
pub fn run_job(job: &mut Job, req: &JobRequest, opts: &JobOpts, font_bytes: Vec<u8>) -> ReelResult<PathBuf> {
    let scratch = opts.work_dir.join(&job.job_id);
    let guard = ScratchGuard(Some(scratch.clone()));

    let result = run_stages(job, req, opts, font_bytes, &scratch);
    match &result {
        Ok(path) => {
            info!(job = %job.job_id, artifact = %path.display(), "job complete");
        }
        Err(e) => {
            job.stage = JobStage::Failed;
            // Never expose a partial artifact under the job's public path.
            let _ = std::fs::remove_file(public_artifact_path(opts, &job.job_id));
            error!(job = %job.job_id, error = %e, "job failed");
        }
    }
    drop(guard);
    result
}

fn run_stages(
    job: &mut Job,
    req: &JobRequest,
    opts: &JobOpts,
    font_bytes: Vec<u8>,
    scratch: &Path,
) -> ReelResult<PathBuf> {
    if opts.frames_per_scene == 0 {
        return Err(ReelError::validation("frames_per_scene must be > 0"));
    }

    // Segmenting. Input problems never surface: segmentation and palette
    // normalization both repair via fixed fallbacks.
    let cp = job.begin_checkpoint("Segment script");
    let scenes = segment(&req.script);
    let palette = Palette::from_input(&req.palette);
    job.complete_checkpoint(cp, Some(format!("{} scenes", scenes.len())));
    job.stage = JobStage::Rendering;
    info!(job = %job.job_id, scenes = scenes.len(), palette = palette.len(), "segmented");

    // Rendering.
    let cp = job.begin_checkpoint("Render frames");
    let frames_dir = scratch.join("frames");
    let driver = AnimationDriver::new(opts.canvas, font_bytes, opts.threading.clone());
    let sequence = driver.render(
        &scenes,
        &palette,
        &req.title,
        opts.frames_per_scene,
        &frames_dir,
    )?;
    job.frame_count = sequence.frame_count;
    job.complete_checkpoint(cp, Some(format!("{} frames", sequence.frame_count)));
    job.stage = JobStage::Encoding;
    info!(job = %job.job_id, frames = sequence.frame_count, "rendered");

    // Encoding.
    let cp = job.begin_checkpoint("Encode video");
    let out_path = public_artifact_path(opts, &job.job_id);
    let artifact = encode_sequence(&EncodeConfig {
        frames_dir,
        pattern: sequence.pattern,
        fps: opts.fps.0,
        width: opts.canvas.width,
        height: opts.canvas.height,
        out_path,
        overwrite: true,
    })?;
    job.complete_checkpoint(cp, Some(artifact.display().to_string()));
    job.video_path = Some(artifact.clone());
    job.stage = JobStage::Done;

    Ok(artifact)
}

fn public_artifact_path(opts: &JobOpts, job_id: &str) -> PathBuf {
    opts.out_dir.join(format!("{job_id}.mp4"))
}

#[cfg(test)]
#[path = "../../tests/unit/job/orchestrator.rs"]
mod tests;
