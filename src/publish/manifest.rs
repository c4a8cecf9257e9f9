use std::path::{Path, PathBuf};

use tracing::info;

use crate::encode::ffmpeg::ensure_parent_dir;
use crate::foundation::error::{ReelError, ReelResult};
use crate::job::orchestrator::{Job, JobRequest};

/// Maximum characters kept from the script when building the bundle summary.
pub const SUMMARY_MAX_CHARS: usize = 180;

/// Publishing destination presets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Feed,
    Shorts,
    Square,
}

impl Destination {
    pub const ALL: [Destination; 3] = [Destination::Feed, Destination::Shorts, Destination::Square];

    pub fn slug(self) -> &'static str {
        match self {
            Destination::Feed => "feed",
            Destination::Shorts => "shorts",
            Destination::Square => "square",
        }
    }

    /// Display aspect ratio advertised to the destination. The artifact itself is
    /// always the canvas resolution; downstream crops are the destination's concern.
    pub fn aspect_ratio(self) -> &'static str {
        match self {
            Destination::Feed => "16:9",
            Destination::Shorts => "9:16",
            Destination::Square => "1:1",
        }
    }

    /// Suffix appended to the job title for this destination.
    fn title_suffix(self) -> &'static str {
        match self {
            Destination::Feed => "",
            Destination::Shorts => " #Shorts",
            Destination::Square => " • Square Cut",
        }
    }

    fn caption_suffix(self) -> &'static str {
        match self {
            Destination::Feed => "Watch the full story.",
            Destination::Shorts => "Tap to watch now!",
            Destination::Square => "New drop, right here.",
        }
    }
}

impl std::str::FromStr for Destination {
    type Err = ReelError;

    fn from_str(s: &str) -> ReelResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feed" => Ok(Destination::Feed),
            "shorts" => Ok(Destination::Shorts),
            "square" => Ok(Destination::Square),
            other => Err(ReelError::validation(format!(
                "unknown destination '{other}' (expected feed, shorts or square)"
            ))),
        }
    }
}

/// Per-destination sidecar record written next to the encoded artifact.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MetadataBundle {
    pub job_id: String,
    pub destination: Destination,
    pub title: String,
    pub caption: String,
    pub summary: String,
    pub style: String,
    pub palette: Vec<String>,
    pub aspect_ratio: String,
    pub video_path: PathBuf,
    pub frame_count: u64,
}

/// Truncate `text` to at most `max_chars` characters, appending a single ellipsis
/// when anything was cut. Cuts on char boundaries, never inside a code point.
pub fn truncate_summary(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let kept: String = trimmed.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

/// Build the metadata bundle for one destination of a finished job.
pub fn build_bundle(
    job: &Job,
    req: &JobRequest,
    palette: &[String],
    dest: Destination,
) -> ReelResult<MetadataBundle> {
    let video_path = job
        .video_path
        .clone()
        .ok_or_else(|| ReelError::validation("job has no encoded artifact to publish"))?;

    Ok(MetadataBundle {
        job_id: job.job_id.clone(),
        destination: dest,
        title: format!("{}{}", req.title, dest.title_suffix()),
        caption: format!("{} {}", req.title, dest.caption_suffix()),
        summary: truncate_summary(&req.script, SUMMARY_MAX_CHARS),
        style: req.style.clone(),
        palette: palette.to_vec(),
        aspect_ratio: dest.aspect_ratio().to_string(),
        video_path,
        frame_count: job.frame_count,
    })
}

/// Write one JSON bundle per destination as `<dir>/<job_id>.<destination>.json`.
///
/// Returns the written paths in destination order.
pub fn write_bundles(
    job: &Job,
    req: &JobRequest,
    palette: &[String],
    destinations: &[Destination],
    dir: &Path,
) -> ReelResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(destinations.len());
    for &dest in destinations {
        let bundle = build_bundle(job, req, palette, dest)?;
        let path = dir.join(format!("{}.{}.json", job.job_id, dest.slug()));
        ensure_parent_dir(&path)?;
        let json = serde_json::to_string_pretty(&bundle)
            .map_err(|e| ReelError::io(format!("serialize bundle: {e}")))?;
        std::fs::write(&path, json)
            .map_err(|e| ReelError::io(format!("write bundle '{}': {e}", path.display())))?;
        info!(dest = dest.slug(), path = %path.display(), "wrote metadata bundle");
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
#[path = "../../tests/unit/publish/manifest.rs"]
mod tests;
