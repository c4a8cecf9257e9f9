//! Reelsmith turns a marketing script into a finished promo video.
//!
//! The pipeline is a fixed linear flow:
//!
//! 1. **Segment**: split the script into ordered scenes, one per sentence
//! 2. **Normalize**: repair the brand palette (or fall back wholesale)
//! 3. **Render**: composite every animation frame and persist an ordered PNG sequence
//! 4. **Encode**: drive the system `ffmpeg` binary to produce one MP4 artifact
//! 5. **Publish**: emit per-destination metadata bundles next to the artifact
//!
//! Frame composition is deterministic: a frame is a pure function of
//! `(scene, progress, palette, title)`, so identical requests produce byte-identical
//! pixels. All external IO (fonts up front, frames and video at the edges) stays out
//! of the compositing core.
#![forbid(unsafe_code)]

pub mod compose;
pub mod encode;
pub mod foundation;
pub mod job;
pub mod palette;
pub mod publish;
pub mod render;
pub mod script;

pub use compose::frame::{FrameCompositor, FrameRGBA};
pub use foundation::core::{Canvas, Fps};
pub use foundation::error::{ReelError, ReelResult};
pub use job::orchestrator::{Job, JobOpts, JobRequest, JobStage, run_job};
pub use palette::normalize::Palette;
pub use publish::manifest::{Destination, MetadataBundle};
pub use render::driver::{AnimationDriver, DriverThreading};
pub use script::segment::{Scene, segment};
