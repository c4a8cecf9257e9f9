use super::*;

fn request() -> JobRequest {
    JobRequest {
        title: "Launch".into(),
        script: "Hello. World!".into(),
        style: "energetic".into(),
        palette: vec![],
    }
}

#[test]
fn new_job_starts_at_segmenting_with_empty_timeline() {
    let job = Job::new();
    assert_eq!(job.stage, JobStage::Segmenting);
    assert!(job.timeline.is_empty());
    assert_eq!(job.frame_count, 0);
    assert!(job.video_path.is_none());
}

#[test]
fn job_ids_are_unique() {
    let ids: Vec<String> = (0..64).map(|_| new_job_id()).collect();
    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(ids.len(), deduped.len());
}

#[test]
fn checkpoints_complete_exactly_once_in_order() {
    let mut job = Job::new();
    let a = job.begin_checkpoint("first");
    let b = job.begin_checkpoint("second");
    assert!(!job.timeline[a].completed);
    assert!(!job.timeline[b].completed);

    job.complete_checkpoint(a, Some("done".into()));
    assert!(job.timeline[a].completed);
    assert_eq!(job.timeline[a].detail.as_deref(), Some("done"));
    assert!(!job.timeline[b].completed);

    job.complete_checkpoint(b, None);
    assert_eq!(
        job.timeline.iter().map(|c| c.label.as_str()).collect::<Vec<_>>(),
        vec!["first", "second"]
    );
}

#[test]
fn invalid_options_fail_the_job_before_any_checkpoint() {
    let root = std::env::temp_dir().join(format!("reelsmith-job-{}", new_job_id()));
    let mut opts = JobOpts::new(root.join("work"), root.join("out"));
    opts.frames_per_scene = 0;

    let mut job = Job::new();
    let err = run_job(&mut job, &request(), &opts, Vec::new()).unwrap_err();
    assert!(matches!(err, ReelError::Validation(_)));
    assert_eq!(job.stage, JobStage::Failed);
    assert!(job.timeline.is_empty());
    assert!(job.video_path.is_none());
    // No scratch or artifact directories survive the failure.
    assert!(!root.join("work").join(&job.job_id).exists());
    assert!(!root.join("out").join(format!("{}.mp4", job.job_id)).exists());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn rendering_failure_keeps_earlier_checkpoints() {
    // Empty font bytes make the rendering stage fail after segmentation completed.
    let root = std::env::temp_dir().join(format!("reelsmith-job-{}", new_job_id()));
    let opts = JobOpts::new(root.join("work"), root.join("out"));

    let mut job = Job::new();
    let err = run_job(&mut job, &request(), &opts, Vec::new()).unwrap_err();
    assert!(matches!(err, ReelError::Render(_)));
    assert_eq!(job.stage, JobStage::Failed);

    assert_eq!(job.timeline.len(), 2);
    assert_eq!(job.timeline[0].label, "Segment script");
    assert!(job.timeline[0].completed);
    assert_eq!(job.timeline[0].detail.as_deref(), Some("2 scenes"));
    assert_eq!(job.timeline[1].label, "Render frames");
    assert!(!job.timeline[1].completed);

    assert!(job.video_path.is_none());
    assert!(!root.join("work").join(&job.job_id).exists());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn artifact_path_is_namespaced_by_job_id() {
    let opts = JobOpts::new("/tmp/w", "/tmp/o");
    let p = public_artifact_path(&opts, "job-1-2-3");
    assert_eq!(p, std::path::PathBuf::from("/tmp/o/job-1-2-3.mp4"));
}
