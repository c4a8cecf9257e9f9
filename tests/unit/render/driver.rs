use super::*;

#[test]
fn pad_width_is_at_least_four() {
    assert_eq!(pad_width(1), 4);
    assert_eq!(pad_width(216), 4);
    assert_eq!(pad_width(9999), 4);
    assert_eq!(pad_width(10_000), 5);
    assert_eq!(pad_width(1_234_567), 7);
}

#[test]
fn frame_file_names_sort_lexicographically() {
    assert_eq!(frame_file_name(1, 4), "frame_0001.png");
    assert_eq!(frame_file_name(216, 4), "frame_0216.png");
    assert_eq!(frame_file_name(12, 5), "frame_00012.png");

    let mut names: Vec<String> = (1..=150).map(|n| frame_file_name(n, 4)).collect();
    let sorted = {
        let mut v = names.clone();
        v.sort();
        v
    };
    assert_eq!(names, sorted);
    names.dedup();
    assert_eq!(names.len(), 150);
}

#[test]
fn pattern_matches_file_names() {
    assert_eq!(frame_pattern(4), "frame_%04d.png");
    assert_eq!(frame_pattern(6), "frame_%06d.png");
}

#[test]
fn progress_spans_zero_to_one_inclusive() {
    assert_eq!(progress_for(0, 72), 0.0);
    assert_eq!(progress_for(71, 72), 1.0);
    let mid = progress_for(35, 72);
    assert!(mid > 0.0 && mid < 1.0);
}

#[test]
fn single_frame_scene_sits_at_full_progress() {
    assert_eq!(progress_for(0, 1), 1.0);
}

#[test]
fn progress_is_monotonic_within_a_scene() {
    let mut prev = -1.0;
    for local in 0..24 {
        let p = progress_for(local, 24);
        assert!(p > prev);
        assert!((0.0..=1.0).contains(&p));
        prev = p;
    }
}

#[test]
fn render_rejects_degenerate_inputs() {
    let driver = AnimationDriver::new(Canvas::HD, Vec::new(), DriverThreading::default());
    let palette = Palette::from_input(&[]);
    let scene = Scene {
        text: "Hi.".into(),
        index: 0,
        total: 1,
    };
    let dir = std::env::temp_dir().join("reelsmith-driver-degenerate");

    assert!(
        driver
            .render(&[scene.clone()], &palette, "T", 0, &dir)
            .is_err()
    );
    assert!(driver.render(&[], &palette, "T", 10, &dir).is_err());
}

#[test]
fn zero_threads_is_rejected() {
    assert!(build_thread_pool(Some(0)).is_err());
    assert!(build_thread_pool(Some(1)).is_ok());
    assert!(build_thread_pool(None).is_ok());
}
