use super::*;

fn base_cfg() -> EncodeConfig {
    EncodeConfig {
        frames_dir: PathBuf::from("frames"),
        pattern: "frame_%04d.png".into(),
        fps: 24,
        width: 1280,
        height: 720,
        out_path: PathBuf::from("out/video.mp4"),
        overwrite: true,
    }
}

#[test]
fn config_validation_catches_bad_values() {
    assert!(base_cfg().validate().is_ok());

    let mut cfg = base_cfg();
    cfg.fps = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = base_cfg();
    cfg.width = 0;
    assert!(cfg.validate().is_err());

    let mut cfg = base_cfg();
    cfg.height = 721;
    assert!(cfg.validate().is_err());

    let mut cfg = base_cfg();
    cfg.width = 1281;
    assert!(cfg.validate().is_err());

    let mut cfg = base_cfg();
    cfg.pattern = "frame_0001.png".into();
    assert!(cfg.validate().is_err());
}

#[test]
fn ensure_parent_dir_creates_missing_directories() {
    let root = std::env::temp_dir().join(format!(
        "reelsmith-parent-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    let target = root.join("a/b/c.mp4");
    assert!(!target.parent().unwrap().exists());
    ensure_parent_dir(&target).unwrap();
    assert!(target.parent().unwrap().exists());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn refuses_to_clobber_without_overwrite() {
    let dir = std::env::temp_dir().join(format!("reelsmith-clobber-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let out = dir.join("exists.mp4");
    std::fs::write(&out, b"stub").unwrap();

    let mut cfg = base_cfg();
    cfg.out_path = out.clone();
    cfg.overwrite = false;
    let err = encode_sequence(&cfg).unwrap_err();
    assert!(err.to_string().contains("already exists"));
    // The pre-existing file is untouched.
    assert_eq!(std::fs::read(&out).unwrap(), b"stub");
    let _ = std::fs::remove_dir_all(&dir);
}
