use super::*;

#[test]
fn hd_canvas_is_720p() {
    assert_eq!(Canvas::HD.width, 1280);
    assert_eq!(Canvas::HD.height, 720);
    assert_eq!(Canvas::default(), Canvas::HD);
}

#[test]
fn canvas_rejects_zero_dimensions() {
    assert!(Canvas::new(0, 720).is_err());
    assert!(Canvas::new(1280, 0).is_err());
    assert!(Canvas::new(2, 2).is_ok());
}

#[test]
fn fps_rejects_zero() {
    assert!(Fps::new(0).is_err());
    assert_eq!(Fps::new(24).unwrap(), Fps(24));
}

#[test]
fn frames_to_secs_divides_by_rate() {
    assert!((Fps(24).frames_to_secs(72) - 3.0).abs() < 1e-12);
    assert!((Fps(1).frames_to_secs(5) - 5.0).abs() < 1e-12);
}
