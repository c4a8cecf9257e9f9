use super::*;

// Char-count measure: 10px per character, no font needed.
fn fake_measure(s: &str) -> ReelResult<f64> {
    Ok(s.chars().count() as f64 * 10.0)
}

#[test]
fn wrap_keeps_short_text_on_one_line() {
    let lines = wrap_greedy("hello world", 200.0, fake_measure).unwrap();
    assert_eq!(lines, vec!["hello world"]);
}

#[test]
fn wrap_breaks_greedily_at_width() {
    // "aaaa bbbb" measures 90; limit 80 forces a break.
    let lines = wrap_greedy("aaaa bbbb cccc", 80.0, fake_measure).unwrap();
    assert_eq!(lines, vec!["aaaa", "bbbb", "cccc"]);
}

#[test]
fn wrap_packs_words_that_fit_together() {
    let lines = wrap_greedy("aa bb cc dd", 50.0, fake_measure).unwrap();
    assert_eq!(lines, vec!["aa bb", "cc dd"]);
}

#[test]
fn oversized_word_gets_its_own_line() {
    let lines = wrap_greedy("a verylongword b", 50.0, fake_measure).unwrap();
    assert_eq!(lines, vec!["a", "verylongword", "b"]);
}

#[test]
fn wrap_collapses_whitespace_runs() {
    let lines = wrap_greedy("  a \t b  \n c  ", 1000.0, fake_measure).unwrap();
    assert_eq!(lines, vec!["a b c"]);
}

#[test]
fn wrap_of_empty_text_is_empty() {
    let lines = wrap_greedy("   ", 100.0, fake_measure).unwrap();
    assert!(lines.is_empty());
}

#[test]
fn wrap_propagates_measure_errors() {
    let r = wrap_greedy("a b", 100.0, |_| {
        Err(crate::foundation::error::ReelError::render("boom"))
    });
    assert!(r.is_err());
}

#[test]
fn character_float_spans_full_amplitude() {
    assert!(character_float(0.0).abs() < 1e-9);
    assert!((character_float(0.25) - CHARACTER_FLOAT_PX).abs() < 1e-9);
    assert!((character_float(0.75) + CHARACTER_FLOAT_PX).abs() < 1e-9);
    // One full cycle: start and end agree.
    assert!((character_float(1.0) - character_float(0.0)).abs() < 1e-9);
}

#[test]
fn caption_bob_is_phase_shifted_per_line() {
    let a = caption_bob(0.1, 0);
    let b = caption_bob(0.1, 1);
    assert!((a - b).abs() > 1e-6);
    assert!(caption_bob(0.3, 2).abs() <= CAPTION_BOB_PX + 1e-9);
}

#[test]
fn hud_percent_rounds_and_clamps() {
    assert_eq!(hud_percent(0.0), 0);
    assert_eq!(hud_percent(0.504), 50);
    assert_eq!(hud_percent(0.505), 51);
    assert_eq!(hud_percent(1.0), 100);
    assert_eq!(hud_percent(7.0), 100);
    assert_eq!(hud_percent(-1.0), 0);
}

#[test]
fn wave_band_path_is_closed_and_spans_canvas() {
    let canvas = Canvas::HD;
    let path = wave_band_path(canvas, 0.5, 1);
    let els = path.elements();
    assert!(matches!(els.first(), Some(kurbo::PathEl::MoveTo(_))));
    assert!(matches!(els.last(), Some(kurbo::PathEl::ClosePath)));

    // All sample points stay inside the canvas horizontally and above the bottom edge
    // closure returns exactly to (0, h).
    let h = f64::from(canvas.height);
    let w = f64::from(canvas.width);
    for el in els {
        if let kurbo::PathEl::LineTo(p) = el {
            assert!(p.x >= 0.0 && p.x <= w);
            assert!(p.y <= h);
        }
    }
}

#[test]
fn shape_helpers_flatten_to_closed_paths() {
    let eye = ellipse_path(100.0, 50.0, 13.0, 13.0);
    assert!(!eye.elements().is_empty());
    assert!(matches!(eye.elements().last(), Some(kurbo::PathEl::ClosePath)));

    let badge = rounded_rect_path(24.0, 24.0, 230.0, 78.0, 16.0);
    assert!(!badge.elements().is_empty());
    assert!(matches!(
        badge.elements().last(),
        Some(kurbo::PathEl::ClosePath)
    ));
    // The flattened badge outline stays within its bounding rect.
    for el in badge.elements() {
        if let kurbo::PathEl::LineTo(p) = el {
            assert!(p.x >= 24.0 - 1e-6 && p.x <= 254.0 + 1e-6);
            assert!(p.y >= 24.0 - 1e-6 && p.y <= 102.0 + 1e-6);
        }
    }
}

#[test]
fn wave_bands_differ_in_phase() {
    let canvas = Canvas::HD;
    let a = wave_band_path(canvas, 0.2, 0);
    let b = wave_band_path(canvas, 0.2, 1);
    assert_ne!(format!("{a:?}"), format!("{b:?}"));
}
