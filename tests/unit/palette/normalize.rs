use super::*;

fn strs(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn keeps_and_uppercases_valid_entries() {
    let out = normalize(&strs(&["#38bdf8", "FACC15", " #f472b6 "]));
    assert_eq!(out, strs(&["#38BDF8", "#FACC15", "#F472B6"]));
}

#[test]
fn three_digit_entries_survive_unchanged_in_length() {
    let out = normalize(&strs(&["#fa0", "#123", "#ABC"]));
    assert_eq!(out, strs(&["#FA0", "#123", "#ABC"]));
}

#[test]
fn drops_invalid_entries_but_keeps_enough_valid_ones() {
    let out = normalize(&strs(&["#111111", "nope", "#222222", "#33", "#333333"]));
    assert_eq!(out, strs(&["#111111", "#222222", "#333333"]));
}

#[test]
fn falls_back_wholesale_when_too_few_valid() {
    // Two valid survivors are below the minimum; they are discarded, not blended.
    let out = normalize(&strs(&["#111111", "#222222", "junk"]));
    assert_eq!(out, FALLBACK_PALETTE.map(String::from).to_vec());

    let out = normalize(&[]);
    assert_eq!(out, FALLBACK_PALETTE.map(String::from).to_vec());

    // One valid entry out of three is still below the minimum.
    let out = normalize(&strs(&["red", "#xyz", "#38bdf8"]));
    assert_eq!(out, FALLBACK_PALETTE.map(String::from).to_vec());
}

#[test]
fn normalize_is_idempotent() {
    let once = normalize(&strs(&["#38bdf8", "facc15", "#F472B6", "bad"]));
    let twice = normalize(&once);
    assert_eq!(once, twice);
}

#[test]
fn palette_indexing_is_cyclic() {
    let p = Palette::from_input(&strs(&["#111111", "#222222", "#333333"]));
    assert_eq!(p.len(), 3);
    assert_eq!(p.hex(0), "#111111");
    assert_eq!(p.hex(3), "#111111");
    assert_eq!(p.hex(5), "#333333");
}

#[test]
fn palette_rgb_parses_every_entry() {
    let p = Palette::from_input(&[]);
    for n in 0..p.len() * 2 {
        assert!(p.rgb(n).is_ok());
    }
    assert_eq!(p.rgb(0).unwrap(), Rgb8::new(0x38, 0xBD, 0xF8));
}
