/// One timed scene produced from the raw script.
///
/// `index` and `total` are assigned once by [`segment`] and never change: every scene in a
/// job satisfies `index < total`, and `total` equals the scene list length.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub text: String,
    pub index: usize,
    pub total: usize,
}

/// Scene list used when the script yields no usable fragments.
pub const FALLBACK_SCENES: [&str; 3] = [
    "Introduce the brand hero.",
    "Showcase the top features.",
    "Call fans to action with energy.",
];

const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Split a raw script into an ordered scene list.
///
/// Lines are split first, then each line is cut after every sentence terminator (`.`, `!`,
/// `?`), keeping the terminator attached to the preceding fragment. Fragments are trimmed
/// and empties dropped. An input with no surviving fragments produces the fixed
/// three-scene fallback, so the result is never empty.
///
/// Pure function of the input text; never fails.
#[tracing::instrument(skip(script), fields(script_len = script.len()))]
pub fn segment(script: &str) -> Vec<Scene> {
    let mut fragments = Vec::new();

    for line in script.lines() {
        let mut buf = String::new();
        for c in line.chars() {
            buf.push(c);
            if SENTENCE_TERMINATORS.contains(&c) {
                push_fragment(&mut fragments, &mut buf);
            }
        }
        push_fragment(&mut fragments, &mut buf);
    }

    if fragments.is_empty() {
        fragments = FALLBACK_SCENES.iter().map(|s| s.to_string()).collect();
    }

    let total = fragments.len();
    fragments
        .into_iter()
        .enumerate()
        .map(|(index, text)| Scene { text, index, total })
        .collect()
}

fn push_fragment(out: &mut Vec<String>, buf: &mut String) {
    let trimmed = buf.trim();
    if !trimmed.is_empty() {
        out.push(trimmed.to_string());
    }
    buf.clear();
}

#[cfg(test)]
#[path = "../../tests/unit/script/segment.rs"]
mod tests;
