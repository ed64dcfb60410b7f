/// Greedy word-wrap of `text` into lines no wider than `max_width`.
///
/// Words are separated by single spaces and never split; a word wider than `max_width` lands
/// alone on its own line. `measure` is called with the candidate line including the trailing
/// space, matching how a canvas `measureText` sees the accumulated line.
pub fn wrap_text<F>(mut measure: F, text: &str, max_width: f32) -> Vec<String>
where
    F: FnMut(&str) -> f32,
{
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split(' ').filter(|w| !w.is_empty()) {
        let candidate = format!("{line}{word} ");
        if !line.is_empty() && measure(&candidate) > max_width {
            lines.push(line.trim_end_matches(' ').to_string());
            line = format!("{word} ");
        } else {
            line = candidate;
        }
    }

    if !line.is_empty() {
        lines.push(line.trim_end_matches(' ').to_string());
    }
    lines
}

#[cfg(test)]
#[path = "../../tests/unit/text/wrap.rs"]
mod tests;
