use crate::config::Virtue;

/// Finds the virtues named anywhere in a free-text answer.
///
/// The match is a case-insensitive substring test, so the result follows the
/// canonical order of [`Virtue::ALL`] and not the order of the answer.
pub fn normalize_virtues(text: Option<&str>) -> Vec<Virtue> {
    let text = match text {
        Some(t) => t.replace(';', ",").to_lowercase(),
        None => return Vec::new(),
    };
    Virtue::ALL
        .iter()
        .filter(|v| text.contains(&v.name().to_lowercase()))
        .cloned()
        .collect()
}
