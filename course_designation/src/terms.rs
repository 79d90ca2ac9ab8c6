use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::*;

// Applied to lowercased text. Two-digit years are read as 20xx.
static TERM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(fall|spring|summer|j-term)\s*(\d{4}|\d{2})").expect("valid term pattern")
});

impl TermRules {
    /// The academic year of a term label.
    ///
    /// The association list is scanned in order and the first entry wins, then
    /// the fallback hooks are consulted.
    pub fn academic_year(&self, term: &str) -> Option<&str> {
        self.academic_years
            .iter()
            .chain(self.fallback.iter())
            .find(|slot| slot.term == term)
            .map(|slot| slot.academic_year.as_str())
    }

    /// Plain substring test: "fall" contains "all", so any answer that
    /// mentions a fall term gets the default window.
    fn is_blanket(&self, lower_text: &str) -> bool {
        self.blanket_keywords
            .iter()
            .any(|kw| lower_text.contains(kw.as_str()))
    }
}

fn season_label(season: &str) -> &'static str {
    match season {
        "fall" => "Fall",
        "spring" => "Spring",
        "summer" => "Summer",
        _ => "J-Term",
    }
}

fn push_unique(slots: &mut Vec<TermSlot>, slot: TermSlot) {
    if !slots.iter().any(|s| s.term == slot.term) {
        slots.push(slot);
    }
}

/// Reads a free-text "terms offered" answer into (term, academic year) pairs.
///
/// Explicit mentions such as "Spring 26" come first, in the order of the text,
/// followed by the default window when the answer is a blanket statement such
/// as "Every Fall". Pairs are unique by term label. An empty result means that
/// nothing could be recognized; the caller decides on the fallback.
pub fn expand_terms(text: Option<&str>, rules: &TermRules) -> Vec<TermSlot> {
    let lower = match text {
        Some(t) => t.to_lowercase(),
        None => return Vec::new(),
    };

    let mut res: Vec<TermSlot> = Vec::new();
    for cap in TERM_RE.captures_iter(&lower) {
        let year = match &cap[2] {
            y if y.len() == 2 => format!("20{}", y),
            y => y.to_string(),
        };
        let label = format!("{} {}", season_label(&cap[1]), year);
        match rules.academic_year(&label) {
            Some(ay) => push_unique(&mut res, TermSlot::new(&label, ay)),
            None => debug!("expand_terms: no academic year for {:?}", label),
        }
    }

    if rules.is_blanket(&lower) {
        let fall = lower.contains("fall");
        let spring = lower.contains("spring");
        for slot in rules.default_window.iter() {
            let keep = match (fall, spring) {
                (true, false) => slot.semester() == "Fall",
                (false, true) => slot.semester() == "Spring",
                _ => true,
            };
            if keep {
                push_unique(&mut res, slot.clone());
            }
        }
    }
    debug!("expand_terms: {:?} -> {:?}", text, res);
    res
}
