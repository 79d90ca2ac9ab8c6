use crate::config::*;

impl DeliveryRules {
    fn is_virtual(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.virtual_keywords
            .iter()
            .any(|kw| lower.contains(kw.as_str()))
    }
}

/// Classifies the delivery mode of a whole survey record.
///
/// Only the virtue and the terms answers are inspected, since this is where
/// respondents mention an online offering.
pub fn classify_delivery(record: &RawRecord, rules: &DeliveryRules) -> DeliveryMode {
    let text = format!(
        "{} {}",
        record.virtues.as_deref().unwrap_or(""),
        record.terms_offered.as_deref().unwrap_or("")
    );
    if rules.is_virtual(&text) {
        DeliveryMode::Virtual
    } else {
        DeliveryMode::NotMarked
    }
}
