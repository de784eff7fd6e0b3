//! Score normalization and mood bucketing
//!
//! The sentiment model emits an unsigned confidence in [0, 1]; downstream
//! consumers (bot replies, dashboards) expect a signed polarity in [-1, 1].

use std::fmt;

/// Map a raw model confidence in [0, 1] to a signed polarity in [-1, 1].
///
/// Monotonic and reversible: `raw = (normalize(raw) + 1.0) / 2.0`.
pub fn normalize(raw: f64) -> f64 {
    raw * 2.0 - 1.0
}

/// Coarse mood bucket derived from a five-point sentiment label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Happy,
    Neutral,
    SadOrAngry,
}

impl Mood {
    /// Three-way classification over the model's label set:
    /// "4" and "5" are happy, "3" is neutral, everything else
    /// (including unexpected labels) lands in the sad-or-angry bucket.
    pub fn from_label(label: &str) -> Mood {
        match label {
            "4" | "5" => Mood::Happy,
            "3" => Mood::Neutral,
            _ => Mood::SadOrAngry,
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::SadOrAngry => "sad or angry",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_stays_in_signed_range() {
        for raw in [0.0, 0.1, 0.25, 0.5, 0.77, 0.9, 1.0] {
            let normalized = normalize(raw);
            assert!((-1.0..=1.0).contains(&normalized), "raw={}", raw);
        }
    }

    #[test]
    fn normalize_round_trips() {
        for raw in [0.0, 0.125, 0.5, 0.625, 0.9, 1.0] {
            let recovered = (normalize(raw) + 1.0) / 2.0;
            assert!((recovered - raw).abs() < f64::EPSILON, "raw={}", raw);
        }
    }

    #[test]
    fn normalize_endpoints() {
        assert_eq!(normalize(0.0), -1.0);
        assert_eq!(normalize(0.5), 0.0);
        assert_eq!(normalize(1.0), 1.0);
    }

    #[test]
    fn mood_bucket_covers_all_five_labels() {
        assert_eq!(Mood::from_label("1"), Mood::SadOrAngry);
        assert_eq!(Mood::from_label("2"), Mood::SadOrAngry);
        assert_eq!(Mood::from_label("3"), Mood::Neutral);
        assert_eq!(Mood::from_label("4"), Mood::Happy);
        assert_eq!(Mood::from_label("5"), Mood::Happy);
    }

    #[test]
    fn unexpected_labels_fall_through_to_sad_or_angry() {
        assert_eq!(Mood::from_label("positive"), Mood::SadOrAngry);
        assert_eq!(Mood::from_label(""), Mood::SadOrAngry);
    }

    #[test]
    fn mood_display_names() {
        assert_eq!(Mood::Happy.to_string(), "happy");
        assert_eq!(Mood::Neutral.to_string(), "neutral");
        assert_eq!(Mood::SadOrAngry.to_string(), "sad or angry");
    }
}
