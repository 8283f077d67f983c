//! Fixed advisory messages for each stress level.

/// Notice shown when the classifier returns a label outside 1..=5.
pub const UNEXPECTED_NOTICE: &str = "Unexpected result. Please check your inputs.";
/// Closing line shown after every prediction.
pub const ENCOURAGEMENT: &str =
    "Even small lifestyle changes can make a big difference in your mental health.";

/// How urgently a tip should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Calm,
    Watch,
    Alert,
}

/// Advisory text for one stress level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StressTip {
    pub level: i64,
    pub name: &'static str,
    pub summary: &'static str,
    pub tip: &'static str,
    pub severity: Severity,
}

static TIPS: [StressTip; 5] = [
    StressTip {
        level: 1,
        name: "Very Low Stress",
        summary: "You're relaxed!",
        tip: "Keep maintaining good habits!",
        severity: Severity::Calm,
    },
    StressTip {
        level: 2,
        name: "Low Stress",
        summary: "All good, just watch your balance.",
        tip: "Stay active and take screen breaks.",
        severity: Severity::Calm,
    },
    StressTip {
        level: 3,
        name: "Moderate Stress",
        summary: "Manageable but needs attention.",
        tip: "Try meditation, reduce screen time, and rest well.",
        severity: Severity::Watch,
    },
    StressTip {
        level: 4,
        name: "High Stress",
        summary: "Your body may be overworked.",
        tip: "Prioritize rest, hydrate, and talk to someone.",
        severity: Severity::Alert,
    },
    StressTip {
        level: 5,
        name: "Very High Stress",
        summary: "Take immediate action.",
        tip: "Seek help and slow down. Your health matters.",
        severity: Severity::Alert,
    },
];

/// Advice for a predicted label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advice {
    Tip(&'static StressTip),
    /// Label outside the known levels; show [`UNEXPECTED_NOTICE`].
    Unexpected(i64),
}

impl Advice {
    /// Single-line rendering for logs and the headless predictor.
    pub fn message(&self) -> String {
        match self {
            Advice::Tip(tip) => format!("{}: {} Tip: {}", tip.name, tip.summary, tip.tip),
            Advice::Unexpected(_) => UNEXPECTED_NOTICE.to_string(),
        }
    }
}

/// Map a label to its advisory message.
pub fn advise(label: i64) -> Advice {
    TIPS.iter()
        .find(|tip| tip.level == label)
        .map(Advice::Tip)
        .unwrap_or(Advice::Unexpected(label))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_level_has_a_distinct_tip() {
        let mut seen = HashSet::new();
        for label in 1..=5 {
            let Advice::Tip(tip) = advise(label) else {
                panic!("label {label} has no tip");
            };
            assert_eq!(tip.level, label);
            assert!(!tip.tip.is_empty() && !tip.name.is_empty());
            assert!(seen.insert(advise(label).message()));
        }
    }

    #[test]
    fn moderate_stress_tip() {
        let Advice::Tip(tip) = advise(3) else {
            panic!("expected a tip");
        };
        assert_eq!(tip.name, "Moderate Stress");
        assert_eq!(tip.severity, Severity::Watch);
    }

    #[test]
    fn out_of_range_labels_are_unexpected() {
        for label in [0, 6, -1, i64::MAX] {
            assert_eq!(advise(label), Advice::Unexpected(label));
            assert_eq!(advise(label).message(), UNEXPECTED_NOTICE);
        }
    }
}
