//! Static traveller advice.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AdviceSection {
    pub title: &'static str,
    pub tips: &'static [(&'static str, &'static str)],
}

pub const ADVICE: &[AdviceSection] = &[
    AdviceSection {
        title: "Pick the right time slot",
        tips: &[
            ("Best times", "Prefer trains before 7am or between 10am and 4pm"),
            ("Avoid", "Peak hours (8-9am and 5-7pm) are more prone to delays"),
        ],
    },
    AdviceSection {
        title: "Pick the right route",
        tips: &[
            ("Direct trips", "Fewer delay risks than trips with connections"),
            ("Major stations", "Large stations often see fewer delays than small ones"),
        ],
    },
    AdviceSection {
        title: "Handle delays",
        tips: &[
            ("Safety margin", "Always plan 15-30 minutes of margin for appointments"),
            ("Useful apps", "Install the SNCF app for real-time alerts"),
            ("Passenger rights", "A significant delay may entitle you to compensation"),
        ],
    },
    AdviceSection {
        title: "Alternatives",
        tips: &[
            ("Other transport", "Bus, car-sharing or TER can be more reliable on some routes"),
            ("Flexible tickets", "When possible, choose tickets exchangeable free of charge"),
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advice_sections_are_populated() {
        assert_eq!(ADVICE.len(), 4);
        assert!(ADVICE.iter().all(|s| !s.tips.is_empty()));
    }
}
