/// Converts a mean delay in minutes into a 1–5 reliability score (5 = best).
///
/// | Mean delay   | Score |
/// |--------------|-------|
/// | <= 2         | 5     |
/// | <= 5         | 4     |
/// | <= 10        | 3     |
/// | <= 15        | 2     |
/// | > 15         | 1     |
///
/// Negative delays (early trains) score 5. NaN falls through to 1.
pub fn reliability_score(mean_delay: f64) -> u8 {
    match mean_delay {
        d if d <= 2.0 => 5,
        d if d <= 5.0 => 4,
        d if d <= 10.0 => 3,
        d if d <= 15.0 => 2,
        _ => 1,
    }
}

/// Star rendering of a score, e.g. `★★★☆☆` for 3.
pub fn stars(score: u8) -> String {
    let filled = score.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Label shown in the reliability legend for a score.
pub fn score_label(score: u8) -> &'static str {
    match score {
        5 => "exceptional",
        4 => "very reliable",
        3 => "reliable",
        2 => "average",
        _ => "unreliable",
    }
}
