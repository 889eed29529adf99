//! Report rendering.
//!
//! Supports plain-text rendering for the terminal and pretty-printed JSON.

use std::fmt::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use tracing::debug;

use crate::advice::AdviceSection;
use crate::analyzers::grade::{score_label, stars};
use crate::analyzers::ranking::{ReliabilityEntry, StationAggregate};
use crate::analyzers::reasons::DatedReasons;
use crate::model::Prediction;
use crate::views::{DelayRankingReport, ReliabilityReport, StationOptions, StatisticsReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Renders `value` to stdout as JSON or with the given text renderer.
pub fn emit<T: Serialize + std::fmt::Debug>(
    format: OutputFormat,
    value: &T,
    render: impl Fn(&T) -> String,
) -> Result<()> {
    debug!("{:#?}", value);
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Text => print!("{}", render(value)),
    }
    Ok(())
}

pub fn render_statistics(report: &StatisticsReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Delay statistics: {} -> {}",
        report.departure.as_deref().unwrap_or("all"),
        report.arrival.as_deref().unwrap_or("all")
    );
    let m = &report.metrics;
    let _ = writeln!(out, "  Average delay:    {:.1} min", m.mean);
    let _ = writeln!(out, "  Delay spread:     {:.1} min", m.stddev);
    let _ = writeln!(out, "  Punctuality (<5): {:.1}%", m.punctuality_rate);
    let _ = writeln!(out, "  Rows:             {}", m.rows);
    let _ = writeln!(out, "Current situation: {:?}", report.condition);
    if let Some(tip) = report.condition.recommendation() {
        let _ = writeln!(out, "  {tip}");
    }
    if !report.top_reasons.is_empty() {
        let _ = writeln!(out, "Top {} delay causes:", report.top_reasons.len());
        for r in &report.top_reasons {
            let reason = r.reason.replace('\n', " / ");
            let _ = writeln!(out, "  - {} ({} occurrences)", reason, r.count);
        }
    }
    out
}

pub fn render_station_options(options: &StationOptions) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Departure stations ({}):", options.departures.len());
    for s in &options.departures {
        let _ = writeln!(out, "  {s}");
    }
    let _ = writeln!(out, "Arrival stations ({}):", options.arrivals.len());
    for s in &options.arrivals {
        let _ = writeln!(out, "  {s}");
    }
    if !options.years.is_empty() {
        let years: Vec<String> = options.years.iter().map(i32::to_string).collect();
        let _ = writeln!(out, "Years: {}", years.join(", "));
    }
    out
}

pub fn render_delay_rankings(report: &DelayRankingReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Stations with the largest delays{}", year_suffix(report.year));
    write_aggregates(&mut out, "Departures", &report.departures);
    write_aggregates(&mut out, "Arrivals", &report.arrivals);
    out
}

fn write_aggregates(out: &mut String, title: &str, rows: &[StationAggregate]) {
    let _ = writeln!(out, "Top {} {}", rows.len(), title.to_lowercase());
    for (i, row) in rows.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<40} {:>6.1} min", i + 1, row.station, row.mean_delay);
    }
}

pub fn render_reliability(report: &ReliabilityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Most reliable stations{}", year_suffix(report.year));
    write_reliability(&mut out, "Departures", &report.departures);
    write_reliability(&mut out, "Arrivals", &report.arrivals);
    let _ = writeln!(out, "Legend:");
    for (score, bound) in [(5, "<= 2"), (4, "<= 5"), (3, "<= 10"), (2, "<= 15"), (1, "> 15")] {
        let (rating, label) = (stars(score), score_label(score));
        let _ = writeln!(out, "  {rating} {label} (mean delay {bound} min)");
    }
    out
}

fn write_reliability(out: &mut String, title: &str, rows: &[ReliabilityEntry]) {
    let _ = writeln!(out, "Top {} {}", rows.len(), title.to_lowercase());
    for row in rows {
        let _ = writeln!(
            out,
            "  {} {:<40} {:>6.1} min",
            stars(row.score),
            row.station,
            row.mean_delay
        );
    }
}

pub fn render_prediction(prediction: &Prediction) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Route: {}", prediction.features.route);
    let _ = writeln!(out, "Estimated delay: {:.1} minutes", prediction.minutes);
    let _ = writeln!(out, "{}", prediction.level.headline());
    for tip in prediction.level.advice() {
        let _ = writeln!(out, "  - {tip}");
    }
    out
}

pub fn render_reasons(grouped: &[DatedReasons]) -> String {
    let mut out = String::new();
    for day in grouped {
        let _ = writeln!(out, "{}", day.date);
        for reason in &day.reasons {
            let _ = writeln!(out, "  - {reason}");
        }
    }
    out
}

pub fn render_advice(sections: &[AdviceSection]) -> String {
    let mut out = String::new();
    for section in sections {
        let _ = writeln!(out, "{}", section.title);
        for (label, text) in section.tips {
            let _ = writeln!(out, "  - {label}: {text}");
        }
    }
    out
}

fn year_suffix(year: Option<i32>) -> String {
    year.map(|y| format!(" in {y}")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advice::ADVICE;
    use crate::analyzers::metrics::{DelayMetrics, TrafficCondition};
    use crate::analyzers::reasons::ReasonCount;

    fn statistics(mean: f64) -> StatisticsReport {
        StatisticsReport {
            departure: Some("PARIS LYON".into()),
            arrival: None,
            metrics: DelayMetrics {
                rows: 4,
                mean,
                stddev: 1.25,
                punctuality_rate: 75.0,
            },
            condition: TrafficCondition::from_mean_delay(mean),
            top_reasons: vec![ReasonCount {
                reason: "Travaux\nMétéo".into(),
                count: 2,
            }],
        }
    }

    #[test]
    fn test_render_statistics() {
        let text = render_statistics(&statistics(3.04));
        assert!(text.contains("PARIS LYON -> all"));
        assert!(text.contains("3.0 min"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("Travaux / Météo (2 occurrences)"));
        assert!(!text.contains("alternative transport"));
    }

    #[test]
    fn test_render_statistics_poor_condition() {
        let text = render_statistics(&statistics(22.0));
        assert!(text.contains("Poor"));
        assert!(text.contains("alternative transport"));
    }

    #[test]
    fn test_render_reliability_stars() {
        let report = ReliabilityReport {
            year: Some(2023),
            departures: vec![ReliabilityEntry {
                station: "ANNECY".into(),
                mean_delay: 1.5,
                rows: 3,
                score: 5,
            }],
            arrivals: vec![],
        };
        let text = render_reliability(&report);
        assert!(text.contains("in 2023"));
        assert!(text.contains("★★★★★ ANNECY"));
        assert!(text.contains("Top 0 arrivals"));
    }

    #[test]
    fn test_render_advice() {
        let text = render_advice(ADVICE);
        assert!(text.contains("Pick the right time slot"));
        assert!(text.contains("Safety margin"));
    }

    #[test]
    fn test_emit_json_does_not_panic() {
        emit(OutputFormat::Json, &statistics(6.0), render_statistics).unwrap();
    }
}
