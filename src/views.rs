//! One function per dashboard page, each returning a serializable report.

use serde::Serialize;
use tracing::{debug, info};

use crate::analyzers::filter::{
    arrival_options, departure_options, filter_by_station_pair, filter_by_year, selection,
    year_options,
};
use crate::analyzers::metrics::{DelayMetrics, TrafficCondition, compute_delay_metrics};
use crate::analyzers::ranking::{
    DelayField, ReliabilityEntry, StationAggregate, StationField, rank_stations,
    reliability_ranking,
};
use crate::analyzers::reasons::{
    DEFAULT_TOP_REASONS, DatedReasons, ReasonCount, reasons_by_date, top_reasons,
};
use crate::context::AppContext;
use crate::error::{Result, TardisError};
use crate::model::{Prediction, PredictionRequest, build_features, estimate};

#[derive(Debug, Serialize)]
pub struct StatisticsReport {
    pub departure: Option<String>,
    pub arrival: Option<String>,
    pub metrics: DelayMetrics,
    pub condition: TrafficCondition,
    pub top_reasons: Vec<ReasonCount>,
}

#[derive(Debug, Serialize)]
pub struct StationOptions {
    pub departures: Vec<String>,
    pub arrivals: Vec<String>,
    pub years: Vec<i32>,
}

#[derive(Debug, Serialize)]
pub struct DelayRankingReport {
    pub year: Option<i32>,
    pub departures: Vec<StationAggregate>,
    pub arrivals: Vec<StationAggregate>,
}

#[derive(Debug, Serialize)]
pub struct ReliabilityReport {
    pub year: Option<i32>,
    pub departures: Vec<ReliabilityEntry>,
    pub arrivals: Vec<ReliabilityEntry>,
}

/// Delay statistics for a departure/arrival selection.
///
/// # Errors
///
/// [`TardisError::EmptyResult`] when no row matches the selection.
#[tracing::instrument(skip(ctx))]
pub fn delay_statistics(
    ctx: &AppContext,
    departure: Option<&str>,
    arrival: Option<&str>,
) -> Result<StatisticsReport> {
    let departure = selection(departure);
    let arrival = selection(arrival);
    let subset = filter_by_station_pair(ctx.table(), departure, arrival);
    debug!(rows = subset.len(), "Selection filtered");

    let metrics = compute_delay_metrics(subset.iter().copied()).map_err(|_| {
        TardisError::EmptyResult(format!(
            "departure '{}' and arrival '{}'",
            departure.unwrap_or("all"),
            arrival.unwrap_or("all")
        ))
    })?;

    Ok(StatisticsReport {
        departure: departure.map(String::from),
        arrival: arrival.map(String::from),
        condition: TrafficCondition::from_mean_delay(metrics.mean),
        top_reasons: top_reasons(subset.iter().copied(), DEFAULT_TOP_REASONS),
        metrics,
    })
}

/// Values offered by the station and year selectors given the current picks.
#[tracing::instrument(skip(ctx))]
pub fn station_options(
    ctx: &AppContext,
    departure: Option<&str>,
    arrival: Option<&str>,
) -> StationOptions {
    StationOptions {
        departures: departure_options(ctx.table(), arrival),
        arrivals: arrival_options(ctx.table(), departure),
        years: year_options(ctx.table()),
    }
}

/// Stations with the largest mean delays, departures and arrivals.
#[tracing::instrument(skip(ctx))]
pub fn delay_rankings(
    ctx: &AppContext,
    year: Option<i32>,
    top_n: usize,
) -> Result<DelayRankingReport> {
    ensure_year_has_rows(ctx, year)?;
    let table = ctx.table();

    let report = DelayRankingReport {
        year,
        departures: rank_stations(
            table,
            StationField::Departure,
            DelayField::Departure,
            year,
            top_n,
        ),
        arrivals: rank_stations(table, StationField::Arrival, DelayField::Arrival, year, top_n),
    };
    info!(
        departures = report.departures.len(),
        arrivals = report.arrivals.len(),
        "Delay rankings computed"
    );
    Ok(report)
}

/// Most reliable stations by 1–5 score, departures and arrivals.
#[tracing::instrument(skip(ctx))]
pub fn reliability_rankings(
    ctx: &AppContext,
    year: Option<i32>,
    top_n: usize,
) -> Result<ReliabilityReport> {
    ensure_year_has_rows(ctx, year)?;
    let table = ctx.table();

    Ok(ReliabilityReport {
        year,
        departures: reliability_ranking(
            table,
            StationField::Departure,
            DelayField::Departure,
            year,
            top_n,
        ),
        arrivals: reliability_ranking(
            table,
            StationField::Arrival,
            DelayField::Arrival,
            year,
            top_n,
        ),
    })
}

/// Estimated arrival delay for a trip.
///
/// # Errors
///
/// [`TardisError::ModelUnavailable`] if the context was opened without the
/// model, [`TardisError::Prediction`] if the model rejects the input.
#[tracing::instrument(skip(ctx))]
pub fn simulate(ctx: &AppContext, request: &PredictionRequest) -> Result<Prediction> {
    let predictor = ctx.predictor()?;
    let features = build_features(request, ctx.table());
    let prediction = estimate(predictor, features)?;

    info!(
        minutes = prediction.minutes,
        level = ?prediction.level,
        "Delay estimated"
    );
    Ok(prediction)
}

/// Individual delay reasons grouped by date.
#[tracing::instrument(skip(ctx))]
pub fn delay_reasons(ctx: &AppContext) -> Vec<DatedReasons> {
    reasons_by_date(ctx.table())
}

fn ensure_year_has_rows(ctx: &AppContext, year: Option<i32>) -> Result<()> {
    if let Some(y) = year {
        if filter_by_year(ctx.table(), Some(y)).is_empty() {
            return Err(TardisError::EmptyResult(format!("year {y}")));
        }
    }
    Ok(())
}
