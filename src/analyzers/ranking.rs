//! Per-station delay rankings.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::filter_by_year;
use super::grade::reliability_score;
use super::utility::DelayAccumulator;
use crate::dataset::{TripRecord, TripTable};

pub const DEFAULT_TOP_N: usize = 10;

/// Which station column rows are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StationField {
    Departure,
    Arrival,
}

/// Which delay column is averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayField {
    Departure,
    Arrival,
}

impl StationField {
    pub fn of<'a>(&self, record: &'a TripRecord) -> &'a str {
        match self {
            StationField::Departure => &record.departure_station,
            StationField::Arrival => &record.arrival_station,
        }
    }
}

impl DelayField {
    pub fn of(&self, record: &TripRecord) -> f64 {
        match self {
            DelayField::Departure => record.avg_dep_delay,
            DelayField::Arrival => record.avg_arr_delay,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationAggregate {
    pub station: String,
    pub mean_delay: f64,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReliabilityEntry {
    pub station: String,
    pub mean_delay: f64,
    pub rows: usize,
    pub score: u8,
}

/// Groups `rows` by station and averages the chosen delay column.
///
/// Groups come out in ascending station-name order.
pub fn group_stations<'a, I>(
    rows: I,
    group_by: StationField,
    delay: DelayField,
) -> Vec<StationAggregate>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut groups: BTreeMap<&str, DelayAccumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(group_by.of(row)).or_default().push(delay.of(row));
    }

    groups
        .into_iter()
        .filter_map(|(station, acc)| {
            acc.mean().map(|mean_delay| StationAggregate {
                station: station.to_string(),
                mean_delay,
                rows: acc.count(),
            })
        })
        .collect()
}

/// Stations with the highest mean delay, worst first, limited to `top_n`.
///
/// Equal means keep the ascending station-name order of the grouping.
#[tracing::instrument(skip(table))]
pub fn rank_stations(
    table: &TripTable,
    group_by: StationField,
    delay: DelayField,
    year: Option<i32>,
    top_n: usize,
) -> Vec<StationAggregate> {
    let mut ranked = group_stations(filter_by_year(table, year), group_by, delay);
    ranked.sort_by(|a, b| b.mean_delay.partial_cmp(&a.mean_delay).unwrap_or(Ordering::Equal));
    ranked.truncate(top_n);
    ranked
}

/// Stations with the best reliability score first, limited to `top_n`.
///
/// Only the score orders the result; stations sharing a score keep the
/// ascending station-name order of the grouping.
#[tracing::instrument(skip(table))]
pub fn reliability_ranking(
    table: &TripTable,
    group_by: StationField,
    delay: DelayField,
    year: Option<i32>,
    top_n: usize,
) -> Vec<ReliabilityEntry> {
    let rows = filter_by_year(table, year);
    let mut ranked: Vec<ReliabilityEntry> = group_stations(rows, group_by, delay)
        .into_iter()
        .map(|agg| ReliabilityEntry {
            score: reliability_score(agg.mean_delay),
            station: agg.station,
            mean_delay: agg.mean_delay,
            rows: agg.rows,
        })
        .collect();

    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(top_n);
    ranked
}

/// The `n` arrival stations with the most rows across the whole table,
/// ties in first-seen order.
pub fn busiest_arrivals(table: &TripTable, n: usize) -> Vec<String> {
    let mut order: Vec<(&str, usize)> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for row in table {
        match index.get(row.arrival_station.as_str()) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(row.arrival_station.as_str(), order.len());
                order.push((row.arrival_station.as_str(), 1));
            }
        }
    }

    order.sort_by(|a, b| b.1.cmp(&a.1));
    order.into_iter().take(n).map(|(s, _)| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_table;
    use std::path::Path;

    const HEADER: &str = "date;departure_station;arrival_station;avg_dep_delay;avg_arr_delay";

    fn table(body: &str) -> TripTable {
        let text = format!("{HEADER}\n{body}");
        read_table(text.as_bytes(), Path::new("inline.csv")).unwrap()
    }

    #[test]
    fn test_rank_stations_sorted_descending() {
        let t = table(
            "2020-01;A;X;1.0;10.0\n\
             2020-01;A;Y;3.0;1.0\n\
             2020-01;B;X;8.0;20.0\n\
             2020-01;C;Z;4.0;4.0\n",
        );

        let ranked = rank_stations(&t, StationField::Departure, DelayField::Departure, None, 10);
        let names: Vec<&str> = ranked.iter().map(|r| r.station.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert_eq!(ranked[2].mean_delay, 2.0);
        assert_eq!(ranked[2].rows, 2);

        let arrivals = rank_stations(&t, StationField::Arrival, DelayField::Arrival, None, 10);
        assert_eq!(arrivals[0].station, "X");
        assert_eq!(arrivals[0].mean_delay, 15.0);
    }

    #[test]
    fn test_rank_stations_top_n_and_ties() {
        let t = table(
            "2020-01;D;X;5.0;0.0\n\
             2020-01;B;X;5.0;0.0\n\
             2020-01;C;X;9.0;0.0\n\
             2020-01;A;X;5.0;0.0\n",
        );

        let ranked = rank_stations(&t, StationField::Departure, DelayField::Departure, None, 3);
        let names: Vec<&str> = ranked.iter().map(|r| r.station.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);

        for pair in ranked.windows(2) {
            assert!(pair[0].mean_delay >= pair[1].mean_delay);
        }
    }

    #[test]
    fn test_rank_stations_year_filter() {
        let t = table(
            "2019-05;A;X;30.0;0.0\n\
             2020-05;B;X;2.0;0.0\n",
        );

        let by_departure =
            |year| rank_stations(&t, StationField::Departure, DelayField::Departure, year, 10);

        let ranked = by_departure(Some(2020));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].station, "B");

        assert!(by_departure(Some(1999)).is_empty());
    }

    #[test]
    fn test_reliability_ranking_orders_by_score_only() {
        let t = table(
            "2020-01;A;X;12.0;0.0\n\
             2020-01;B;X;1.9;0.0\n\
             2020-01;C;X;0.5;0.0\n\
             2020-01;D;X;4.0;0.0\n",
        );

        let ranked =
            reliability_ranking(&t, StationField::Departure, DelayField::Departure, None, 10);
        let got: Vec<(&str, u8)> = ranked.iter().map(|r| (r.station.as_str(), r.score)).collect();
        // B and C both score 5: grouping order wins over the lower mean of C
        assert_eq!(got, vec![("B", 5), ("C", 5), ("D", 4), ("A", 2)]);
    }

    #[test]
    fn test_busiest_arrivals() {
        let t = table(
            "2020-01;A;Y;0.0;0.0\n\
             2020-01;A;X;0.0;0.0\n\
             2020-01;B;X;0.0;0.0\n\
             2020-01;C;Z;0.0;0.0\n\
             2020-01;C;Y;0.0;0.0\n",
        );

        assert_eq!(busiest_arrivals(&t, 2), vec!["Y", "X"]);
        assert_eq!(busiest_arrivals(&t, 10).len(), 3);
    }
}
