//! Row filters and the option lists behind the station and year selectors.

use std::collections::BTreeSet;

use crate::dataset::{TripRecord, TripTable};

/// Selector values that mean "do not filter on this field".
const ALL_SENTINELS: &[&str] = &["all", "toutes"];

/// Normalizes a raw selector value: `None`, blank, `all` or `Toutes`
/// (any case) become `None`.
pub fn selection(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| !ALL_SENTINELS.iter().any(|all| s.eq_ignore_ascii_case(all)))
}

/// Exact-match filter on departure and/or arrival station.
pub fn filter_by_station_pair<'a>(
    table: &'a TripTable,
    departure: Option<&str>,
    arrival: Option<&str>,
) -> Vec<&'a TripRecord> {
    let departure = selection(departure);
    let arrival = selection(arrival);

    table
        .iter()
        .filter(|r| departure.is_none_or(|d| r.departure_station == d))
        .filter(|r| arrival.is_none_or(|a| r.arrival_station == a))
        .collect()
}

/// Rows observed in `year`, or every row when no year is given. Rows
/// without a date never match a concrete year.
pub fn filter_by_year(table: &TripTable, year: Option<i32>) -> Vec<&TripRecord> {
    match year {
        None => table.iter().collect(),
        Some(y) => table.iter().filter(|r| r.year() == Some(y)).collect(),
    }
}

/// Sorted distinct departure stations, restricted to those serving
/// `arrival` when one is selected.
pub fn departure_options(table: &TripTable, arrival: Option<&str>) -> Vec<String> {
    let arrival = selection(arrival);
    let set: BTreeSet<&str> = table
        .iter()
        .filter(|r| arrival.is_none_or(|a| r.arrival_station == a))
        .map(|r| r.departure_station.as_str())
        .collect();
    set.into_iter().map(String::from).collect()
}

/// Sorted distinct arrival stations, restricted to those reachable from
/// `departure` when one is selected.
pub fn arrival_options(table: &TripTable, departure: Option<&str>) -> Vec<String> {
    let departure = selection(departure);
    let set: BTreeSet<&str> = table
        .iter()
        .filter(|r| departure.is_none_or(|d| r.departure_station == d))
        .map(|r| r.arrival_station.as_str())
        .collect();
    set.into_iter().map(String::from).collect()
}

/// Sorted distinct years. Empty when the dataset has no date column.
pub fn year_options(table: &TripTable) -> Vec<i32> {
    let set: BTreeSet<i32> = table.iter().filter_map(TripRecord::year).collect();
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::read_table;
    use std::path::Path;

    fn sample_table() -> TripTable {
        read_table(
            "date;departure_station;arrival_station;avg_dep_delay;avg_arr_delay\n\
             2018-01;PARIS LYON;LYON PART DIEU;1.0;2.0\n\
             2018-02;PARIS LYON;MARSEILLE ST CHARLES;3.0;8.0\n\
             2019-01;LYON PART DIEU;PARIS LYON;0.5;1.0\n\
             2019-03;NANTES;PARIS MONTPARNASSE;2.0;4.0\n"
                .as_bytes(),
            Path::new("inline.csv"),
        )
        .unwrap()
    }

    #[test]
    fn test_selection_sentinels() {
        assert_eq!(selection(None), None);
        assert_eq!(selection(Some("all")), None);
        assert_eq!(selection(Some("Toutes")), None);
        assert_eq!(selection(Some("  ")), None);
        assert_eq!(selection(Some("NANTES")), Some("NANTES"));
    }

    #[test]
    fn test_filter_by_station_pair() {
        let table = sample_table();

        assert_eq!(filter_by_station_pair(&table, None, None).len(), 4);
        assert_eq!(filter_by_station_pair(&table, Some("PARIS LYON"), None).len(), 2);
        assert_eq!(filter_by_station_pair(&table, None, Some("PARIS LYON")).len(), 1);

        let both = filter_by_station_pair(&table, Some("PARIS LYON"), Some("LYON PART DIEU"));
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].avg_arr_delay, 2.0);

        assert!(filter_by_station_pair(&table, Some("NANTES"), Some("LYON PART DIEU")).is_empty());
    }

    #[test]
    fn test_filter_is_exact_match() {
        let table = sample_table();
        assert!(filter_by_station_pair(&table, Some("paris lyon"), None).is_empty());
    }

    #[test]
    fn test_filter_by_year() {
        let table = sample_table();
        assert_eq!(filter_by_year(&table, None).len(), 4);
        assert_eq!(filter_by_year(&table, Some(2019)).len(), 2);
        assert!(filter_by_year(&table, Some(2030)).is_empty());
    }

    #[test]
    fn test_cascading_options() {
        let table = sample_table();

        assert_eq!(
            arrival_options(&table, Some("PARIS LYON")),
            vec!["LYON PART DIEU", "MARSEILLE ST CHARLES"]
        );
        assert_eq!(arrival_options(&table, None).len(), 4);
        assert_eq!(departure_options(&table, Some("PARIS LYON")), vec!["LYON PART DIEU"]);
        assert_eq!(
            departure_options(&table, Some("all")),
            vec!["LYON PART DIEU", "NANTES", "PARIS LYON"]
        );
    }

    #[test]
    fn test_year_options() {
        assert_eq!(year_options(&sample_table()), vec![2018, 2019]);

        let csv = "departure_station;arrival_station;avg_dep_delay;avg_arr_delay\nA;B;1.0;1.0\n";
        let undated = read_table(csv.as_bytes(), Path::new("inline.csv")).unwrap();
        assert!(year_options(&undated).is_empty());
    }
}
