//! Delay-reason counting from the free-text comment column.

use std::collections::HashMap;

use serde::Serialize;

use crate::dataset::TripRecord;

pub const DEFAULT_TOP_REASONS: usize = 3;
pub const UNKNOWN_DATE: &str = "unknown date";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCount {
    pub reason: String,
    pub count: usize,
}

/// Distinct reasons reported on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatedReasons {
    pub date: String,
    pub reasons: Vec<String>,
}

/// The `k` most frequent comment values, most frequent first.
///
/// Each comment is counted as a whole value, even when it lists several
/// reasons on separate lines. Rows without a comment are skipped and ties
/// keep first-seen order.
pub fn top_reasons<'a, I>(rows: I, k: usize) -> Vec<ReasonCount>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<ReasonCount> = Vec::new();

    for comment in rows.into_iter().filter_map(|r| r.delay_comments.as_deref()) {
        match index.get(comment) {
            Some(&i) => counts[i].count += 1,
            None => {
                index.insert(comment, counts.len());
                counts.push(ReasonCount {
                    reason: comment.to_string(),
                    count: 1,
                });
            }
        }
    }

    // stable: equal counts stay in first-seen order
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(k);
    counts
}

/// Splits every comment into its individual lines and groups the distinct
/// reasons by the record's date, in first-seen order for both dates and
/// reasons. Records without a date are grouped under [`UNKNOWN_DATE`].
pub fn reasons_by_date<'a, I>(rows: I) -> Vec<DatedReasons>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut grouped: Vec<DatedReasons> = Vec::new();

    for row in rows {
        let Some(comment) = row.delay_comments.as_deref() else {
            continue;
        };

        let date = row
            .calendar
            .map(|c| c.date_label())
            .unwrap_or_else(|| UNKNOWN_DATE.to_string());

        let slot = *index.entry(date.clone()).or_insert_with(|| {
            grouped.push(DatedReasons {
                date,
                reasons: Vec::new(),
            });
            grouped.len() - 1
        });

        for reason in comment.split('\n').map(str::trim).filter(|r| !r.is_empty()) {
            let reasons = &mut grouped[slot].reasons;
            if !reasons.iter().any(|r| r == reason) {
                reasons.push(reason.to_string());
            }
        }
    }

    grouped
}
