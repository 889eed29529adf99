//! Delay aggregation and station reliability scoring.
//!
//! This module filters the loaded dataset by station and year, computes
//! delay statistics and reason counts, ranks stations by mean delay, and
//! converts mean delays into 1–5 reliability scores.

pub mod filter;
pub mod grade;
pub mod metrics;
pub mod ranking;
pub mod reasons;
pub mod utility;
