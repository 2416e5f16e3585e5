//! Headline figures derived from the analytics summary.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::warn;

use crate::models::{AnalyticsSummary, Sentiment};

/// Direction of the average rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RatingTrend {
    Up,
    Flat,
    Down,
}

impl RatingTrend {
    /// Up above 3.5, down below 3.0.
    pub fn from_average(average: f64) -> Self {
        if average > 3.5 {
            RatingTrend::Up
        } else if average < 3.0 {
            RatingTrend::Down
        } else {
            RatingTrend::Flat
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            RatingTrend::Up => "↑",
            RatingTrend::Flat => "→",
            RatingTrend::Down => "↓",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardMetrics {
    pub total_feedback: u64,
    pub average_rating: f64,
    pub rating_trend: RatingTrend,
    /// Share of positive feedback, 0-100
    pub positive_rate: f64,
    /// Minutes since the newest submission; `None` when unknown
    pub minutes_since_latest: Option<i64>,
    /// (rating, count) ordered by rating
    pub rating_distribution: Vec<(i64, u64)>,
}

impl DashboardMetrics {
    pub fn from_summary(summary: &AnalyticsSummary, now: DateTime<Utc>) -> Self {
        let positive = summary.sentiment_count(Sentiment::Positive);
        let positive_rate = positive as f64 / summary.total_feedback.max(1) as f64 * 100.0;

        let minutes_since_latest = summary
            .latest_submission
            .as_deref()
            .and_then(parse_timestamp)
            .map(|latest| (now - latest).num_minutes().max(0));

        Self {
            total_feedback: summary.total_feedback,
            average_rating: summary.average_rating,
            rating_trend: RatingTrend::from_average(summary.average_rating),
            positive_rate,
            minutes_since_latest,
            rating_distribution: ordered_distribution(summary),
        }
    }
}

fn ordered_distribution(summary: &AnalyticsSummary) -> Vec<(i64, u64)> {
    let mut entries: Vec<(i64, u64)> = summary
        .rating_distribution
        .iter()
        .filter_map(|(key, count)| match key.trim().parse::<i64>() {
            Ok(rating) => Some((rating, *count)),
            Err(_) => {
                warn!("Skipping non-numeric rating bucket {:?}", key);
                None
            }
        })
        .collect();
    entries.sort_unstable();
    entries
}

/// Parse an ISO-8601 timestamp; naive values are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(e) => {
            warn!("Unparsable timestamp {:?}: {}", raw, e);
            None
        }
    }
}
