//! Plain-text and JSON rendering of the dashboard sections.

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use shared::{normalize_sentiment, DashboardMetrics, Error, FeedPage, FeedbackRecord};

const DIVIDER: &str = "────────────────────────────────────────────────────────────";

pub fn header(now: DateTime<Utc>) -> String {
    format!(
        "ADMIN · Real-Time Intelligence Platform{:>24}\n{}\n",
        format!("SYSTEM TIME {} UTC", now.format("%H:%M:%S")),
        DIVIDER
    )
}

pub fn metrics(metrics: &DashboardMetrics) -> String {
    let mut out = String::new();
    out.push_str(&format!("TOTAL FEEDBACK   {}\n", metrics.total_feedback));
    out.push_str(&format!(
        "AVG RATING       {:.1} {}\n",
        metrics.average_rating,
        metrics.rating_trend.arrow()
    ));
    out.push_str(&format!("POSITIVE RATE    {:.1}%\n", metrics.positive_rate));
    match metrics.minutes_since_latest {
        Some(minutes) => out.push_str(&format!("LAST SYNC        {}m (LIVE)\n", minutes)),
        None => out.push_str("LAST SYNC        — (OFFLINE)\n"),
    }

    if !metrics.rating_distribution.is_empty() {
        out.push_str("\nRATING DISTRIBUTION\n");
        for (rating, count) in &metrics.rating_distribution {
            out.push_str(&format!("  {} STARS  {}\n", rating, count));
        }
    }
    out
}

/// `★` per star and `☆` for the remainder of five.
pub fn star_bar(rating: i64) -> String {
    let filled = rating.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub fn feed_item(record: &FeedbackRecord) -> String {
    let sentiment = normalize_sentiment(record);
    let mut out = String::new();
    out.push_str(&format!(
        "[ {} STARS ] {} • {}\n",
        record.rating,
        sentiment.as_str().to_uppercase(),
        record.created_date()
    ));
    out.push_str(&format!("  {}  {}\n", star_bar(record.rating), sentiment));
    out.push_str(&format!("  REVIEW:   {}\n", record.review));
    out.push_str(&format!("  ANALYSIS: {}\n", record.summary_or_placeholder()));
    out.push_str(&format!("  ACTIONS:  {}\n", record.actions_or_placeholder()));
    let response = record.response_or_empty();
    if !response.is_empty() {
        out.push_str(&format!("  RESPONSE: {}\n", response));
    }
    out
}

pub fn feed(page: &FeedPage) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "DISPLAYING {} OF {} RECORDS\n",
        page.filtered_total, page.fetched_total
    ));
    if page.is_truncated() {
        out.push_str(&format!("(showing first {})\n", page.items.len()));
    }
    for record in &page.items {
        out.push('\n');
        out.push_str(&feed_item(record));
    }
    out
}

pub fn empty_feed() -> String {
    "NO FEEDBACK STREAM DETECTED\n".to_string()
}

/// Error line for a section whose fetch failed.
pub fn failure(section: &str, error: &Error) -> String {
    let kind = error.kind().map(|k| k.as_str()).unwrap_or("ERROR");
    format!("ERROR: {} UNAVAILABLE [{}] {}\n", section, kind, error)
}

pub fn failure_json(error: &Error) -> Value {
    json!({
        "error": {
            "kind": error.kind().map(|k| k.as_str()),
            "message": error.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{build_feed, FilterCriteria, RatingTrend};

    fn sample_record() -> FeedbackRecord {
        serde_json::from_value(json!({
            "rating": 4,
            "review": "Works well",
            "sentiment": "Positive.",
            "created_at": "2024-05-01T09:30:00Z"
        }))
        .unwrap()
    }

    #[test]
    fn test_star_bar_clamps() {
        assert_eq!(star_bar(3), "★★★☆☆");
        assert_eq!(star_bar(0), "☆☆☆☆☆");
        assert_eq!(star_bar(9), "★★★★★");
        assert_eq!(star_bar(-2), "☆☆☆☆☆");
    }

    #[test]
    fn test_feed_item_header_and_placeholders() {
        let text = feed_item(&sample_record());
        assert!(text.starts_with("[ 4 STARS ] POSITIVE • 2024-05-01\n"));
        assert!(text.contains("ANALYSIS: PROCESSING..."));
        assert!(!text.contains("RESPONSE:"));
    }

    #[test]
    fn test_feed_reports_full_counts() {
        let records = vec![sample_record(); 3];
        let page = build_feed(records, &FilterCriteria::default(), 2);
        let text = feed(&page);
        assert!(text.starts_with("DISPLAYING 3 OF 3 RECORDS\n(showing first 2)\n"));
        assert_eq!(text.matches("[ 4 STARS ]").count(), 2);
    }

    #[test]
    fn test_metrics_offline_when_no_latest() {
        let metrics = DashboardMetrics {
            total_feedback: 0,
            average_rating: 0.0,
            rating_trend: RatingTrend::Down,
            positive_rate: 0.0,
            minutes_since_latest: None,
            rating_distribution: Vec::new(),
        };
        let text = super::metrics(&metrics);
        assert!(text.contains("AVG RATING       0.0 ↓"));
        assert!(text.contains("(OFFLINE)"));
        assert!(!text.contains("RATING DISTRIBUTION"));
    }

    #[test]
    fn test_metrics_lines() {
        let metrics = DashboardMetrics {
            total_feedback: 12,
            average_rating: 3.75,
            rating_trend: RatingTrend::Up,
            positive_rate: 62.5,
            minutes_since_latest: Some(7),
            rating_distribution: vec![(1, 2), (5, 10)],
        };
        assert_eq!(
            super::metrics(&metrics),
            "TOTAL FEEDBACK   12\n\
             AVG RATING       3.8 ↑\n\
             POSITIVE RATE    62.5%\n\
             LAST SYNC        7m (LIVE)\n\
             \n\
             RATING DISTRIBUTION\n  1 STARS  2\n  5 STARS  10\n"
        );
    }

    #[test]
    fn test_failure_names_kind() {
        let error = Error::BadStatus {
            status: 500,
            body: "boom".to_string(),
        };
        assert_eq!(
            failure("FEEDBACK STREAM", &error),
            "ERROR: FEEDBACK STREAM UNAVAILABLE [BAD_STATUS] Unexpected status 500: boom\n"
        );
        assert_eq!(failure_json(&error)["error"]["kind"], json!("BAD_STATUS"));
    }
}
