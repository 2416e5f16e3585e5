//! Feedback normalization, filtering and feed assembly.

use serde::Serialize;
use tracing::debug;

use crate::models::{FeedbackRecord, FilterCriteria, Sentiment};

/// Normalized sentiment of a record; `Unknown` when the label is absent.
pub fn normalize_sentiment(record: &FeedbackRecord) -> Sentiment {
    record
        .sentiment
        .as_deref()
        .map(Sentiment::from_label)
        .unwrap_or(Sentiment::Unknown)
}

impl FilterCriteria {
    /// Whether a single record passes every part of the selection.
    pub fn matches(&self, record: &FeedbackRecord) -> bool {
        self.ratings.contains(&record.rating)
            && self.sentiments.contains(&normalize_sentiment(record))
            && self.matches_query(record)
    }

    fn matches_query(&self, record: &FeedbackRecord) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        record.review.to_lowercase().contains(&needle)
            || record
                .ai_summary
                .as_deref()
                .unwrap_or("")
                .to_lowercase()
                .contains(&needle)
    }
}

/// Records matching `criteria`, in input order.
pub fn filter_feedbacks<'a>(
    records: &'a [FeedbackRecord],
    criteria: &FilterCriteria,
) -> Vec<&'a FeedbackRecord> {
    records.iter().filter(|r| criteria.matches(r)).collect()
}

/// Most recent first. Ties keep their fetched order.
pub fn sort_by_recency(records: &mut [FeedbackRecord]) {
    records.sort_by(|a, b| b.created_at_key().cmp(a.created_at_key()));
}

/// One page of the feedback feed.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPage {
    /// First `page_size` matches, most recent first
    pub items: Vec<FeedbackRecord>,
    /// Size of the full filtered set
    pub filtered_total: usize,
    /// Number of records fetched before filtering
    pub fetched_total: usize,
}

impl FeedPage {
    pub fn is_truncated(&self) -> bool {
        self.items.len() < self.filtered_total
    }
}

/// Sort, filter and cap the fetched records for display.
pub fn build_feed(
    mut records: Vec<FeedbackRecord>,
    criteria: &FilterCriteria,
    page_size: usize,
) -> FeedPage {
    let fetched_total = records.len();
    sort_by_recency(&mut records);

    let matched: Vec<&FeedbackRecord> = filter_feedbacks(&records, criteria);
    let filtered_total = matched.len();
    let items: Vec<FeedbackRecord> = matched.into_iter().take(page_size).cloned().collect();

    debug!(
        fetched_total,
        filtered_total,
        displayed = items.len(),
        "Built feedback page"
    );

    FeedPage {
        items,
        filtered_total,
        fetched_total,
    }
}
