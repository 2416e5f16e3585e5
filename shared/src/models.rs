//! Shared data models.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Shown in place of AI annotations that have not been produced yet.
pub const PROCESSING_PLACEHOLDER: &str = "PROCESSING...";

/// Star ratings a feedback record is expected to carry.
pub const RATING_VALUES: [i64; 5] = [1, 2, 3, 4, 5];

/// Normalized sentiment label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Unknown,
}

impl Sentiment {
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Neutral,
        Sentiment::Negative,
        Sentiment::Unknown,
    ];

    /// Map an upstream label onto the closed set.
    ///
    /// Trailing periods and surrounding whitespace are ignored and matching
    /// is case-insensitive. Anything unrecognized is `Unknown`.
    pub fn from_label(label: &str) -> Self {
        let cleaned = label.trim().trim_end_matches('.').trim();
        if cleaned.eq_ignore_ascii_case("positive") {
            Sentiment::Positive
        } else if cleaned.eq_ignore_ascii_case("neutral") {
            Sentiment::Neutral
        } else if cleaned.eq_ignore_ascii_case("negative") {
            Sentiment::Negative
        } else {
            Sentiment::Unknown
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
            Sentiment::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user-submitted review plus its AI annotations, as served by
/// `GET /admin/feedbacks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    /// Opaque identifier, carried through untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    /// Star rating; missing, null or non-integer values read as 0 and never
    /// match a rating filter
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: i64,
    #[serde(default, deserialize_with = "lenient_text")]
    pub review: String,
    /// Upstream sentiment label, possibly with a trailing period
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub sentiment: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub ai_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub ai_actions: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub ai_response: Option<String>,
    /// ISO-8601 submission time
    #[serde(default, deserialize_with = "lenient_optional_text")]
    pub created_at: Option<String>,
}

fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_i64().unwrap_or(0))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(lenient_optional_text(deserializer)?.unwrap_or_default())
}

/// Non-string values (null included) read as absent.
fn lenient_optional_text<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

impl FeedbackRecord {
    /// Key used for recency ordering. Missing timestamps sort as "".
    pub fn created_at_key(&self) -> &str {
        self.created_at.as_deref().unwrap_or("")
    }

    /// Date part (`YYYY-MM-DD`) of `created_at`.
    pub fn created_date(&self) -> &str {
        let raw = self.created_at_key();
        match raw.char_indices().nth(10) {
            Some((idx, _)) => &raw[..idx],
            None => raw,
        }
    }

    pub fn summary_or_placeholder(&self) -> &str {
        self.ai_summary.as_deref().unwrap_or(PROCESSING_PLACEHOLDER)
    }

    pub fn actions_or_placeholder(&self) -> &str {
        self.ai_actions.as_deref().unwrap_or(PROCESSING_PLACEHOLDER)
    }

    pub fn response_or_empty(&self) -> &str {
        self.ai_response.as_deref().unwrap_or("")
    }
}

/// Aggregate statistics served by `GET /admin/analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub total_feedback: u64,
    #[serde(default)]
    pub average_rating: f64,
    /// Sentiment label -> count
    #[serde(default)]
    pub sentiment_breakdown: HashMap<String, u64>,
    /// Rating (as a string key) -> count
    #[serde(default)]
    pub rating_distribution: HashMap<String, u64>,
    #[serde(default)]
    pub latest_submission: Option<String>,
}

impl AnalyticsSummary {
    /// Count for a sentiment, summing every label that normalizes to it.
    pub fn sentiment_count(&self, sentiment: Sentiment) -> u64 {
        self.sentiment_breakdown
            .iter()
            .filter(|(label, _)| Sentiment::from_label(label) == sentiment)
            .map(|(_, count)| *count)
            .sum()
    }
}

/// Current filter selection for the feedback feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub ratings: BTreeSet<i64>,
    pub sentiments: BTreeSet<Sentiment>,
    /// Free-text query; empty matches everything
    pub query: String,
}

impl Default for FilterCriteria {
    /// Every rating, every sentiment, no search text.
    fn default() -> Self {
        Self {
            ratings: RATING_VALUES.into_iter().collect(),
            sentiments: Sentiment::ALL.into_iter().collect(),
            query: String::new(),
        }
    }
}
