//! Core library for the feedback admin console.
//!
//! This crate provides the API client, typed schemas, and the
//! normalize/filter/paginate pipeline consumed by the console front end.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod feedback;
pub mod metrics;
pub mod models;

pub use auth::{verify_api_key, SessionState};
pub use client::ApiClient;
pub use config::Config;
pub use error::{Error, FailureKind, Result};
pub use feedback::{build_feed, filter_feedbacks, normalize_sentiment, sort_by_recency, FeedPage};
pub use metrics::{DashboardMetrics, RatingTrend};
pub use models::{AnalyticsSummary, FeedbackRecord, FilterCriteria, Sentiment};
