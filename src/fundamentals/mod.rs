//! Fundamentals: metric classification, health scoring and the stock-info feed.

pub mod cache;
pub mod classify;
pub mod health;
pub mod record;

pub use classify::{Classification, MetricRule, Mode, classify, classify_json};
pub use health::{HealthMetrics, HealthScore, HealthTiers, Metric, MetricRules, aggregate};
pub use record::{FundamentalsRecord, StockEntry, StockInfoResponse};
