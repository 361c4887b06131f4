//! examtrack-core: Exam scoring, sitting grouping, and analytics.
//!
//! This crate turns raw exam submissions (TYT, AYT, LGS) into exam sittings
//! and derives the statistics and chart series the reporting views consume.
//! The analytics pipeline is pure: see [`engine::analyze`].

pub mod engine;
pub mod error;
pub mod grouping;
pub mod hierarchy;
pub mod model;
pub mod parser;
pub mod practice;
pub mod report;
pub mod scoring;
pub mod series;
pub mod statistics;
pub mod store;
pub mod traits;

#[cfg(test)]
mod test_support;

pub use engine::{analyze, AnalyticsEngine, AnalyticsFilter, EngineConfig};
pub use error::DataError;
pub use model::{ExamSitting, ExamSubmission, ExamType};
pub use report::AnalyticsReport;
