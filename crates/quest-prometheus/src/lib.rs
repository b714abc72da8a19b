//! Prometheus metrics backend for the quest challenge service.
//!
//! This crate provides a [`PrometheusMetrics`] implementation of [`quest_core::MetricsBackend`]
//! that exposes metrics in Prometheus format.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use quest_core::ChallengeService;
//! use quest_prometheus::PrometheusMetrics;
//! use quest_store::MemoryStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = PrometheusMetrics::new()?;
//!
//! let service = ChallengeService::new(Arc::new(MemoryStore::new()))
//!     .with_metrics(Arc::new(metrics.clone()));
//!
//! let text = metrics.render()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metrics
//! - `quest_operations_total{operation, outcome}` - Counter
//! - `quest_operation_duration_seconds{operation}` - Histogram
//!
//! ## HTTP Server
//! This crate does NOT provide HTTP server for `/metrics` endpoint.
//! Mount [`PrometheusMetrics::render`] in your application's router.

mod backend;
pub use backend::{MetricsError, PrometheusMetrics};
