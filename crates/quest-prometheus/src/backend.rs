use std::{string::FromUtf8Error, time::Duration};

use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use quest_core::{MetricsBackend, Operation};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
    #[error("metrics output is not utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

/// Per-operation counters and latency histograms in a private registry.
#[derive(Clone)]
pub struct PrometheusMetrics {
    registry: Registry,
    operations: IntCounterVec,
    duration: HistogramVec,
}

impl PrometheusMetrics {
    pub fn new() -> Result<Self, MetricsError> {
        Self::with_registry(Registry::new())
    }

    /// Register the collectors in an existing registry.
    pub fn with_registry(registry: Registry) -> Result<Self, MetricsError> {
        let operations = IntCounterVec::new(
            Opts::new("quest_operations_total", "Challenge operations by outcome"),
            &["operation", "outcome"],
        )?;
        let duration = HistogramVec::new(
            HistogramOpts::new(
                "quest_operation_duration_seconds",
                "Challenge operation latency, store round trips included",
            ),
            &["operation"],
        )?;

        registry.register(Box::new(operations.clone()))?;
        registry.register(Box::new(duration.clone()))?;

        Ok(Self {
            registry,
            operations,
            duration,
        })
    }

    pub fn gather(&self) -> Vec<prometheus::proto::MetricFamily> {
        self.registry.gather()
    }

    /// Text exposition format, as served on `/metrics`.
    pub fn render(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}

impl MetricsBackend for PrometheusMetrics {
    fn record_operation(&self, op: Operation, outcome: &'static str, elapsed: Duration) {
        self.operations
            .with_label_values(&[op.as_str(), outcome])
            .inc();
        self.duration
            .with_label_values(&[op.as_str()])
            .observe(elapsed.as_secs_f64());
    }
}
