use std::{fmt, time::Duration};

/// Service operations, as labelled in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    List,
    Create,
    UpdateProgress,
    GetProgress,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::List => "list",
            Operation::Create => "create",
            Operation::UpdateProgress => "update_progress",
            Operation::GetProgress => "get_progress",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sink for per-operation measurements.
///
/// `outcome` is `"ok"` or [`CoreError::kind`](crate::CoreError::kind).
pub trait MetricsBackend: Send + Sync + 'static {
    fn record_operation(&self, op: Operation, outcome: &'static str, elapsed: Duration);
}

/// Discards every measurement.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMetrics;

impl MetricsBackend for NoopMetrics {
    fn record_operation(&self, _op: Operation, _outcome: &'static str, _elapsed: Duration) {}
}
