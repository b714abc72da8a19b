pub mod error;
pub use error::CoreError;

pub mod mapper;
pub mod progress;

pub mod metrics;
pub use metrics::{MetricsBackend, NoopMetrics, Operation};

pub mod service;
pub use service::ChallengeService;
