//! # sj-observability
//!
//! Logging and metrics infrastructure for SOAR Jobs.
//!
//! Structured logging is built on the tracing ecosystem; counters are
//! recorded through the `metrics` facade and exported in Prometheus format.

pub mod logging;
pub mod metrics;

pub use self::logging::{init_logging_with_config, LogSettings, LoggingConfig};
pub use self::metrics::{
    install_prometheus_recorder, record_make_job, record_share_url, register_metrics,
};
