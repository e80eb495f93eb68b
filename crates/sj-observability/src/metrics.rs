//! Request counters exported in Prometheus format.

use ::metrics::{counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Make-job requests, labelled by outcome.
pub const MAKE_JOB_REQUESTS: &str = "sj_make_job_requests_total";
/// Queries produced by make-job requests.
pub const JOBS_MATERIALIZED: &str = "sj_jobs_materialized_total";
/// Share-link requests, labelled by outcome.
pub const SHARE_URL_REQUESTS: &str = "sj_share_urls_total";

/// Registers metric descriptions.
pub fn register_metrics() {
    describe_counter!(
        MAKE_JOB_REQUESTS,
        "Total number of make-job requests by outcome"
    );
    describe_counter!(
        JOBS_MATERIALIZED,
        "Total number of queries materialized from enrichment jobs"
    );
    describe_counter!(
        SHARE_URL_REQUESTS,
        "Total number of share-link requests by outcome"
    );
}

/// Installs the global Prometheus recorder and returns a handle for rendering.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    register_metrics();
    Ok(handle)
}

/// Records the outcome of a make-job request.
pub fn record_make_job(outcome: &'static str, jobs: usize) {
    counter!(MAKE_JOB_REQUESTS, "outcome" => outcome).increment(1);
    counter!(JOBS_MATERIALIZED).increment(jobs as u64);
}

/// Records the outcome of a share-link request.
pub fn record_share_url(outcome: &'static str) {
    counter!(SHARE_URL_REQUESTS, "outcome" => outcome).increment(1);
}
