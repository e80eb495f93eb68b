//! Application state shared across handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use sj_core::{PipelineConfig, ShareLinkConfig};
use std::sync::Arc;
use tracing::info;

/// Shared application state.
#[derive(Clone, Default)]
pub struct AppState {
    /// Toggles for the make-job pipeline.
    pub pipeline: Arc<PipelineConfig>,
    /// Share link settings.
    pub share_link: Arc<ShareLinkConfig>,
    /// Prometheus metrics handle for rendering metrics.
    pub prometheus_handle: Option<Arc<PrometheusHandle>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(pipeline: PipelineConfig, share_link: ShareLinkConfig) -> Self {
        info!(
            match_upn = pipeline.match_upn,
            rewrite_queries = pipeline.rewrite_queries,
            portal = %share_link.portal_url,
            "Application state initialized"
        );

        Self {
            pipeline: Arc::new(pipeline),
            share_link: Arc::new(share_link),
            prometheus_handle: None,
        }
    }

    /// Creates a new application state with Prometheus handle.
    pub fn with_prometheus_handle(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus_handle = Some(Arc::new(handle));
        self
    }
}
