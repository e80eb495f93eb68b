//! Log Analytics share links.
//!
//! A query is gzipped, base64-encoded and embedded in a portal deep link that
//! opens the query in the workspace's Logs blade.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{Local, NaiveDateTime};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use thiserror::Error;
use tracing::debug;

/// Portal host used when no other is configured.
pub const DEFAULT_PORTAL_URL: &str = "https://portal.azure.com";

/// Errors raised while building or decoding a share link.
#[derive(Error, Debug)]
pub enum ShareLinkError {
    /// One or more required inputs were empty.
    #[error("{}", .0.join(";"))]
    MissingInput(Vec<String>),

    /// The query could not be compressed.
    #[error("Failed to compress query: {0}")]
    Compression(#[from] std::io::Error),

    /// An encoded query could not be decoded.
    #[error("Failed to decode query: {0}")]
    Decode(String),
}

/// Share link settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareLinkConfig {
    #[serde(default = "default_portal_url")]
    pub portal_url: String,
}

fn default_portal_url() -> String {
    DEFAULT_PORTAL_URL.to_string()
}

impl Default for ShareLinkConfig {
    fn default() -> Self {
        Self {
            portal_url: default_portal_url(),
        }
    }
}

/// Inputs of a share link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShareLinkRequest {
    pub query: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub workspace_name: String,
    /// Either an ISO-8601 duration (`P7D`) or an encoded `start%2Fend` interval.
    pub timespan: String,
    /// Pin the query's `now` to the time the link was built.
    pub set_query_now: bool,
}

impl ShareLinkRequest {
    fn missing_inputs(&self) -> Vec<String> {
        [
            (&self.query, "Query must be supplied"),
            (&self.subscription_id, "Subscription ID empty"),
            (&self.resource_group, "Resource group empty"),
            (&self.workspace_name, "Workspace name empty"),
        ]
        .into_iter()
        .filter(|(value, _)| value.is_empty())
        .map(|(_, message)| message.to_string())
        .collect()
    }
}

/// Builds a share link using the current local time for `set query_now`.
pub fn build_share_url(
    request: &ShareLinkRequest,
    config: &ShareLinkConfig,
) -> Result<String, ShareLinkError> {
    build_share_url_at(request, config, Local::now().naive_local())
}

/// Builds a share link as if invoked at `now`.
pub fn build_share_url_at(
    request: &ShareLinkRequest,
    config: &ShareLinkConfig,
    now: NaiveDateTime,
) -> Result<String, ShareLinkError> {
    let missing = request.missing_inputs();
    if !missing.is_empty() {
        return Err(ShareLinkError::MissingInput(missing));
    }

    let query = if request.set_query_now {
        format!(
            "set query_now = datetime({});\n{}",
            now.format("%Y-%m-%dT%H:%M:%S%.6f"),
            request.query
        )
    } else {
        request.query.clone()
    };

    let encoded = encode_query(&query)?;

    let mut url = format!(
        "{}/#view/Microsoft_OperationsManagementSuite_Workspace/Logs.ReactView/\
         resourceId/%2Fsubscriptions%2F{}%2FresourceGroups%2F{}%2F\
         providers%2FMicrosoft.OperationalInsights%2F\
         workspaces%2F{}/source/LogsBlade.AnalyticsShareLinkToQuery/q/{}",
        config.portal_url.trim_end_matches('/'),
        request.subscription_id,
        request.resource_group,
        request.workspace_name,
        encoded
    );

    if !request.timespan.is_empty() {
        url.push_str("/timespan/");
        url.push_str(&request.timespan);
    }

    debug!(
        workspace = %request.workspace_name,
        query_now = request.set_query_now,
        "Built share link"
    );
    Ok(url)
}

/// Gzips and base64-encodes a query, escaping `/`, `+` and `=` for a URL path.
pub fn encode_query(query: &str) -> Result<String, ShareLinkError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(query.as_bytes())?;
    let compressed = encoder.finish()?;

    Ok(BASE64
        .encode(compressed)
        .replace('/', "%2F")
        .replace('+', "%2B")
        .replace('=', "%3D"))
}

/// Reverses [`encode_query`].
pub fn decode_query(encoded: &str) -> Result<String, ShareLinkError> {
    let base64_text = encoded
        .replace("%2F", "/")
        .replace("%2B", "+")
        .replace("%3D", "=");
    let compressed = BASE64
        .decode(base64_text)
        .map_err(|e| ShareLinkError::Decode(format!("Invalid base64: {}", e)))?;

    let mut query = String::new();
    GzDecoder::new(compressed.as_slice())
        .read_to_string(&mut query)
        .map_err(|e| ShareLinkError::Decode(format!("Invalid gzip data: {}", e)))?;
    Ok(query)
}
