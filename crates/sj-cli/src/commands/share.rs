//! Share-link commands.

use anyhow::{anyhow, Result};
use serde_json::json;

use sj_core::{build_share_url, decode_query, ShareLinkConfig, ShareLinkRequest};

use crate::OutputFormat;

/// Builds a share link and prints it.
pub fn run_share_url(
    request: ShareLinkRequest,
    config: &ShareLinkConfig,
    format: OutputFormat,
) -> Result<()> {
    let url = build_share_url(&request, config)?;
    match format {
        OutputFormat::Json => println!("{}", json!({ "share_url": url, "errors": "" })),
        OutputFormat::Text => println!("{}", url),
    }
    Ok(())
}

/// Prints the query embedded in a share link.
pub fn run_decode_share_url(url: &str) -> Result<()> {
    let encoded = encoded_segment(url).ok_or_else(|| anyhow!("No /q/ segment in URL"))?;
    println!("{}", decode_query(encoded)?);
    Ok(())
}

fn encoded_segment(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/q/")?;
    rest.split('/').next().filter(|s| !s.is_empty())
}
