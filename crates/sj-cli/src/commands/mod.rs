//! CLI command implementations.

mod jobs;
mod serve;
mod share;

pub use jobs::{run_make_job, run_validate_job, MakeJobArgs};
pub use serve::{run_server, ServeConfig};
pub use share::{run_decode_share_url, run_share_url};
