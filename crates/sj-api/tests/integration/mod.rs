//! Integration test modules.

pub mod common;
mod health_tests;
mod make_job_tests;
mod metrics_tests;
mod share_url_tests;
