//! # obs-client
//!
//! Client side of the metrics REST API.
//!
//! [`MetricsApi`] is the seam the panel talks through; [`HttpMetricsApi`] is
//! the reqwest implementation used in production. Tests substitute their own
//! implementations of the trait.

mod api;
mod http;

pub use api::MetricsApi;
pub use http::HttpMetricsApi;
