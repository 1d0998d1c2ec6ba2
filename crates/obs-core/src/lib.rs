//! # obs-core
//!
//! Core types for the observer panel.
//!
//! A *metric* is a server-side identifier. An *observer* is a callback URL
//! registered against exactly one metric, so an observer is addressed by the
//! pair `(observer_id, metric_id)`. Everything else in the workspace is built
//! on the types here:
//!
//! - [`Observer`], [`ObserverKey`] and the wire envelopes for the REST API
//! - [`ObsError`], the unified error type, and its [`Result`] alias
//! - [`PanelConfig`], loaded from `.obs/config.toml`

mod config;
mod error;
mod types;

pub use config::{ApiConfig, FetchMode, PanelConfig, PanelSettings, ServerConfig};
pub use error::{ObsError, Result, FETCH_ERROR_MESSAGE};
pub use types::*;
