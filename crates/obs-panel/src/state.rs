//! Panel state types
//!
//! The state is rebuilt from scratch on every reload. Nothing here survives a
//! reload except the status message.

use chrono::{DateTime, Utc};
use obs_core::Observer;
use serde::Serialize;

/// Everything the renderer needs to draw the panel
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelState {
    /// Where the panel is in its load cycle
    pub phase: PanelPhase,
    /// One block per metric, in server order
    pub metrics: Vec<MetricBlock>,
    /// Error or success message, never both
    pub status: Option<StatusMessage>,
    /// When the last load finished
    pub last_loaded: Option<DateTime<Utc>>,
}

impl PanelState {
    /// First block for `metric_id`
    pub fn block(&self, metric_id: &str) -> Option<&MetricBlock> {
        self.metrics.iter().find(|b| b.metric_id == metric_id)
    }

    pub fn block_mut(&mut self, metric_id: &str) -> Option<&mut MetricBlock> {
        self.metrics.iter_mut().find(|b| b.metric_id == metric_id)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.status {
            Some(StatusMessage::Error(msg)) => Some(msg.as_str()),
            _ => None,
        }
    }

    pub fn success(&self) -> Option<&str> {
        match &self.status {
            Some(StatusMessage::Success(msg)) => Some(msg.as_str()),
            _ => None,
        }
    }
}

/// A metric and its observer rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricBlock {
    pub metric_id: String,
    pub observers: Vec<Observer>,
    /// Rows are hidden until the metric's toggle is used
    pub expanded: bool,
}

impl MetricBlock {
    pub fn new(metric_id: impl Into<String>) -> Self {
        Self {
            metric_id: metric_id.into(),
            observers: Vec::new(),
            expanded: false,
        }
    }

    pub fn contains(&self, observer_id: &str) -> bool {
        self.observers.iter().any(|o| o.id == observer_id)
    }
}

/// Content of the two status areas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "message", rename_all = "lowercase")]
pub enum StatusMessage {
    Error(String),
    Success(String),
}

impl StatusMessage {
    pub fn text(&self) -> &str {
        match self {
            Self::Error(msg) | Self::Success(msg) => msg.as_str(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Load cycle of the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPhase {
    /// Nothing fetched yet, or content just cleared
    #[default]
    Empty,
    /// A load is in progress
    Loading,
    /// Blocks reflect the last fetch
    Rendered,
    /// The metric list could not be fetched
    Failed,
}
