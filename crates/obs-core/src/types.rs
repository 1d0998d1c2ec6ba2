//! Wire and domain types shared by the client and the panel

use serde::{Deserialize, Serialize};
use std::fmt;

/// A callback URL registered against one metric
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observer {
    /// Server-assigned observer identifier
    pub id: String,
    /// URL the server calls when the metric produces data
    pub callback_url: String,
}

impl Observer {
    pub fn new(id: impl Into<String>, callback_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            callback_url: callback_url.into(),
        }
    }

    /// Composite key of this observer under `metric_id`
    pub fn key(&self, metric_id: &str) -> ObserverKey {
        ObserverKey::new(self.id.clone(), metric_id)
    }
}

/// Composite identity of an observer.
///
/// Observer ids are only unique within their metric, so both halves travel
/// together as separate fields rather than being joined into one string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObserverKey {
    pub observer_id: String,
    pub metric_id: String,
}

impl ObserverKey {
    pub fn new(observer_id: impl Into<String>, metric_id: impl Into<String>) -> Self {
        Self {
            observer_id: observer_id.into(),
            metric_id: metric_id.into(),
        }
    }
}

impl fmt::Display for ObserverKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (metric {})", self.observer_id, self.metric_id)
    }
}

/// Body of `GET /metrics`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricList {
    #[serde(default)]
    pub metrics: Vec<String>,
}

/// Body of `GET /metrics/{id}/observers`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverList {
    #[serde(default)]
    pub observers: Vec<Observer>,
}
