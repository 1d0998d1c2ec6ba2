//! The four operations the panel needs from the metrics service

use async_trait::async_trait;
use obs_core::{Observer, ObserverKey, Result};
use std::sync::Arc;

/// Access to the metrics service.
///
/// List operations fail with [`obs_core::ObsError::Fetch`]; add and delete
/// fail with [`obs_core::ObsError::Mutation`].
#[async_trait]
pub trait MetricsApi: Send + Sync {
    /// `GET /metrics`, in server order
    async fn list_metrics(&self) -> Result<Vec<String>>;

    /// `GET /metrics/{metric_id}/observers`, in server order
    async fn list_observers(&self, metric_id: &str) -> Result<Vec<Observer>>;

    /// `POST /metrics/{metric_id}/observers` with the raw callback URL as body
    async fn add_observer(&self, metric_id: &str, callback_url: &str) -> Result<()>;

    /// `DELETE /metrics/{metric_id}/observers/{observer_id}`
    async fn delete_observer(&self, key: &ObserverKey) -> Result<()>;
}

#[async_trait]
impl<T: MetricsApi + ?Sized> MetricsApi for Arc<T> {
    async fn list_metrics(&self) -> Result<Vec<String>> {
        (**self).list_metrics().await
    }

    async fn list_observers(&self, metric_id: &str) -> Result<Vec<Observer>> {
        (**self).list_observers(metric_id).await
    }

    async fn add_observer(&self, metric_id: &str, callback_url: &str) -> Result<()> {
        (**self).add_observer(metric_id, callback_url).await
    }

    async fn delete_observer(&self, key: &ObserverKey) -> Result<()> {
        (**self).delete_observer(key).await
    }
}
