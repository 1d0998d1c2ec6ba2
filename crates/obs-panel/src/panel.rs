//! The observer panel
//!
//! [`ObserverPanel`] owns its API handle and its [`PanelState`]. Loads rebuild
//! the state from scratch; mutations issue one request and then reload, so the
//! panel always ends up showing what the server holds.

use crate::state::{MetricBlock, PanelPhase, PanelState, StatusMessage};
use chrono::Utc;
use futures::future::join_all;
use obs_client::{HttpMetricsApi, MetricsApi};
use obs_core::{FetchMode, ObsError, Observer, ObserverKey, PanelConfig, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// Panel backed by a type-erased API handle, as used by the server and CLI
pub type SharedPanel = ObserverPanel<Arc<dyn MetricsApi>>;

/// Lists metrics and their observers and applies add/delete actions
pub struct ObserverPanel<A> {
    api: A,
    fetch_mode: FetchMode,
    state: PanelState,
}

impl SharedPanel {
    /// Build a panel talking HTTP to the API named in `config`
    pub fn connect(config: &PanelConfig) -> Result<Self> {
        let api: Arc<dyn MetricsApi> = Arc::new(HttpMetricsApi::new(&config.api.base_url)?);
        Ok(ObserverPanel::new(api).with_fetch_mode(config.panel.fetch_mode))
    }
}

impl<A: MetricsApi> ObserverPanel<A> {
    /// Create an empty panel; nothing is fetched until [`Self::reload`]
    pub fn new(api: A) -> Self {
        Self {
            api,
            fetch_mode: FetchMode::default(),
            state: PanelState::default(),
        }
    }

    pub fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Hide both status areas
    pub fn clear_status(&mut self) {
        self.state.status = None;
    }

    /// Clear all blocks and load everything again
    pub async fn reload(&mut self) -> Result<()> {
        self.state.metrics.clear();
        self.state.phase = PanelPhase::Empty;
        self.load_metrics().await
    }

    /// Fetch the metric list, create one collapsed block per metric, then
    /// fill each block with its observers.
    ///
    /// Blocks keep server order whatever the fetch mode. A failed observer
    /// fetch leaves that block empty, reports the generic fetch error and
    /// does not stop the other metrics from loading; the first such error is
    /// returned once every metric has been tried.
    pub async fn load_metrics(&mut self) -> Result<()> {
        self.state.phase = PanelPhase::Loading;

        let metric_ids = match self.api.list_metrics().await {
            Ok(ids) => ids,
            Err(e) => {
                self.state.metrics.clear();
                self.state.phase = PanelPhase::Failed;
                self.report_fetch_error(&e);
                return Err(e);
            }
        };

        info!("Loaded {} metrics", metric_ids.len());
        self.state.metrics = metric_ids.iter().map(MetricBlock::new).collect();

        let mut first_error = None;
        match self.fetch_mode {
            FetchMode::Sequential => {
                for (index, metric_id) in metric_ids.iter().enumerate() {
                    let result = self.api.list_observers(metric_id).await;
                    if let Err(e) = self.apply_observers(index, result) {
                        first_error.get_or_insert(e);
                    }
                }
            }
            FetchMode::Concurrent => {
                let results =
                    join_all(metric_ids.iter().map(|id| self.api.list_observers(id))).await;
                for (index, result) in results.into_iter().enumerate() {
                    if let Err(e) = self.apply_observers(index, result) {
                        first_error.get_or_insert(e);
                    }
                }
            }
        }

        self.state.phase = PanelPhase::Rendered;
        self.state.last_loaded = Some(Utc::now());

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Fetch one metric's observers into its block, hidden
    pub async fn load_observers(&mut self, metric_id: &str) -> Result<()> {
        let index = self
            .state
            .metrics
            .iter()
            .position(|b| b.metric_id == metric_id)
            .ok_or_else(|| ObsError::InvalidInput(format!("Unknown metric: {}", metric_id)))?;

        let result = self.api.list_observers(metric_id).await;
        self.apply_observers(index, result)
    }

    /// Show or hide one metric's rows. Returns whether they are now visible.
    pub fn toggle(&mut self, metric_id: &str) -> Result<bool> {
        let block = self
            .state
            .block_mut(metric_id)
            .ok_or_else(|| ObsError::InvalidInput(format!("Unknown metric: {}", metric_id)))?;
        block.expanded = !block.expanded;
        Ok(block.expanded)
    }

    /// Register `callback_url` under `metric_id`, then reload.
    ///
    /// A blank URL is rejected before any request is made. Otherwise the
    /// value is posted as given, the panel reloads whether or not the server
    /// accepted the observer, and the returned result is the outcome of the
    /// POST itself.
    pub async fn add_observer(&mut self, metric_id: &str, callback_url: &str) -> Result<()> {
        if callback_url.trim().is_empty() {
            let err = ObsError::InvalidInput("Callback URL must not be empty".to_string());
            self.state.status = Some(StatusMessage::Error(err.user_message()));
            return Err(err);
        }

        info!("Adding observer {} to metric {}", callback_url, metric_id);
        let outcome = self.api.add_observer(metric_id, callback_url).await;
        self.finish_mutation(outcome, "Observer added").await
    }

    /// Remove the observer identified by `key`, then reload
    pub async fn delete_observer(&mut self, key: &ObserverKey) -> Result<()> {
        info!("Deleting observer {}", key);
        let outcome = self.api.delete_observer(key).await;
        self.finish_mutation(outcome, "Observer deleted").await
    }

    async fn finish_mutation(&mut self, outcome: Result<()>, success: &str) -> Result<()> {
        self.state.status = Some(match &outcome {
            Ok(()) => StatusMessage::Success(success.to_string()),
            Err(e) => {
                warn!("Mutation failed: {}", e);
                StatusMessage::Error(e.user_message())
            }
        });

        if let Err(e) = self.reload().await {
            warn!("Reload after mutation failed: {}", e);
        }
        outcome
    }

    fn apply_observers(&mut self, index: usize, result: Result<Vec<Observer>>) -> Result<()> {
        match result {
            Ok(observers) => {
                if let Some(block) = self.state.metrics.get_mut(index) {
                    block.observers = observers;
                    block.expanded = false;
                }
                Ok(())
            }
            Err(e) => {
                self.report_fetch_error(&e);
                Err(e)
            }
        }
    }

    fn report_fetch_error(&mut self, err: &ObsError) {
        warn!("{}", err);
        self.state.status = Some(StatusMessage::Error(err.user_message()));
    }
}
