//! Axum web server for the panel

use crate::{render, SharedPanel};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Json},
    routing::{get, post},
    Router,
};
use obs_core::ObserverKey;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

/// Shared application state. The mutex serializes every panel action.
pub struct AppState {
    pub panel: Mutex<SharedPanel>,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
pub struct AddObserverForm {
    pub metric_id: String,
    #[serde(default)]
    pub callback_url: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteObserverForm {
    pub metric_id: String,
    pub observer_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub metric_id: String,
}

/// Build the router around `panel`
pub fn router(panel: SharedPanel) -> Router {
    let state = Arc::new(AppState {
        panel: Mutex::new(panel),
    });

    Router::new()
        .route("/", get(index))
        .route("/observers", post(add_observer))
        .route("/observers/delete", post(delete_observer))
        .route("/toggle", post(toggle))
        .route("/api/panel", get(get_panel))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the panel on `addr` until the process is stopped
pub async fn serve(panel: SharedPanel, addr: &str) -> obs_core::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(panel)).await?;
    Ok(())
}

/// GET / - fresh load, status areas hidden
async fn index(State(app): State<SharedState>) -> Html<String> {
    let mut panel = app.panel.lock().await;
    panel.clear_status();
    // Failures are already reflected in the error area
    let _ = panel.reload().await;
    Html(render::render_page(panel.state()))
}

/// POST /observers
async fn add_observer(
    State(app): State<SharedState>,
    Form(form): Form<AddObserverForm>,
) -> Html<String> {
    let mut panel = app.panel.lock().await;
    let _ = panel.add_observer(&form.metric_id, &form.callback_url).await;
    Html(render::render_page(panel.state()))
}

/// POST /observers/delete
async fn delete_observer(
    State(app): State<SharedState>,
    Form(form): Form<DeleteObserverForm>,
) -> Html<String> {
    let key = ObserverKey::new(form.observer_id, form.metric_id);
    let mut panel = app.panel.lock().await;
    let _ = panel.delete_observer(&key).await;
    Html(render::render_page(panel.state()))
}

/// POST /toggle - no refetch
async fn toggle(
    State(app): State<SharedState>,
    Form(form): Form<ToggleForm>,
) -> impl IntoResponse {
    let mut panel = app.panel.lock().await;
    let status = match panel.toggle(&form.metric_id) {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::NOT_FOUND,
    };
    (status, Html(render::render_page(panel.state())))
}

/// GET /api/panel - current state as JSON
async fn get_panel(State(app): State<SharedState>) -> Json<crate::PanelState> {
    Json(app.panel.lock().await.state().clone())
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "obs-panel"
    }))
}
