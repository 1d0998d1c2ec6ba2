//! # obs-panel
//!
//! Web panel listing metrics and the observers registered on them.
//!
//! [`ObserverPanel`] holds the panel state and performs the four actions
//! (load, add, delete, toggle). [`render`] turns that state into HTML, and
//! [`run`] serves it with an embedded Axum server.

mod panel;
pub mod render;
pub mod server;
mod state;

pub use panel::{ObserverPanel, SharedPanel};
pub use state::{MetricBlock, PanelPhase, PanelState, StatusMessage};

use obs_core::PanelConfig;
use tracing::{info, warn};

/// Run the panel web server described by `config`
pub async fn run(config: PanelConfig) -> obs_core::Result<()> {
    let panel = ObserverPanel::connect(&config)?;
    let addr = format!("0.0.0.0:{}", config.server.port);
    let url = format!("http://localhost:{}", config.server.port);

    info!(
        "Starting observer panel on {} (API {}, {:?} fetch)",
        addr, config.api.base_url, config.panel.fetch_mode
    );

    if config.server.open_browser {
        let url = url.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(500)).await;
            if let Err(e) = open::that(&url) {
                warn!("Failed to open browser: {}", e);
            }
        });
    }

    println!("Observer panel running at {}", url);
    println!("Press Ctrl+C to stop");

    server::serve(panel, &addr).await
}
