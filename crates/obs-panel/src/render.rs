//! HTML and plain-text rendering of the panel
//!
//! Every interpolated value goes through [`escape_html`], which is safe for
//! both text and double-quoted attribute contexts. No inline event handlers
//! are emitted; actions are plain form posts.

use crate::state::{MetricBlock, PanelState, StatusMessage};
use std::fmt::Write;

const PAGE_TITLE: &str = "Metric Observers";

/// Escape `&`, `<`, `>`, `"` and `'`
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the full panel page
pub fn render_page(state: &PanelState) -> String {
    let mut metrics = String::new();
    for (index, block) in state.metrics.iter().enumerate() {
        metrics.push_str(&render_block(index, block));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<h1>{title}</h1>
{status}
<div id="metrics">
{metrics}</div>
</body>
</html>
"#,
        title = PAGE_TITLE,
        status = render_status(state.status.as_ref()),
    )
}

/// The error and success areas; at most one is visible
fn render_status(status: Option<&StatusMessage>) -> String {
    let (error, success) = match status {
        Some(StatusMessage::Error(msg)) => (Some(msg.as_str()), None),
        Some(StatusMessage::Success(msg)) => (None, Some(msg.as_str())),
        None => (None, None),
    };
    format!(
        "{}\n{}",
        status_area("error-area", error),
        status_area("success-area", success)
    )
}

fn status_area(id: &str, message: Option<&str>) -> String {
    match message {
        Some(msg) => format!(r#"<div id="{}" class="status">{}</div>"#, id, escape_html(msg)),
        None => format!(r#"<div id="{}" class="status" hidden></div>"#, id),
    }
}

fn render_block(index: usize, block: &MetricBlock) -> String {
    let metric = escape_html(&block.metric_id);
    let mut rows = String::new();
    for observer in &block.observers {
        // Infallible for String
        let _ = write!(
            rows,
            r#"<tr class="observer">
<td class="observer-id">{id}</td>
<td class="callback-url">{url}</td>
<td><form method="post" action="/observers/delete">
<input type="hidden" name="metric_id" value="{metric}">
<input type="hidden" name="observer_id" value="{id}">
<button type="submit">Delete</button>
</form></td>
</tr>
"#,
            id = escape_html(&observer.id),
            url = escape_html(&observer.callback_url),
            metric = metric,
        );
    }

    format!(
        r#"<section class="metric" id="metric-{index}">
<header>
<form method="post" action="/toggle" class="toggle">
<input type="hidden" name="metric_id" value="{metric}">
<button type="submit" aria-expanded="{expanded}">{metric}</button>
</form>
<form method="post" action="/observers" class="add-observer">
<input type="hidden" name="metric_id" value="{metric}">
<input type="text" name="callback_url" placeholder="Callback URL">
<button type="submit">Add</button>
</form>
</header>
<table class="observers"{hidden}>
{rows}</table>
</section>
"#,
        index = index,
        metric = metric,
        expanded = block.expanded,
        hidden = if block.expanded { "" } else { " hidden" },
        rows = rows,
    )
}

/// Plain-text listing used by the CLI
pub fn render_text(state: &PanelState) -> String {
    let mut out = String::new();
    if let Some(status) = &state.status {
        let label = if status.is_error() { "error" } else { "ok" };
        let _ = writeln!(out, "[{}] {}", label, status.text());
    }

    if state.metrics.is_empty() {
        out.push_str("No metrics\n");
        return out;
    }

    for block in &state.metrics {
        let _ = writeln!(out, "{} ({} observers)", block.metric_id, block.observers.len());
        for observer in &block.observers {
            let _ = writeln!(out, "  {}\t{}", observer.id, observer.callback_url);
        }
    }
    out
}
