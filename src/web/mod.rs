//! Embedded web dashboard for launchdash.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page dashboard with the site selector, payload slider, and
//!   both charts
//! - JSON API endpoints for the layout and the two chart callbacks
//!
//! Launched via `launchdash serve` (default: `http://127.0.0.1:8050`).

mod api;
mod frontend;

use std::io::Cursor;

use anyhow::{Context, Result};
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::config::LaunchdashConfig;
use crate::dataset::Dataset;

/// Read-only state shared by every request handler.
#[derive(Debug, Clone, Copy)]
pub struct AppState<'a> {
    pub dataset: &'a Dataset,
    pub config: &'a LaunchdashConfig,
}

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the web dashboard server on the given address.
///
/// Blocks the current thread. Handles requests sequentially, so every
/// callback sees a complete control state and the unchanging dataset.
/// Errors are reported per-request without stopping the server.
pub fn serve(addr: &str, state: AppState<'_>) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!(
        "launchdash dashboard running at http://{addr} ({} launches, {} sites)",
        state.dataset.len(),
        state.dataset.sites().len()
    );
    println!("Press Ctrl+C to stop.\n");

    if state.config.server.open_browser {
        let _ = open_browser(&format!("http://{addr}"));
    }

    for request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let resp = match dispatch(state, &method, &url) {
            Ok(resp) => resp,
            Err(e) => error_response(StatusCode(500), &format!("{e:#}")),
        };
        let status = resp.status_code().0;
        let _ = request.respond(resp);

        if state.config.server.access_log {
            println!(
                "{} {} {} {}",
                method,
                url,
                status,
                chrono::Local::now().format("%H:%M:%S")
            );
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(state: AppState<'_>, method: &Method, url: &str) -> Result<Response<Cursor<Vec<u8>>>> {
    // Strip query string for path matching
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        // Frontend
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        // API — Dashboard
        (&Method::Get, "/api/layout") => api::get_layout(state),
        (&Method::Get, "/api/charts") => api::get_charts(state, url),
        (&Method::Get, "/api/charts/pie") => api::get_pie_chart(state, url),
        (&Method::Get, "/api/charts/scatter") => api::get_scatter_chart(state, url),

        // API — Diagnostics
        (&Method::Get, "/api/history") => api::get_history(state, url),
        (&Method::Get, "/api/health") => api::get_health(state),

        // 404
        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

/// Serve the embedded single-page frontend.
fn serve_frontend() -> Response<Cursor<Vec<u8>>> {
    let html = frontend::INDEX_HTML;
    Response::from_data(html.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

/// 404 response.
fn not_found() -> Response<Cursor<Vec<u8>>> {
    error_response(StatusCode(404), "not found")
}

/// JSON `{"error": ...}` response with the given status.
pub(crate) fn error_response(status: StatusCode, message: &str) -> Response<Cursor<Vec<u8>>> {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(status)
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid ASCII")
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8")
        .expect("static header is valid ASCII")
}

/// Attempt to open a URL in the system default browser.
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", url])
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(url)
            .spawn()
            .context("failed to open browser")?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
