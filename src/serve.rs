//! Development server.
//!
//! A small static file server over the output tree, built on `tiny_http`:
//!
//! - `/` and any path ending in `/` resolve to `index.html` inside it
//! - a directory requested without the trailing slash also gets its `index.html`
//! - missing files are 404, any other filesystem failure is 500
//! - Ctrl+C shuts the server down
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌──────────────────┐
//! │   Main Thread   │     │  Watcher Thread  │     │  Rebuild Worker  │
//! │  (HTTP Server)  │     │ (event filtering)│────▶│  (build_site)    │
//! └────────┬────────┘     └──────────────────┘     └────────┬─────────┘
//!          │ read                                           │ write
//!          └────────────────────▶ dist/ ◀───────────────────┘
//! ```
//!
//! Reads and rebuilds share no lock.

use crate::{config::SiteConfig, log, watch::watch_for_changes_blocking};
use anyhow::{Context, Result, anyhow};
use std::{
    fs::{self, File},
    io::{self, ErrorKind},
    net::{IpAddr, SocketAddr},
    path::{Component, Path, PathBuf},
    sync::Arc,
};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

/// File served for directory paths.
const INDEX_FILE: &str = "index.html";

// ============================================================================
// Server Entry Point
// ============================================================================

/// Serve the output tree and rebuild on changes. Blocks until Ctrl+C.
pub fn serve_site(config: &'static SiteConfig) -> Result<()> {
    let interface: IpAddr = config
        .serve
        .interface
        .parse()
        .with_context(|| format!("Invalid [serve.interface]: {}", config.serve.interface))?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    std::thread::spawn(move || {
        if let Err(err) = watch_for_changes_blocking(config) {
            log!("watch"; "{err:#}");
        }
    });

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, &config.build.output) {
            log!("serve"; "request error: {e:#}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(interface: IpAddr, base_port: u16, max_retries: u16) -> Result<(Server, SocketAddr)> {
    let mut last_err = None;

    for offset in 0..max_retries {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_err = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_err.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Resolution
// ============================================================================

/// Outcome of mapping a URL onto the output tree.
#[derive(Debug)]
pub enum Resolved {
    File(PathBuf),
    NotFound,
    Error(io::Error),
}

/// Map a request URL onto a file under `serve_root`.
pub fn resolve_request(serve_root: &Path, url: &str) -> Resolved {
    // Decode URL-encoded characters (e.g., %20 → space)
    let decoded = urlencoding::decode(url)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| url.to_owned());

    // Strip query string and fragment before resolving
    let path = decoded.split(['?', '#']).next().unwrap_or_default();

    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return Resolved::NotFound;
    }

    let mut local = serve_root.join(relative);
    if path.ends_with('/') {
        local.push(INDEX_FILE);
    }

    match fs::metadata(&local) {
        Ok(meta) if meta.is_dir() => resolve_index(local.join(INDEX_FILE)),
        Ok(_) => Resolved::File(local),
        Err(e) if e.kind() == ErrorKind::NotFound => Resolved::NotFound,
        Err(e) => Resolved::Error(e),
    }
}

fn resolve_index(index: PathBuf) -> Resolved {
    match fs::metadata(&index) {
        Ok(meta) if meta.is_file() => Resolved::File(index),
        Ok(_) => Resolved::NotFound,
        Err(e) if e.kind() == ErrorKind::NotFound => Resolved::NotFound,
        Err(e) => Resolved::Error(e),
    }
}

// ============================================================================
// Request Handling
// ============================================================================

fn handle_request(request: Request, serve_root: &Path) -> Result<()> {
    match resolve_request(serve_root, request.url()) {
        Resolved::File(path) => match File::open(&path) {
            Ok(file) => serve_file(request, file, &path),
            Err(e) if e.kind() == ErrorKind::NotFound => serve_status(request, 404, "404 Not Found"),
            Err(e) => {
                log!("serve"; "{}: {e}", path.display());
                serve_status(request, 500, "500 Internal Server Error")
            }
        },
        Resolved::NotFound => serve_status(request, 404, "404 Not Found"),
        Resolved::Error(e) => {
            log!("serve"; "{}: {e}", request.url());
            serve_status(request, 500, "500 Internal Server Error")
        }
    }
}

/// Stream a file with a content type guessed from its extension.
fn serve_file(request: Request, file: File, path: &Path) -> Result<()> {
    let response = Response::from_file(file).with_header(content_type(guess_content_type(path))?);
    request.respond(response)?;
    Ok(())
}

fn serve_status(request: Request, code: u16, body: &str) -> Result<()> {
    let response = Response::from_string(body)
        .with_status_code(StatusCode(code))
        .with_header(content_type("text/plain; charset=utf-8")?);
    request.respond(response)?;
    Ok(())
}

fn content_type(value: &str) -> Result<Header> {
    Header::from_bytes("Content-Type", value).map_err(|()| anyhow!("Invalid header value: {value}"))
}

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("map") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        Some("mp3") => "audio/mpeg",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        Some("pdf") => "application/pdf",

        _ => "application/octet-stream",
    }
}
