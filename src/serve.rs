//! Development server.
//!
//! Pages are rendered per request from the current content snapshot, so a
//! watcher rebuild shows up on the next reload without writing `public/`.
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐
//! │   Main Thread   │     │  Watcher Thread  │
//! │  (HTTP Server)  │     │  (File Monitor)  │
//! └────────┬────────┘     └────────┬─────────┘
//!          │                       │
//!          ▼                       ▼
//!     snapshot() ◄──── ContentStore ◄──── replace()
//! ```
//!
//! Request resolution order:
//! 1. Route matches a page, feed or sitemap → render it
//! 2. File under the assets directory → serve it
//! 3. Otherwise → 404 with the rendered not-found page

use crate::{
    config::SiteConfig,
    content::ContentStore,
    generator::{render_feed, render_sitemap},
    log,
    site::{Renderer, Route, resolve},
    watch::watch_for_changes_blocking,
};
use anyhow::{Context, Result, anyhow};
use std::{fs, net::SocketAddr, path::Path, sync::Arc};
use tiny_http::{Header, Request, Response, Server, StatusCode};

/// Try binding to port, retry with incremented port if in use
const MAX_PORT_RETRIES: u16 = 10;

// ============================================================================
// Server Entry Point
// ============================================================================

/// Serve `store` until Ctrl+C, watching the content directory if enabled.
pub fn serve_site(config: &'static SiteConfig, store: Arc<ContentStore>) -> Result<()> {
    let interface: std::net::IpAddr = config.serve.interface.parse().with_context(|| {
        format!("Invalid [serve.interface]: {}", config.serve.interface)
    })?;
    let renderer = Renderer::new(config)?;

    let (server, addr) = try_bind_port(interface, config.serve.port, MAX_PORT_RETRIES)?;
    let server = Arc::new(server);

    let server_for_signal = Arc::clone(&server);
    ctrlc::set_handler(move || {
        log!("serve"; "shutting down...");
        server_for_signal.unblock();
    })
    .context("Failed to set Ctrl+C handler")?;

    log!("serve"; "http://{}", addr);

    if config.serve.watch {
        let store = Arc::clone(&store);
        std::thread::spawn(move || {
            if let Err(err) = watch_for_changes_blocking(config, &store) {
                log!("watch"; "{err}");
            }
        });
    }

    for request in server.incoming_requests() {
        if let Err(e) = handle_request(request, config, &store, &renderer) {
            log!("serve"; "request error: {e}");
        }
    }

    Ok(())
}

/// Try to bind to a port, retrying with incremented port numbers if in use.
fn try_bind_port(
    interface: std::net::IpAddr,
    base_port: u16,
    max_retries: u16,
) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;

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
            Err(e) => last_error = Some(e),
        }
    }

    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        max_retries,
        base_port,
        base_port.saturating_add(max_retries.saturating_sub(1)),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

// ============================================================================
// Request Handling
// ============================================================================

/// A fully rendered response.
#[derive(Debug)]
struct Reply {
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
}

impl Reply {
    fn ok(content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type,
            body: body.into(),
        }
    }

    fn html(body: String) -> Self {
        Self::ok("text/html; charset=utf-8", body)
    }
}

fn handle_request(
    request: Request,
    config: &SiteConfig,
    store: &ContentStore,
    renderer: &Renderer,
) -> Result<()> {
    let reply = reply_for(request.url(), config, store, renderer)?;
    respond(request, reply)
}

/// Decode a raw request URL and route it. Undecodable paths are not found.
fn reply_for(
    raw_url: &str,
    config: &SiteConfig,
    store: &ContentStore,
    renderer: &Renderer,
) -> Result<Reply> {
    // Decode URL-encoded characters (e.g., %20 → space)
    match urlencoding::decode(raw_url) {
        Ok(url_path) => route_request(&url_path, config, store, renderer),
        Err(_) => not_found(renderer),
    }
}

/// Resolve a decoded request path to a reply.
fn route_request(
    url_path: &str,
    config: &SiteConfig,
    store: &ContentStore,
    renderer: &Renderer,
) -> Result<Reply> {
    let collections = store.snapshot();
    let route = Route::parse(url_path);

    match route {
        Route::Feed => {
            let xml = render_feed(config, &collections)?;
            return Ok(Reply::ok("application/rss+xml; charset=utf-8", xml));
        }
        Route::Sitemap => {
            let xml = render_sitemap(config, &collections);
            return Ok(Reply::ok("application/xml; charset=utf-8", xml));
        }
        _ => {}
    }

    if let Some(page) = resolve(&route, &collections, config.build.hide_drafts) {
        return Ok(Reply::html(renderer.render(&page)?));
    }

    if let Some(asset) = asset_path(&config.build.assets, url_path) {
        let body = fs::read(&asset).with_context(|| format!("Failed to read {}", asset.display()))?;
        return Ok(Reply::ok(guess_content_type(&asset), body));
    }

    not_found(renderer)
}

fn not_found(renderer: &Renderer) -> Result<Reply> {
    Ok(Reply {
        status: 404,
        ..Reply::html(renderer.render_not_found()?)
    })
}

/// File under `assets` for a request path, if one exists.
fn asset_path(assets: &Path, url_path: &str) -> Option<std::path::PathBuf> {
    // Strip query string (e.g., ?t=123456) before resolving path
    let path = url_path.split('?').next().unwrap_or_default();
    let relative = path.trim_matches('/');
    if relative.is_empty() || relative.split('/').any(|segment| segment == "..") {
        return None;
    }

    let local_path = assets.join(relative);
    local_path.is_file().then_some(local_path)
}

fn respond(request: Request, reply: Reply) -> Result<()> {
    let header = Header::from_bytes("Content-Type", reply.content_type)
        .map_err(|()| anyhow!("invalid content type `{}`", reply.content_type))?;
    let response = Response::from_data(reply.body)
        .with_status_code(StatusCode(reply.status))
        .with_header(header);

    request.respond(response)?;
    Ok(())
}

// ============================================================================
// Content Type Detection
// ============================================================================

/// Guess MIME content type from file extension.
///
/// Returns `application/octet-stream` for unknown extensions.
fn guess_content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js" | "mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json; charset=utf-8",
        Some("xml") => "application/xml; charset=utf-8",

        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        Some("txt") => "text/plain; charset=utf-8",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{DeriveOptions, build_collections, kinds};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn setup() -> (TempDir, SiteConfig, ContentStore, Renderer) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        write(root, "content/tags/rust.json", r#"{ "name": "Rust" }"#);
        write(root, "content/tags/lang/go.json", r#"{ "name": "Go" }"#);
        write(
            root,
            "content/posts/hello.mdx",
            "---\ndraft: false\npublishedAt: 2024-01-01\ntitle: Hello\ndescription: D\n\
             coverImage: { url: /c.png, width: 1, height: 1, alt: c }\n\
             tags: [rust]\nauthors: []\n---\nBody\n",
        );
        write(root, "assets/style.css", "body {}");

        let mut config = SiteConfig::default();
        config.base.title = "Acme".into();
        config.base.url = Some("http://127.0.0.1:5277".into());
        config.build.assets = root.join("assets");

        let registry = kinds::default_registry().unwrap();
        let collections =
            build_collections(&registry, &root.join("content"), &DeriveOptions::default()).unwrap();
        let renderer = Renderer::new(&config).unwrap();
        (dir, config, ContentStore::new(collections), renderer)
    }

    fn get(url: &str) -> Reply {
        let (_dir, config, store, renderer) = setup();
        route_request(url, &config, &store, &renderer).unwrap()
    }

    #[test]
    fn test_serves_pages() {
        let reply = get("/posts/hello");
        assert_eq!(reply.status, 200);
        assert!(reply.content_type.starts_with("text/html"));
        assert!(String::from_utf8(reply.body).unwrap().contains("Hello"));

        assert_eq!(get("/tags/rust/").status, 200);
        assert_eq!(get("/tags/lang/go").status, 200);
        assert_eq!(get("/?utm=x").status, 200);
    }

    #[test]
    fn test_unknown_slug_is_404() {
        let reply = get("/posts/does-not-exist");
        assert_eq!(reply.status, 404);
        assert!(String::from_utf8(reply.body).unwrap().contains("Not Found"));

        assert_eq!(get("/authors/ghost").status, 404);
        assert_eq!(get("/nope/deeper").status, 404);
    }

    #[test]
    fn test_serves_feed_and_sitemap() {
        let feed = get("/rss.xml");
        assert_eq!(feed.status, 200);
        assert!(feed.content_type.starts_with("application/rss+xml"));

        let sitemap = String::from_utf8(get("/sitemap.xml").body).unwrap();
        assert!(sitemap.contains("http://127.0.0.1:5277/posts/hello"));
    }

    #[test]
    fn test_serves_assets() {
        let reply = get("/style.css?v=2");
        assert_eq!(reply.status, 200);
        assert_eq!(reply.content_type, "text/css; charset=utf-8");
        assert_eq!(reply.body, b"body {}");
    }

    #[test]
    fn test_asset_path_rejects_traversal() {
        let (dir, config, ..) = setup();
        assert!(asset_path(&config.build.assets, "/../content/tags/rust.json").is_none());
        assert_eq!(
            asset_path(&config.build.assets, "/style.css"),
            Some(dir.path().join("assets").join("style.css"))
        );
        assert_eq!(asset_path(&config.build.assets, "/"), None::<PathBuf>);
    }

    #[test]
    fn test_sitemap_urls_are_served() {
        let (_dir, config, store, renderer) = setup();
        let sitemap = render_sitemap(&config, &store.snapshot());
        let site_url = config.site_url();

        for loc in sitemap
            .lines()
            .filter_map(|line| line.trim().strip_prefix("<loc>"))
            .filter_map(|line| line.strip_suffix("</loc>"))
        {
            let path = loc.strip_prefix(site_url).unwrap_or_default();
            let reply = route_request(path, &config, &store, &renderer).unwrap();
            assert_eq!(reply.status, 200, "{loc}");
        }
    }

    #[test]
    fn test_undecodable_path_is_404() {
        let (_dir, config, store, renderer) = setup();
        let reply = reply_for("/%FF", &config, &store, &renderer).unwrap();
        assert_eq!(reply.status, 404);

        let reply = reply_for("/posts/hell%6F", &config, &store, &renderer).unwrap();
        assert_eq!(reply.status, 200);
    }

    #[test]
    fn test_guess_content_type() {
        assert_eq!(guess_content_type(Path::new("a.png")), "image/png");
        assert_eq!(guess_content_type(Path::new("a.unknown")), "application/octet-stream");
    }
}
