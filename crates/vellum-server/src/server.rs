//! Development server implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use vellum_static::{SiteBuilder, SiteConfig};

use crate::watcher::{FileWatcher, WatchEvent};
use crate::websocket::{reload_client_script, ReloadHub, ReloadMessage};

/// Configuration for the development server.
#[derive(Debug, Clone)]
pub struct DevServerConfig {
    /// Site build configuration
    pub site: SiteConfig,

    /// Config file watched for changes
    pub config_path: Option<PathBuf>,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            site: SiteConfig::default(),
            config_path: Some(PathBuf::from("blog.toml")),
            port: 7777,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind to {0}: {1}")]
    Bind(SocketAddr, String),

    #[error("File watch error: {0}")]
    Watch(String),

    #[error("Build error: {0}")]
    Build(String),
}

/// Shared server state.
struct ServerState {
    hub: ReloadHub,
    ws_url: String,
}

/// Development server.
pub struct DevServer {
    config: DevServerConfig,
}

impl DevServer {
    /// Create a new development server.
    pub fn new(mut config: DevServerConfig) -> Self {
        // Every page built by the dev server carries the reload client.
        config.site.live_reload = true;
        Self { config }
    }

    /// Start the development server.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .expect("Invalid address");

        let builder = Arc::new(SiteBuilder::new(self.config.site.clone()));

        // Initial build
        let result = builder
            .build()
            .map_err(|e| ServerError::Build(e.to_string()))?;
        tracing::info!(
            "Built {} pages ({} posts) in {}ms",
            result.pages,
            result.posts,
            result.duration_ms
        );

        let hub = ReloadHub::new();
        let state = Arc::new(ServerState {
            hub: hub.clone(),
            ws_url: format!("ws://{}/__reload", addr),
        });

        let (watcher, mut rx) = FileWatcher::new(&self.watch_paths())
            .map_err(|e| ServerError::Watch(e.to_string()))?;

        let builder_clone = Arc::clone(&builder);
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                handle_watch_event(&builder_clone, &hub, event).await;
            }
            // Keep watcher alive
            drop(watcher);
        });

        let app = Router::new()
            .route("/__reload", get(ws_handler))
            .route("/__reload.js", get(reload_script_handler))
            .fallback_service(
                ServeDir::new(&self.config.site.output_dir)
                    .not_found_service(tower_http::services::ServeFile::new(
                        not_found_page(&self.config.site.output_dir),
                    )),
            )
            .with_state(state);

        tracing::info!("Starting dev server at http://{}", addr);

        if self.config.open {
            let url = format!("http://{}", addr);
            let _ = open::that(&url);
        }

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Bind(addr, e.to_string()))?;

        Ok(())
    }

    /// Paths watched for changes: the post store, static files, and the
    /// config file.
    fn watch_paths(&self) -> Vec<PathBuf> {
        let mut paths = vec![self.config.site.posts_path.clone()];
        if let Some(static_dir) = &self.config.site.static_dir {
            paths.push(static_dir.clone());
        }
        if let Some(config_path) = &self.config.config_path {
            paths.push(config_path.clone());
        }
        paths
    }
}

/// Handle file watch events by rebuilding and notifying clients.
async fn handle_watch_event(builder: &Arc<SiteBuilder>, hub: &ReloadHub, event: WatchEvent) {
    match &event {
        WatchEvent::PostsModified(path) => {
            tracing::info!("Posts modified: {}", path.display());
        }
        WatchEvent::ConfigModified(path) => {
            tracing::info!("Config modified: {} (restart to apply)", path.display());
        }
        WatchEvent::Created(path) | WatchEvent::Deleted(path) | WatchEvent::Modified(path) => {
            tracing::info!("Changed: {}", path.display());
        }
    }

    let builder = Arc::clone(builder);
    let rebuild = tokio::task::spawn_blocking(move || builder.build()).await;

    match rebuild {
        Ok(Ok(result)) => {
            tracing::info!("Rebuilt {} pages in {}ms", result.pages, result.duration_ms);
            hub.send(ReloadMessage::Reload);
        }
        Ok(Err(e)) => {
            tracing::error!("Rebuild failed: {}", e);
            hub.send(ReloadMessage::BuildFailed {
                message: e.to_string(),
            });
        }
        Err(e) => {
            tracing::error!("Rebuild task failed: {}", e);
        }
    }
}

/// Handler for the reload WebSocket endpoint.
async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws(mut socket: WebSocket, state: Arc<ServerState>) {
    let mut rx = state.hub.subscribe();

    let msg = serde_json::to_string(&ReloadMessage::Connected).unwrap();
    if socket.send(Message::Text(msg.into())).await.is_err() {
        return;
    }

    while let Ok(reload_msg) = rx.recv().await {
        let json = serde_json::to_string(&reload_msg).unwrap();
        if socket.send(Message::Text(json.into())).await.is_err() {
            break;
        }
    }
}

/// Handler for the reload client script.
async fn reload_script_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    let script = reload_client_script(&state.ws_url);
    ([("content-type", "application/javascript")], script)
}

/// Path of the built 404 page, served for unknown routes.
fn not_found_page(output_dir: &std::path::Path) -> PathBuf {
    output_dir.join("404.html")
}
