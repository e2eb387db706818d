//! Submission and reporting HTTP server.

use std::{path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use herald_common::{LogEntry, SendTask, Signal};
use herald_dispatch::{Dispatcher, TenantStats};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, services::ServeFile, timeout::TimeoutLayer};

use crate::error::ApiError;

/// Configuration for the HTTP surface.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Address to bind the API server.
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Directory holding the operator UI pages.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

fn default_listen_address() -> String {
    "[::]:5000".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./static")
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            static_dir: default_static_dir(),
        }
    }
}

/// A batch submission from the operator UI.
#[derive(Debug, Default, Deserialize)]
pub struct SendRequest {
    /// Comma-separated recipient addresses.
    pub recipients: Option<String>,
    pub subject: Option<String>,
    pub email_body: Option<String>,
    #[serde(default)]
    pub is_html: bool,
    pub reply_to: Option<String>,
    pub brand: Option<String>,
}

#[derive(Debug, Serialize)]
struct SendResponse {
    status: &'static str,
    msg: String,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    status: &'static str,
    brands: Vec<TenantStats>,
}

/// The submission and reporting server.
pub struct ApiServer {
    listener: TcpListener,
    router: Router,
}

impl ApiServer {
    /// Bind the listen address and assemble the router.
    ///
    /// # Errors
    ///
    /// Returns an error if binding fails.
    pub async fn new(config: HttpConfig, dispatcher: Arc<Dispatcher>) -> Result<Self, ApiError> {
        let listener =
            TcpListener::bind(&config.listen_address)
                .await
                .map_err(|e| ApiError::Bind {
                    address: config.listen_address.clone(),
                    source: e,
                })?;

        tracing::info!(
            address = %config.listen_address,
            "API server bound successfully"
        );

        let router = Self::router(&config, dispatcher);

        Ok(Self { listener, router })
    }

    fn router(config: &HttpConfig, dispatcher: Arc<Dispatcher>) -> Router {
        Router::new()
            .route("/send-email", post(send_email))
            .route("/get-new-logs", get(get_new_logs))
            .route("/stats", get(stats))
            .route_service(
                "/",
                ServeFile::new(config.static_dir.join("email_hub.html")),
            )
            .route_service(
                "/tool",
                ServeFile::new(config.static_dir.join("email_tool.html")),
            )
            .with_state(dispatcher)
            .layer(CorsLayer::permissive())
            .layer(TimeoutLayer::new(Duration::from_secs(10)))
    }

    /// Run until the shutdown signal is received.
    ///
    /// # Errors
    ///
    /// Returns an error if the server encounters a runtime error.
    pub async fn serve(
        self,
        mut shutdown: tokio::sync::broadcast::Receiver<Signal>,
    ) -> Result<(), ApiError> {
        tracing::info!("API server starting");

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("API server received shutdown signal");
            })
            .await
            .map_err(|e| ApiError::Server(e.to_string()))?;

        tracing::info!("API server stopped");
        Ok(())
    }
}

/// Validate a submission and enqueue one task per recipient.
///
/// Submission is fire-and-forget: after the `Queued` response the only
/// way to observe outcomes is the log and stats endpoints.
async fn send_email(
    State(dispatcher): State<Arc<Dispatcher>>,
    Json(request): Json<SendRequest>,
) -> Result<Json<SendResponse>, ApiError> {
    let recipients = request
        .recipients
        .ok_or(ApiError::MissingField("recipients"))?;
    let subject = request.subject.ok_or(ApiError::MissingField("subject"))?;

    let recipients: Vec<&str> = recipients
        .split(',')
        .map(str::trim)
        .filter(|recipient| !recipient.is_empty())
        .collect();

    if recipients.is_empty() {
        return Err(ApiError::NoRecipients);
    }

    let handle = dispatcher.route(request.brand.as_deref());
    let body = request.email_body.unwrap_or_default();
    let count = recipients.len();

    for recipient in recipients {
        handle.enqueue(SendTask {
            recipient: recipient.to_string(),
            subject: subject.clone(),
            body: body.clone(),
            is_html: request.is_html,
            reply_to: request.reply_to.clone(),
            tenant: handle.config.name.clone(),
        });
    }

    let msg = format!("Queued {count} emails");
    dispatcher.activity().info(&handle.config.name, msg.clone());

    Ok(Json(SendResponse {
        status: "Queued",
        msg,
    }))
}

/// Full activity-log snapshot, oldest entry first.
async fn get_new_logs(State(dispatcher): State<Arc<Dispatcher>>) -> Json<Vec<LogEntry>> {
    Json(dispatcher.activity().snapshot())
}

/// Per-brand dispatch statistics.
async fn stats(State(dispatcher): State<Arc<Dispatcher>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        status: "Running",
        brands: dispatcher.report(),
    })
}
