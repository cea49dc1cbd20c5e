use axum::handler::Handler;
use axum::routing::get;
use axum::Router;
use parcel_core::config::{HTTP_HOST, HTTP_PORT};
use parcel_core::{ParcelConfig, ParcelConfigSnapshot};
use tokio::net::{TcpListener, ToSocketAddrs};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::routes;
use crate::UploadState;

#[derive(Clone)]
pub struct UploadApp {
    pub config: ParcelConfigSnapshot,
    pub router: Router<()>,
}

impl UploadApp {
    pub fn new(config: &ParcelConfig) -> Self {
        let config = config.snapshot();
        let state = UploadState::from_config(&config);
        Self::with_state(config, state)
    }

    pub fn with_state(config: ParcelConfigSnapshot, state: UploadState) -> Self {
        let router = routes::upload_router(state).route("/health", get(|| async { "ok" }));
        Self { config, router }
    }

    pub fn use_get<H, T>(mut self, path: &str, handler: H) -> Self
    where
        H: Handler<T, ()> + Clone + Send + 'static,
        T: 'static,
    {
        self.router = self.router.route(path, get(handler));
        self
    }

    /// `http.host:http.port`, falling back to `127.0.0.1:3030`.
    pub fn address(&self) -> String {
        let host = self.config.get(HTTP_HOST).unwrap_or("127.0.0.1");
        let port = self.config.get(HTTP_PORT).unwrap_or("3030");
        format!("{host}:{port}")
    }

    /// The router with tracing and `x-request-id` layers applied.
    pub fn into_router(self) -> Router<()> {
        self.router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    pub async fn listen<A>(self, addr: A) -> anyhow::Result<()>
    where
        A: ToSocketAddrs,
    {
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    pub async fn serve(self, listener: TcpListener) -> anyhow::Result<()> {
        info!(addr = %listener.local_addr()?, "parcel upload server listening");
        axum::serve(listener, self.into_router()).await?;
        Ok(())
    }
}

pub fn upload_app(config: &ParcelConfig) -> UploadApp {
    UploadApp::new(config)
}
