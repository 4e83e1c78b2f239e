#![allow(dead_code)]

use axum::extract::ConnectInfo;
use axum_test::TestServer;
use linker::application::services::{AuthService, ClickRecorder, LinkRegistry};
use linker::infrastructure::persistence::MemoryStore;
use linker::routes::build_router;
use linker::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;

pub const TOKEN: &str = "secret";
pub const BEARER: &str = "Bearer secret";

/// Pool used by HTTP tests, in allocation order.
pub const SLUGS: [&str; 4] = [
    "bored-bulbasaur",
    "happy-charmander",
    "sleepy-squirtle",
    "surprised-pikachu",
];

pub async fn create_test_state() -> AppState {
    create_test_state_with(false, None).await
}

pub async fn create_test_state_with(
    trust_forwarded_for: bool,
    root_redirect: Option<&str>,
) -> AppState {
    let store = MemoryStore::new();
    let link_registry = Arc::new(LinkRegistry::new(Arc::new(store.clone())));
    let slugs: Vec<String> = SLUGS.iter().map(|s| s.to_string()).collect();
    link_registry.seed_pool(&slugs).await.unwrap();

    let click_recorder = Arc::new(ClickRecorder::new(link_registry.clone(), Arc::new(store)));

    AppState {
        link_registry,
        click_recorder,
        auth_service: Arc::new(AuthService::new(TOKEN).unwrap()),
        trust_forwarded_for,
        root_redirect: root_redirect.map(str::to_string),
    }
}

pub fn test_server(state: AppState) -> TestServer {
    TestServer::new(build_router(state).layer(MockConnectInfoLayer)).unwrap()
}

/// Stands in for `into_make_service_with_connect_info`, reporting 127.0.0.1 as the peer.
#[derive(Clone)]
pub struct MockConnectInfoLayer;

impl<S> Layer<S> for MockConnectInfoLayer {
    type Service = MockConnectInfoService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MockConnectInfoService { inner }
    }
}

#[derive(Clone)]
pub struct MockConnectInfoService<S> {
    inner: S,
}

impl<S, B> tower::Service<axum::http::Request<B>> for MockConnectInfoService<S>
where
    S: tower::Service<axum::http::Request<B>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    B: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: axum::http::Request<B>) -> Self::Future {
        let addr: SocketAddr = "127.0.0.1:12345".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        self.inner.call(req)
    }
}
