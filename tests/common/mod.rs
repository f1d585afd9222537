//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use auth_service::config::{Config, Environment};
use auth_service::http::handlers::register_routes;
use auth_service::lifecycle::{Service, Shutdown, StartupError};
use auth_service::observability::{Logger, MemorySink};
use auth_service::routing::Router;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Development-environment logger capturing into memory.
#[allow(dead_code)]
pub fn capturing_logger() -> (Arc<Logger>, MemorySink) {
    let sink = MemorySink::new();
    let logger = Logger::builder("auth-service")
        .environment(Environment::Development)
        .sink(sink.clone())
        .build();
    (Arc::new(logger), sink)
}

#[allow(dead_code)]
pub fn test_config() -> Config {
    let mut config = Config::new(5501, Environment::Development);
    config.host = "127.0.0.1".parse().unwrap();
    config
}

/// A service running on an ephemeral port.
#[allow(dead_code)]
pub struct RunningService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), StartupError>>,
}

#[allow(dead_code)]
impl RunningService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) -> Result<(), StartupError> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
    }
}

/// Serve `service` on 127.0.0.1 with an OS-assigned port.
#[allow(dead_code)]
pub async fn spawn_service(service: Service) -> RunningService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();

    let handle = tokio::spawn(service.serve(listener, shutdown.clone()));

    RunningService {
        addr,
        shutdown,
        handle,
    }
}

/// Service with the built-in routes plus whatever `register` adds, logging into memory.
#[allow(dead_code)]
pub fn service_with(register: impl FnOnce(&mut Router)) -> (Service, MemorySink) {
    let config = test_config();
    let (logger, sink) = capturing_logger();
    let mut router = Router::new();
    register_routes(&mut router, &config);
    register(&mut router);
    (Service::with_router(config, logger, router), sink)
}

#[allow(dead_code)]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
