//! Shared fixtures: stub providers and a gateway on ephemeral ports.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;

use wrapper_core::config::ServerConfig;
use wrapper_providers::{Dispatcher, TextProvider};
use wrapper_server::{Gateway, GenerateService};

#[derive(Clone, Copy)]
pub enum Reply {
    Text(&'static str),
    /// Reply after a delay.
    Slow(&'static str, Duration),
    Fail(&'static str),
    Hang,
}

pub struct StubProvider {
    name: &'static str,
    reply: Reply,
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn new(name: &'static str, reply: Reply) -> Arc<Self> {
        Arc::new(Self {
            name,
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextProvider for StubProvider {
    async fn complete(&self, _model: &str, _prompt: &str) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            Reply::Text(text) => Ok(text.to_string()),
            Reply::Slow(text, delay) => {
                tokio::time::sleep(delay).await;
                Ok(text.to_string())
            }
            Reply::Fail(msg) => Err(anyhow::anyhow!(msg)),
            Reply::Hang => {
                std::future::pending::<()>().await;
                Ok(String::new())
            }
        }
    }

    fn display_name(&self) -> &str {
        self.name
    }
}

pub struct TestGateway {
    pub gateway: Gateway,
    pub gemini: Arc<StubProvider>,
    pub openai: Arc<StubProvider>,
    pub docs: TempDir,
}

impl TestGateway {
    pub fn grpc_url(&self) -> String {
        format!("http://{}", self.gateway.grpc_addr())
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{path}", self.gateway.http_addr())
    }
}

pub fn server_config(docs: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".into(),
        port: 0,
        http_port: 0,
        shutdown_grace_secs: 5,
        docs_dir: docs.path().to_string_lossy().into_owned(),
    }
}

/// Start a gateway on ephemeral ports with "gemini-2.0-flash" as the
/// default model.
pub async fn start(gemini: Reply, openai: Reply) -> TestGateway {
    let docs = tempfile::tempdir().unwrap();
    std::fs::write(
        docs.path().join("ai_service.swagger.json"),
        r#"{"swagger":"2.0","info":{"title":"ai_service.proto"}}"#,
    )
    .unwrap();

    let gemini = StubProvider::new("Gemini", gemini);
    let openai = StubProvider::new("OpenAI", openai);
    let dispatcher = Dispatcher::new(gemini.clone(), openai.clone());
    let service = Arc::new(GenerateService::new(dispatcher, "gemini-2.0-flash"));

    let gateway = Gateway::start(&server_config(&docs), service).await.unwrap();
    TestGateway {
        gateway,
        gemini,
        openai,
        docs,
    }
}
