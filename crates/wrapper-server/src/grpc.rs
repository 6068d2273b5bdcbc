//! gRPC front: `wrapper.v1.AiService` over tonic.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tokio_util::sync::CancellationToken;
use tonic::metadata::MetadataMap;
use tonic::{Request, Response, Status};
use tracing::info;

use wrapper_core::context::parse_grpc_timeout;
use wrapper_core::{ErrorCode, GatewayError, GenerateRequest, RequestContext};

use crate::proto::ai_service_server::{AiService, AiServiceServer};
use crate::proto::{GenerateTextRequest, GenerateTextResponse};
use crate::service::GenerateService;

/// `AiService` implementation backed by the shared [`GenerateService`].
#[derive(Debug, Clone)]
pub struct GrpcFront {
    service: Arc<GenerateService>,
    force: CancellationToken,
}

impl GrpcFront {
    /// `force` is cancelled when the shutdown grace period runs out; every
    /// request context derives from it.
    pub fn new(service: Arc<GenerateService>, force: CancellationToken) -> Self {
        Self { service, force }
    }

    fn request_context(&self, metadata: &MetadataMap) -> RequestContext {
        let ctx = RequestContext::new(self.force.child_token());
        match metadata
            .get("grpc-timeout")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_grpc_timeout)
        {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

#[tonic::async_trait]
impl AiService for GrpcFront {
    async fn generate_text(
        &self,
        request: Request<GenerateTextRequest>,
    ) -> Result<Response<GenerateTextResponse>, Status> {
        let ctx = self.request_context(request.metadata());
        let GenerateTextRequest { prompt, model } = request.into_inner();

        let out = self
            .service
            .generate_text(&ctx, GenerateRequest { prompt, model: Some(model) })
            .await
            .map_err(|e| to_status(&e))?;

        Ok(Response::new(GenerateTextResponse {
            prompt: out.prompt,
            response: out.response,
        }))
    }
}

/// Map a gateway error to the gRPC status a client sees.
pub fn to_status(err: &GatewayError) -> Status {
    let message = err.to_string();
    match err.code() {
        ErrorCode::InvalidArgument => Status::invalid_argument(message),
        ErrorCode::Canceled => Status::cancelled(message),
        ErrorCode::DeadlineExceeded => Status::deadline_exceeded(message),
        ErrorCode::Internal => Status::internal(message),
    }
}

/// Serve `front` on `listener` until `shutdown` is cancelled, then drain.
pub async fn serve(
    listener: TcpListener,
    front: GrpcFront,
    shutdown: CancellationToken,
) -> Result<(), tonic::transport::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!("gRPC server listening on {addr}");
    }

    tonic::transport::Server::builder()
        .add_service(AiServiceServer::new(front))
        .serve_with_incoming_shutdown(
            TcpListenerStream::new(listener),
            shutdown.cancelled_owned(),
        )
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tonic::Code;
    use wrapper_providers::Dispatcher;

    fn front() -> GrpcFront {
        let config = wrapper_core::config::ProviderConfig {
            api_key: "key".into(),
            model: "gemini-2.0-flash".into(),
            gemini_api_base: Some("http://127.0.0.1:1".into()),
            openai_api_base: Some("http://127.0.0.1:1".into()),
        };
        let dispatcher = Dispatcher::from_config(&config).unwrap();
        GrpcFront::new(
            Arc::new(GenerateService::new(dispatcher, "gemini-2.0-flash")),
            CancellationToken::new(),
        )
    }

    #[test]
    fn test_to_status_codes() {
        assert_eq!(
            to_status(&GatewayError::invalid_argument("bad")).code(),
            Code::InvalidArgument
        );
        assert_eq!(to_status(&GatewayError::Canceled).code(), Code::Cancelled);
        assert_eq!(
            to_status(&GatewayError::DeadlineExceeded).code(),
            Code::DeadlineExceeded
        );
        let status = to_status(&GatewayError::EmptyResponse { provider: "Gemini" });
        assert_eq!(status.code(), Code::Internal);
        assert_eq!(status.message(), "Gemini returned an empty response");
    }

    #[test]
    fn test_request_context_reads_grpc_timeout() {
        let front = front();
        let mut metadata = MetadataMap::new();
        metadata.insert("grpc-timeout", "250m".parse().unwrap());
        let ctx = front.request_context(&metadata);
        let remaining = ctx.deadline().unwrap() - tokio::time::Instant::now();
        assert!(remaining <= Duration::from_millis(250));

        assert!(front.request_context(&MetadataMap::new()).deadline().is_none());
    }

    #[test]
    fn test_force_cancels_request_context() {
        let front = front();
        let ctx = front.request_context(&MetadataMap::new());
        assert!(ctx.err().is_none());
        front.force.cancel();
        assert_eq!(ctx.err(), Some(GatewayError::Canceled));
    }

    #[tokio::test]
    async fn test_empty_prompt_is_invalid_argument() {
        let status = front()
            .generate_text(Request::new(GenerateTextRequest {
                prompt: String::new(),
                model: String::new(),
            }))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert_eq!(status.message(), "prompt cannot be empty");
    }
}
