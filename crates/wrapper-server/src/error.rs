use thiserror::Error;

/// Fatal errors raised before the gateway starts serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to listen on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
