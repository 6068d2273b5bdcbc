//! Protobuf messages and the generated tonic glue for `wrapper.v1.AiService`.

/// Request for `wrapper.v1.AiService/GenerateText`.
#[derive(Clone, PartialEq, prost::Message)]
pub struct GenerateTextRequest {
    #[prost(string, tag = "1")]
    pub prompt: String,
    /// Empty selects the server's configured model.
    #[prost(string, tag = "2")]
    pub model: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GenerateTextResponse {
    #[prost(string, tag = "1")]
    pub prompt: String,
    #[prost(string, tag = "2")]
    pub response: String,
}

include!(concat!(env!("OUT_DIR"), "/wrapper.v1.AiService.rs"));
