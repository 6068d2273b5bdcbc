//! Generates the tonic client and server for `wrapper.v1.AiService`.
//!
//! The messages are hand-derived `prost::Message` structs in `src/proto.rs`,
//! so only the service glue is generated here and no `protoc` is needed.
//! `proto/wrapper/v1/ai_service.proto` documents the same contract for
//! clients in other languages.

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let generate_text = tonic_build::manual::Method::builder()
        .name("generate_text")
        .route_name("GenerateText")
        .input_type("crate::proto::GenerateTextRequest")
        .output_type("crate::proto::GenerateTextResponse")
        .codec_path("tonic::codec::ProstCodec")
        .build();

    let service = tonic_build::manual::Service::builder()
        .name("AiService")
        .package("wrapper.v1")
        .method(generate_text)
        .build();

    tonic_build::manual::Builder::new().compile(&[service]);
}
