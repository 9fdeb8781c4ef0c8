//! Compiles `tcm.proto` into the shared wire types.
//!
//! Messages derive `serde` and `utoipa::ToSchema` so the REST surface can reuse them, and
//! `#[serde(default)]` lets JSON clients omit any field. The descriptor set feeds gRPC reflection.

use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let root = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let proto = root.join("tcm.proto");
    let descriptor = PathBuf::from(std::env::var("OUT_DIR")?).join("proto_descriptor.bin");

    println!("cargo:rerun-if-changed={}", proto.display());
    tonic_build::configure()
        .build_server(true)
        .build_client(false)
        .type_attribute(
            ".tcm.v1",
            "#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]",
        )
        .type_attribute(".tcm.v1", "#[serde(default)]")
        .file_descriptor_set_path(descriptor)
        .compile_protos(&[proto], &[root])?;

    Ok(())
}
