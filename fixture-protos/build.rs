use std::env::var;
use std::io::Result;

// Messages that tests handle as generated types through `ReflectMessage`.
const REFLECTED_MESSAGES: &[&str] = &[
    "fixtures.User",
    "fixtures.UserPatch",
    "fixtures.UserSummary",
    "fixtures.CreateUserResponse",
];

fn main() -> Result<()> {
    let proto_files = &[
        "proto/fixtures.proto",
        "../pobla-core/proto/pobla/options.proto",
        "../pobla-core/proto/pobla/status.proto",
    ];

    // Folders containing the proto definitions
    let proto_folders = &["proto", "../pobla-core/proto"];
    let out_dir = var("OUT_DIR").expect("Missing OUT_DIR environment variable");
    let descriptors_path = format!("{}/descriptors.bin", out_dir);

    let mut builder = tonic_prost_build::configure()
        .file_descriptor_set_path(descriptors_path)
        .protoc_arg("--experimental_allow_proto3_optional")
        .build_client(false)
        .build_server(false);

    for message in REFLECTED_MESSAGES {
        builder = builder.message_attribute(
            format!(".{message}"),
            format!(
                "#[derive(::prost_reflect::ReflectMessage)] \
                 #[prost_reflect(descriptor_pool = \"crate::DESCRIPTOR_POOL\", message_name = \"{message}\")]"
            ),
        );
    }

    builder.compile_protos(proto_files, proto_folders).unwrap();

    Ok(())
}
