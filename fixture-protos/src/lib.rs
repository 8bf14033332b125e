//! # Fixture Protos
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide compiled descriptors and
//! generated message types for testing `pobla-core` against real `protoc` output,
//! custom options included.
//! It is not intended for production use.
use prost_reflect::DescriptorPool;
use std::sync::LazyLock;

pub mod pb {
    pub mod fixtures {
        include!(concat!(env!("OUT_DIR"), "/fixtures.rs"));
    }

    pub mod pobla {
        include!(concat!(env!("OUT_DIR"), "/pobla.rs"));
    }
}

pub const FILE_DESCRIPTOR_SET: &[u8] = tonic::include_file_descriptor_set!("descriptors");

pub static DESCRIPTOR_POOL: LazyLock<DescriptorPool> = LazyLock::new(|| {
    DescriptorPool::decode(FILE_DESCRIPTOR_SET).expect("Fixture descriptor set is invalid")
});
