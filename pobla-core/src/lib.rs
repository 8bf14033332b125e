//! # Pobla Core
//!
//! `pobla-core` collects the plumbing a dynamic gRPC client needs around its messages:
//! moving data between Protobuf messages it only knows through reflection, and making
//! sense of the error payloads a failed remote call brings back.
//!
//! ## Key Components
//!
//! * **[`mapper`]:** Copies fields between two arbitrary messages by matching field names,
//!   optionally skipping default values or restricting the copy to fields carrying a custom
//!   option. See [`PopulateExt`] and [`translate_to`].
//! * **[`metadata`]:** Looks up custom options on messages and fields, following the base
//!   chain declared with `(pobla.base)`, and inspects generic template metadata.
//! * **[`artifact`]:** Inspects build artifacts (dynamically generated? debug build?).
//! * **[`RemoteCallError`]:** The error returned when a remote call fails. It lazily extracts
//!   the error code, message and server stack trace from the `ResponseStatus` envelope of the
//!   response payload.
//!
//! ## Proto files
//!
//! The `proto/` folder of this crate ships `pobla/options.proto` (type metadata options) and
//! `pobla/status.proto` (the `ResponseStatus` envelope). Import them from your own schemas.
//!
//! ## Re-exports
//!
//! This crate re-exports `prost`, `prost-reflect`, and `tonic` to ensure that consumers
//! use compatible versions of these underlying dependencies.
pub mod artifact;
pub mod codec;
pub mod config;
pub mod mapper;
pub mod metadata;
pub mod remote;

pub use artifact::Artifact;
pub use config::EnvelopeKeys;
pub use mapper::{MapError, Mapper, PopulateExt, translate_to, translate_to_dynamic};
pub use remote::{
    HasResponseStatus, RemoteCallError, ResponseError, ResponsePayload, ResponseStatus,
};

// Re-exports
pub use prost;
pub use prost_reflect;
pub use tonic;

/// Type alias for the standard boxed error used as an error cause.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
