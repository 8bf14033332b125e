//! # Remote Call Error
//!
//! [`RemoteCallError`] represents a remote invocation that already failed. Besides the raw
//! status and body, it carries the deserialized response payload, from which the structured
//! error details are read **lazily**:
//!
//! * [`RemoteCallError::error_code`], [`RemoteCallError::error_message`] and
//!   [`RemoteCallError::server_stack_trace`] are extracted together, once, the first time any
//!   of them is requested, by reading the payload's `ResponseStatus` envelope.
//! * [`RemoteCallError::response_status`] and [`RemoteCallError::field_errors`] give typed
//!   access to the same envelope, including field-level validation errors.
//!
//! Reading these accessors never fails: an unreadable payload simply has no details.
//!
//! ## Example
//!
//! ```rust
//! use pobla_core::RemoteCallError;
//! use serde_json::json;
//!
//! let error = RemoteCallError::with_message("CreateUser failed")
//!     .with_status(400, "Bad Request")
//!     .with_response_dto(json!({
//!         "ResponseStatus": {
//!             "ErrorCode": "VAL01",
//!             "Message": "Bad input",
//!             "Errors": [{ "FieldName": "Email" }]
//!         }
//!     }));
//!
//! assert_eq!(error.error_code(), Some("VAL01"));
//! assert_eq!(error.field_errors()[0].field_name, "Email");
//! ```
mod envelope;
mod status;

pub use status::*;

use crate::BoxError;
use crate::config::EnvelopeKeys;
use envelope::DerivedFields;
use prost_reflect::{DynamicMessage, MessageDescriptor};
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::debug;

/// A failed remote call.
///
/// Built with [`RemoteCallError::new`], [`RemoteCallError::with_message`] or
/// [`RemoteCallError::with_source`], then completed with the `with_*` builders.
#[derive(Debug, thiserror::Error)]
#[error("{}", display_text(.message, .status_code))]
pub struct RemoteCallError {
    message: Option<String>,
    #[source]
    source: Option<BoxError>,
    status_code: i32,
    status_description: Option<String>,
    response_body: Option<String>,
    response_dto: Option<Box<dyn ResponsePayload>>,
    keys: EnvelopeKeys,
    derived: OnceLock<DerivedFields>,
}

impl Default for RemoteCallError {
    fn default() -> Self {
        Self {
            message: None,
            source: None,
            status_code: 0,
            status_description: None,
            response_body: None,
            response_dto: None,
            keys: EnvelopeKeys::default(),
            derived: OnceLock::new(),
        }
    }
}

impl RemoteCallError {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Creates an error with a message and the error that caused it.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: Some(message.into()),
            source: Some(Box::new(source)),
            ..Self::default()
        }
    }

    /// Builds an error from a failed gRPC call.
    ///
    /// The status message becomes both the error message and the response body. When a
    /// descriptor is given, the status details are decoded with it and used as the payload;
    /// details that do not decode are ignored.
    pub fn from_status(status: &tonic::Status, details: Option<&MessageDescriptor>) -> Self {
        let code = status.code();

        let error = Self::with_message(status.message())
            .with_status(code as i32, code.description())
            .with_response_body(status.message());

        let Some(descriptor) = details else {
            return error;
        };

        if status.details().is_empty() {
            return error;
        }

        match DynamicMessage::decode(descriptor.clone(), status.details()) {
            Ok(message) => error.with_response_dto(message),
            Err(decode_error) => {
                debug!(
                    error = %decode_error,
                    descriptor = descriptor.full_name(),
                    "Status details do not decode as the expected message"
                );
                error
            }
        }
    }

    /// Builds an error from a failed HTTP exchange.
    ///
    /// A body holding a JSON object also becomes the response payload. Status codes without a
    /// canonical reason phrase have no description.
    pub fn from_http(status: http::StatusCode, body: Option<String>) -> Self {
        let mut error = Self {
            status_code: i32::from(status.as_u16()),
            status_description: status.canonical_reason().map(str::to_string),
            ..Self::with_message(status.to_string())
        };

        if let Some(body) = body {
            let parsed = serde_json::from_str::<serde_json::Value>(&body);
            if let Ok(payload @ serde_json::Value::Object(_)) = parsed {
                error = error.with_response_dto(payload);
            }
            error = error.with_response_body(body);
        }

        error
    }

    pub fn with_status(mut self, code: i32, description: impl Into<String>) -> Self {
        self.status_code = code;
        self.status_description = Some(description.into());
        self.derived = OnceLock::new();
        self
    }

    pub fn with_response_body(mut self, body: impl Into<String>) -> Self {
        self.response_body = Some(body.into());
        self
    }

    pub fn with_response_dto(mut self, payload: impl ResponsePayload + 'static) -> Self {
        self.response_dto = Some(Box::new(payload));
        self.derived = OnceLock::new();
        self
    }

    /// Reads the envelope with different key names.
    pub fn with_envelope_keys(mut self, keys: EnvelopeKeys) -> Self {
        self.keys = keys;
        self.derived = OnceLock::new();
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn status_description(&self) -> Option<&str> {
        self.status_description.as_deref()
    }

    pub fn response_body(&self) -> Option<&str> {
        self.response_body.as_deref()
    }

    pub fn response_dto(&self) -> Option<&dyn ResponsePayload> {
        self.response_dto.as_deref()
    }

    /// Whether the status code is in the HTTP client error range (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Whether the status code is in the HTTP server error range (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// The error code reported by the service.
    ///
    /// Without a payload this is the status description. With a payload lacking a
    /// `ResponseStatus`, it is `None`.
    pub fn error_code(&self) -> Option<&str> {
        self.derived().error_code.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.derived().error_message.as_deref()
    }

    pub fn server_stack_trace(&self) -> Option<&str> {
        self.derived().server_stack_trace.as_deref()
    }

    /// Typed `ResponseStatus` of the payload.
    ///
    /// Payloads with the [`HasResponseStatus`] capability answer directly. Otherwise the
    /// payload member named after the configured status key is converted, and anything that
    /// does not convert yields `None`.
    pub fn response_status(&self) -> Option<ResponseStatus> {
        let payload = self.response_dto.as_deref()?;

        if let Some(has_status) = payload.as_has_response_status() {
            return has_status.response_status().cloned();
        }

        let member = payload.member(&self.keys.response_status)?;

        serde_json::from_value(member)
            .inspect_err(|error| debug!(%error, "Payload member is not a ResponseStatus"))
            .ok()
    }

    /// Field-level validation errors. Empty when there are none.
    pub fn field_errors(&self) -> Vec<ResponseError> {
        self.response_status()
            .and_then(|status| status.errors)
            .unwrap_or_default()
    }

    fn derived(&self) -> &DerivedFields {
        self.derived.get_or_init(|| {
            DerivedFields::extract(
                self.response_dto.as_deref(),
                self.status_description.as_deref(),
                &self.keys,
            )
        })
    }
}

impl From<tonic::Status> for RemoteCallError {
    fn from(status: tonic::Status) -> Self {
        Self::from_status(&status, None)
    }
}

fn display_text<'a>(message: &'a Option<String>, status_code: &i32) -> Cow<'a, str> {
    match message {
        Some(message) => Cow::Borrowed(message),
        None => Cow::Owned(format!("Remote call failed with status {status_code}")),
    }
}
