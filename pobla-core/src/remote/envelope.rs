//! Extraction of the derived error fields from a response envelope.
use super::ResponsePayload;
use crate::codec::{CodecError, FlatMap};
use crate::config::EnvelopeKeys;
use tracing::debug;

/// Error fields read out of the payload, computed once per error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct DerivedFields {
    pub error_code: Option<String>,
    pub error_message: Option<String>,
    pub server_stack_trace: Option<String>,
}

impl DerivedFields {
    pub(crate) fn extract(
        payload: Option<&dyn ResponsePayload>,
        status_description: Option<&str>,
        keys: &EnvelopeKeys,
    ) -> Self {
        let Some(payload) = payload else {
            // Without a payload the status description stands in for the code.
            return Self {
                error_code: status_description.map(str::to_string),
                ..Self::default()
            };
        };

        match Self::from_payload(payload, keys) {
            Ok(fields) => fields,
            Err(error) => {
                debug!(%error, "Response payload is not a readable envelope");
                Self::default()
            }
        }
    }

    fn from_payload(
        payload: &dyn ResponsePayload,
        keys: &EnvelopeKeys,
    ) -> Result<Self, CodecError> {
        let envelope = FlatMap::parse(&payload.to_text()?)?;

        // A payload without a status leaves every field absent, the code included.
        let Some(status) = envelope.get(&keys.response_status) else {
            return Ok(Self::default());
        };

        let status = FlatMap::parse(status)?;

        Ok(Self {
            error_code: status.get(&keys.error_code).map(str::to_string),
            error_message: status.get(&keys.message).map(str::to_string),
            server_stack_trace: status.get(&keys.stack_trace).map(str::to_string),
        })
    }
}
