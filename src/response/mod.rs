//! Response envelope
//!
//! Every public operation answers with a `ResponseEnvelope`. The
//! `ResponseNormalizer` is the only place that turns an internal decision
//! into a wire-level status.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AuthFailure;

/// Status codes an envelope may carry; anything else collapses to 500.
pub const RECOGNIZED_STATUS_CODES: [u16; 9] = [200, 201, 400, 401, 403, 404, 409, 422, 500];

pub const FALLBACK_STATUS: u16 = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvelopeMessage {
    Text(String),
    Payload(Value),
}

impl From<&str> for EnvelopeMessage {
    fn from(text: &str) -> Self {
        EnvelopeMessage::Text(text.to_string())
    }
}

impl From<String> for EnvelopeMessage {
    fn from(text: String) -> Self {
        EnvelopeMessage::Text(text)
    }
}

impl From<Value> for EnvelopeMessage {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => EnvelopeMessage::Text(text),
            other => EnvelopeMessage::Payload(other),
        }
    }
}

/// Body of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginPayload {
    pub token: String,
    pub email: String,
    pub name: String,
}

impl From<LoginPayload> for EnvelopeMessage {
    fn from(payload: LoginPayload) -> Self {
        EnvelopeMessage::Payload(json!({
            "token": payload.token,
            "email": payload.email,
            "name": payload.name,
        }))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub message: EnvelopeMessage,
}

impl ResponseEnvelope {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> Option<&str> {
        match &self.message {
            EnvelopeMessage::Text(text) => Some(text),
            EnvelopeMessage::Payload(_) => None,
        }
    }

    pub fn payload(&self) -> Option<&Value> {
        match &self.message {
            EnvelopeMessage::Payload(value) => Some(value),
            EnvelopeMessage::Text(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseNormalizer;

impl ResponseNormalizer {
    pub fn new() -> Self {
        Self
    }

    pub fn is_recognized(code: u16) -> bool {
        RECOGNIZED_STATUS_CODES.contains(&code)
    }

    pub fn normalize(&self, code: u16, message: impl Into<EnvelopeMessage>) -> ResponseEnvelope {
        let status = if Self::is_recognized(code) { code } else { FALLBACK_STATUS };
        ResponseEnvelope {
            status,
            message: message.into(),
        }
    }

    pub fn failure(&self, failure: &AuthFailure) -> ResponseEnvelope {
        self.normalize(failure.status_code(), failure.to_string())
    }
}
