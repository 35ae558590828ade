//! Message-pattern transport
//!
//! Requests arrive as `(pattern, payload)` pairs. This module names the
//! patterns the service answers and routes each to the authentication
//! pipeline; the wire carrying them lives in `auth::handlers`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthService;
use crate::error::AppError;
use crate::response::ResponseEnvelope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePattern {
    Store,
    Login,
}

impl MessagePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessagePattern::Store => "auth/store",
            MessagePattern::Login => "auth/login",
        }
    }
}

impl fmt::Display for MessagePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessagePattern {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auth/store" => Ok(MessagePattern::Store),
            "auth/login" => Ok(MessagePattern::Login),
            other => Err(AppError::UnknownPattern(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub pattern: String,
    #[serde(default)]
    pub data: Value,
}

pub async fn dispatch(
    auth: &AuthService,
    pattern: MessagePattern,
    payload: &Value,
) -> ResponseEnvelope {
    debug!("Dispatching {}", pattern);
    match pattern {
        MessagePattern::Store => auth.register(payload).await,
        MessagePattern::Login => auth.login(payload).await,
    }
}

/// Routes a raw message; unknown patterns are a transport error.
pub async fn dispatch_message(
    auth: &AuthService,
    message: &Message,
) -> Result<ResponseEnvelope, AppError> {
    let pattern = message.pattern.parse::<MessagePattern>()?;
    Ok(dispatch(auth, pattern, &message.data).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_round_trip() {
        for pattern in [MessagePattern::Store, MessagePattern::Login] {
            assert_eq!(pattern.as_str().parse::<MessagePattern>().unwrap(), pattern);
        }
    }

    #[test]
    fn test_unknown_pattern() {
        let result = "auth/logout".parse::<MessagePattern>();
        assert!(matches!(result, Err(AppError::UnknownPattern(p)) if p == "auth/logout"));
    }

    #[test]
    fn test_message_without_data() {
        let message: Message = serde_json::from_str(r#"{"pattern":"auth/login"}"#).unwrap();
        assert_eq!(message.pattern, "auth/login");
        assert!(message.data.is_null());
    }
}
