//! Classification of failed API responses into user-facing messages.

use serde::Deserialize;

use crate::ajax::Response;

pub const BAD_LOGIN: &str = "Incorrect username or password";
pub const UNKNOWN: &str = "Unknown error";

/// Why a request did not succeed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    #[error("Incorrect username or password")]
    Unauthorized,
    #[error("{}", message_or_unknown(.0))]
    Forbidden(Option<String>),
    #[error("{}", message_or_unknown(.message))]
    Invalid { status: u16, message: Option<String> },
    #[error("Internal Server Error - {}", .0.as_deref().unwrap_or_default())]
    Internal(Option<String>),
    #[error("Unknown error")]
    Transport,
    #[error("Unknown error")]
    Unexpected(u16),
}

fn message_or_unknown(m: &Option<String>) -> &str {
    m.as_deref().unwrap_or(UNKNOWN)
}

impl Failure {
    pub fn from_response(resp: &Response) -> Failure {
        match resp.status {
            0 => Failure::Transport,
            401 => Failure::Unauthorized,
            403 => Failure::Forbidden(server_message(&resp.body)),
            400 | 409 => Failure::Invalid {
                status: resp.status,
                message: server_message(&resp.body),
            },
            500 => Failure::Internal(server_message(&resp.body)),
            other => Failure::Unexpected(other),
        }
    }

    /// Text shown to the user.
    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> u16 {
        match self {
            Failure::Unauthorized => 401,
            Failure::Forbidden(_) => 403,
            Failure::Invalid { status, .. } => *status,
            Failure::Internal(_) => 500,
            Failure::Transport => 0,
            Failure::Unexpected(s) => *s,
        }
    }
}

impl From<&Response> for Failure {
    fn from(resp: &Response) -> Self {
        Failure::from_response(resp)
    }
}

#[derive(Deserialize)]
struct MessageOnly {
    #[serde(rename = "Message", default)]
    message: String,
}

/// `Message` from a JSON envelope. Empty, malformed or message-less bodies
/// give `None`.
pub fn server_message(body: &str) -> Option<String> {
    if body.trim().is_empty() {
        return None;
    }
    serde_json::from_str::<MessageOnly>(body)
        .ok()
        .map(|m| m.message)
        .filter(|m| !m.is_empty())
}

/// Message for edit failures: the server's text as-is, except 500 which
/// gets the "Internal Server Error" prefix.
pub fn message_for(resp: &Response) -> String {
    match Failure::from_response(resp) {
        f @ Failure::Internal(_) => f.message(),
        _ => server_message(&resp.body).unwrap_or_else(|| UNKNOWN.to_string()),
    }
}
