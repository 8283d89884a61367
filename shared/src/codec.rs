//! Frame codecs for relay messages.
//!
//! Binary frames carry bincode, text frames carry JSON. Browsers speak JSON;
//! the native client and the test bot speak bincode.

use crate::{sanitize_name, ClientMessage, ServerMessage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while encoding, decoding or validating a frame.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("binary codec error: {0}")]
    Binary(#[from] bincode::Error),

    #[error("json codec error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("transform contains non-finite or out-of-range values")]
    InvalidTransform,

    #[error("gait phase is not finite")]
    InvalidGait,

    #[error("display name is empty")]
    EmptyName,
}

/// How a connection encodes its frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    Binary,
    #[default]
    Text,
}

/// A transport-neutral WebSocket payload.
#[derive(Debug, Clone, PartialEq)]
pub enum WireFrame {
    Binary(Vec<u8>),
    Text(String),
}

impl WireFrame {
    pub fn encoding(&self) -> Encoding {
        match self {
            WireFrame::Binary(_) => Encoding::Binary,
            WireFrame::Text(_) => Encoding::Text,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            WireFrame::Binary(bytes) => bytes.len(),
            WireFrame::Text(text) => text.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn encode<T: Serialize>(message: &T, encoding: Encoding) -> Result<WireFrame, CodecError> {
    Ok(match encoding {
        Encoding::Binary => WireFrame::Binary(bincode::serialize(message)?),
        Encoding::Text => WireFrame::Text(serde_json::to_string(message)?),
    })
}

pub fn decode<T: DeserializeOwned>(frame: &WireFrame) -> Result<T, CodecError> {
    Ok(match frame {
        WireFrame::Binary(bytes) => bincode::deserialize(bytes)?,
        WireFrame::Text(text) => serde_json::from_str(text)?,
    })
}

pub fn encode_server(message: &ServerMessage, encoding: Encoding) -> Result<WireFrame, CodecError> {
    encode(message, encoding)
}

pub fn decode_server(frame: &WireFrame) -> Result<ServerMessage, CodecError> {
    decode(frame)
}

pub fn encode_client(message: &ClientMessage, encoding: Encoding) -> Result<WireFrame, CodecError> {
    encode(message, encoding)
}

/// Decodes a client frame and rejects values that must not reach the roster.
/// Names come back sanitized.
pub fn decode_client(frame: &WireFrame) -> Result<ClientMessage, CodecError> {
    validate_client(decode(frame)?)
}

pub fn validate_client(message: ClientMessage) -> Result<ClientMessage, CodecError> {
    match message {
        ClientMessage::SetName { name } => {
            let name = sanitize_name(&name).ok_or(CodecError::EmptyName)?;
            Ok(ClientMessage::SetName { name })
        }
        ClientMessage::UpdateTransform { transform, gait } => {
            if !transform.is_sane() {
                return Err(CodecError::InvalidTransform);
            }
            if gait.map_or(false, |g| !g.is_finite()) {
                return Err(CodecError::InvalidGait);
            }
            Ok(ClientMessage::UpdateTransform { transform, gait })
        }
    }
}
