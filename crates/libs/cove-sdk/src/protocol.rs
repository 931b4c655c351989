//! Wire protocol between the SDK and the Cove shell.
//!
//! Frames are msgpack maps (field names on the wire) prefixed with a
//! big-endian u32 byte length. Requests carry a correlation id that the
//! host echoes back in its response; events carry no id and can arrive
//! at any time.

use std::io;

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::CoveError;

/// Hard cap on a single frame. Generous compared to the embedded payload
/// limit so a descriptor near the cap still fits with framing overhead.
pub const MAX_FRAME_BYTES: usize = 16 * 1024 * 1024;

/// Fault codes the host is known to emit.
pub mod fault_code {
    pub const NOT_AUTHORIZED: &str = "not_authorized";
    pub const UNAVAILABLE: &str = "unavailable";
    pub const LIMIT_EXCEEDED: &str = "limit_exceeded";
    pub const INVALID_PAYLOAD: &str = "invalid_payload";
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "frame", rename_all = "snake_case")]
pub enum Frame {
    Request { id: u64, call: HostCall },
    Response { id: u64, reply: CallReply },
    Event { event: HostEvent },
}

/// One request the SDK can make of the host. Descriptor-carrying calls
/// embed the descriptor pre-encoded so the envelope stays stable even as
/// the descriptor schema grows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum HostCall {
    CheckAuthorization {
        application_id: String,
    },
    RequestAuthorization {
        application_id: String,
    },
    GetVersion,
    PresentLiveActivity {
        #[serde(with = "serde_bytes")]
        payload: Vec<u8>,
    },
    UpdateLiveActivity {
        #[serde(with = "serde_bytes")]
        payload: Vec<u8>,
    },
    DismissLiveActivity {
        id: String,
        application_id: String,
    },
    PresentLockScreenWidget {
        #[serde(with = "serde_bytes")]
        payload: Vec<u8>,
    },
    UpdateLockScreenWidget {
        #[serde(with = "serde_bytes")]
        payload: Vec<u8>,
    },
    DismissLockScreenWidget {
        id: String,
        application_id: String,
    },
    PresentNotchExperience {
        #[serde(with = "serde_bytes")]
        payload: Vec<u8>,
    },
    UpdateNotchExperience {
        #[serde(with = "serde_bytes")]
        payload: Vec<u8>,
    },
    DismissNotchExperience {
        id: String,
        application_id: String,
    },
}

impl HostCall {
    /// Stable name used in log lines.
    pub fn method_name(&self) -> &'static str {
        match self {
            Self::CheckAuthorization { .. } => "check_authorization",
            Self::RequestAuthorization { .. } => "request_authorization",
            Self::GetVersion => "get_version",
            Self::PresentLiveActivity { .. } => "present_live_activity",
            Self::UpdateLiveActivity { .. } => "update_live_activity",
            Self::DismissLiveActivity { .. } => "dismiss_live_activity",
            Self::PresentLockScreenWidget { .. } => "present_lock_screen_widget",
            Self::UpdateLockScreenWidget { .. } => "update_lock_screen_widget",
            Self::DismissLockScreenWidget { .. } => "dismiss_lock_screen_widget",
            Self::PresentNotchExperience { .. } => "present_notch_experience",
            Self::UpdateNotchExperience { .. } => "update_notch_experience",
            Self::DismissNotchExperience { .. } => "dismiss_notch_experience",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CallReply {
    Ack,
    Authorized { granted: bool },
    Version { version: String },
    Fault { fault: HostFault },
}

/// A structured failure reported by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostFault {
    pub code: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub limit: Option<u32>,
}

impl From<HostFault> for CoveError {
    fn from(fault: HostFault) -> Self {
        match fault.code.as_str() {
            fault_code::NOT_AUTHORIZED => CoveError::NotAuthorized,
            fault_code::UNAVAILABLE => CoveError::ServiceUnavailable,
            fault_code::LIMIT_EXCEEDED => CoveError::LimitExceeded {
                limit: fault.limit.unwrap_or(0),
            },
            fault_code::INVALID_PAYLOAD => CoveError::InvalidDescriptor {
                reason: fault.message,
            },
            _ => CoveError::Unknown {
                message: if fault.message.is_empty() {
                    fault.code
                } else {
                    fault.message
                },
            },
        }
    }
}

/// Unsolicited notifications pushed by the host.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostEvent {
    AuthorizationChanged { granted: bool },
    ActivityDismissed { id: String },
    WidgetDismissed { id: String },
    NotchExperienceDismissed { id: String },
}

pub async fn write_frame<W>(writer: &mut W, frame: &Frame) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let body = rmp_serde::to_vec_named(frame)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    if body.len() > MAX_FRAME_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "frame exceeds maximum size",
        ));
    }
    writer.write_all(&(body.len() as u32).to_be_bytes()).await?;
    writer.write_all(&body).await?;
    writer.flush().await
}

pub async fn read_frame<R>(reader: &mut R) -> io::Result<Frame>
where
    R: AsyncRead + Unpin,
{
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf).await?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "frame exceeds maximum size",
        ));
    }
    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    rmp_serde::from_slice(&body).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
