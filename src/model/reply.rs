use serde::{
    Deserialize,
    Serialize,
};

use crate::error::DispatchError;

pub const STATUS_OK: u8 = 0;
pub const STATUS_ERROR: u8 = 1;

/// Reply sent back to the client as a JSON text frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub status: u8,
    pub message: String,
}

impl StatusReply {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_OK,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }

    pub fn to_json(&self) -> String {
        // Two plain fields, serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

impl From<&DispatchError> for StatusReply {
    fn from(err: &DispatchError) -> Self {
        StatusReply::error(err.to_string())
    }
}
