//! Schema-stable JSON documents printed by `--json`.

use pocsag_core::{BaudRate, DecodedMessage, FunctionCode, Message};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Numeric,
    Alphanumeric,
}

impl MessageKind {
    pub fn from_numeric(is_numeric: bool) -> Self {
        if is_numeric {
            MessageKind::Numeric
        } else {
            MessageKind::Alphanumeric
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MessageKind::Numeric => "NUMERIC",
            MessageKind::Alphanumeric => "ALPHA",
        }
    }
}

/// One entry of a burst file: `{"address": 123456, "message": "HI", "function": 3}`
#[derive(Debug, Clone, Deserialize)]
pub struct BurstEntry {
    pub address: u32,
    pub message: String,
    #[serde(default = "default_function")]
    pub function: u8,
}

fn default_function() -> u8 {
    FunctionCode::Alphanumeric.as_u8()
}

#[derive(Debug, Serialize)]
pub struct MessageReport {
    pub address: u32,
    pub function: u8,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl From<&Message> for MessageReport {
    fn from(message: &Message) -> Self {
        Self {
            address: message.address,
            function: message.function.as_u8(),
            message: message.text.clone(),
            kind: MessageKind::from_numeric(message.encoding().is_numeric()),
        }
    }
}

impl From<&DecodedMessage> for MessageReport {
    fn from(message: &DecodedMessage) -> Self {
        Self {
            address: message.address,
            function: message.function.as_u8(),
            message: message.text.clone(),
            kind: MessageKind::from_numeric(message.is_numeric),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EncodeReport {
    pub success: bool,
    pub output: String,
    pub baud: u32,
    pub size: usize,
    pub messages: Vec<MessageReport>,
}

#[derive(Debug, Serialize)]
pub struct DecodeReport {
    pub success: bool,
    pub baud: u32,
    pub messages: Vec<MessageReport>,
}

impl EncodeReport {
    pub fn new(output: String, baud_rate: BaudRate, size: usize, messages: &[Message]) -> Self {
        Self {
            success: true,
            output,
            baud: baud_rate.as_u32(),
            size,
            messages: messages.iter().map(MessageReport::from).collect(),
        }
    }
}

impl DecodeReport {
    pub fn new(baud_rate: BaudRate, messages: &[DecodedMessage]) -> Self {
        Self {
            success: true,
            baud: baud_rate.as_u32(),
            messages: messages.iter().map(MessageReport::from).collect(),
        }
    }
}
