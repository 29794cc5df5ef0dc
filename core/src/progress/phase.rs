//! progress/phase.rs
//! Ordered pipeline phases and the event payload handed to progress sinks.

use std::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "stringify")]
    Stringify,
    #[serde(rename = "encrypt")]
    Encrypt,
    #[serde(rename = "pack")]
    Pack,
    #[serde(rename = "encodePNG")]
    EncodePng,
    #[serde(rename = "writeFile")]
    WriteFile,
    #[serde(rename = "readFile")]
    ReadFile,
    #[serde(rename = "decodePNG")]
    DecodePng,
    #[serde(rename = "unpack")]
    Unpack,
    #[serde(rename = "decrypt")]
    Decrypt,
    #[serde(rename = "parseJSON")]
    ParseJson,
    #[serde(rename = "done")]
    Done,
}

impl Phase {
    /// Export phases in execution order (write is optional).
    pub const EXPORT: [Phase; 5] = [
        Phase::Stringify,
        Phase::Encrypt,
        Phase::Pack,
        Phase::EncodePng,
        Phase::WriteFile,
    ];

    /// Import phases in execution order (read is optional).
    pub const IMPORT: [Phase; 5] = [
        Phase::ReadFile,
        Phase::DecodePng,
        Phase::Unpack,
        Phase::Decrypt,
        Phase::ParseJson,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Stringify => "stringify",
            Phase::Encrypt   => "encrypt",
            Phase::Pack      => "pack",
            Phase::EncodePng => "encodePNG",
            Phase::WriteFile => "writeFile",
            Phase::ReadFile  => "readFile",
            Phase::DecodePng => "decodePNG",
            Phase::Unpack    => "unpack",
            Phase::Decrypt   => "decrypt",
            Phase::ParseJson => "parseJSON",
            Phase::Done      => "done",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One progress update as seen by the sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub phase: Phase,
    pub processed_bytes: u64,
    pub total_bytes: u64,
    /// 0.0..=100.0
    pub percent: f64,
}

impl ProgressEvent {
    pub fn new(phase: Phase, processed_bytes: u64, total_bytes: u64) -> Self {
        let processed_bytes = processed_bytes.min(total_bytes);
        let percent = if total_bytes == 0 {
            100.0
        } else {
            processed_bytes as f64 * 100.0 / total_bytes as f64
        };
        Self { phase, processed_bytes, total_bytes, percent }
    }

    pub fn is_complete(&self) -> bool {
        self.processed_bytes >= self.total_bytes
    }
}
