//! Zabbix Sender Protocol
//!
//! Framing for the trapper protocol spoken by `zabbix_sender`.
//!
//! ```text
//! +------+-------+-----------------+------------------+
//! | ZBXD | flags | length (u64 LE) | JSON body        |
//! | 4 B  | 0x01  | 8 B             | `length` bytes   |
//! +------+-------+-----------------+------------------+
//! ```
//!
//! Request body: `{"request": "sender data", "data": [{"host", "key", "value"}, ...]}`
//!
//! Response body: `{"response": "success", "info": "processed: 10; failed: 0; total: 10; seconds spent: 0.000123"}`

use super::packet::ZabbixMetric;
use crate::error::{BridgeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const HEADER_MAGIC: &[u8; 4] = b"ZBXD";
pub const FLAG_STANDARD: u8 = 0x01;
pub const HEADER_LEN: usize = 13;

/// Largest response body accepted from the trapper
pub const MAX_RESPONSE_LEN: u64 = 16 * 1024 * 1024;

#[derive(Debug, Serialize)]
struct SenderRequest<'a> {
    request: &'static str,
    data: &'a [ZabbixMetric],
}

#[derive(Debug, Deserialize)]
struct SenderReply {
    response: String,
    #[serde(default)]
    info: Option<String>,
}

/// Frame a batch of records as one sender request
pub fn encode_request(metrics: &[ZabbixMetric]) -> Result<Vec<u8>> {
    let body = serde_json::to_vec(&SenderRequest {
        request: "sender data",
        data: metrics,
    })?;

    let mut frame = Vec::with_capacity(HEADER_LEN + body.len());
    frame.extend_from_slice(HEADER_MAGIC);
    frame.push(FLAG_STANDARD);
    frame.extend_from_slice(&(body.len() as u64).to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Validate a response header and return the body length it announces
pub fn decode_header(header: &[u8; HEADER_LEN]) -> Result<u64> {
    if &header[..4] != HEADER_MAGIC || header[4] != FLAG_STANDARD {
        return Err(BridgeError::Zabbix(format!(
            "invalid response header {:02x?}",
            &header[..5]
        )));
    }

    let mut length = [0u8; 8];
    length.copy_from_slice(&header[5..]);
    let length = u64::from_le_bytes(length);
    if length > MAX_RESPONSE_LEN {
        return Err(BridgeError::Zabbix(format!(
            "response of {} bytes exceeds the {} byte limit",
            length, MAX_RESPONSE_LEN
        )));
    }
    Ok(length)
}

/// Trapper acknowledgement, summed over every chunk of a batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZabbixResponse {
    pub processed: u64,
    pub failed: u64,
    pub total: u64,
    pub seconds_spent: f64,
    pub chunks: u64,
}

impl ZabbixResponse {
    /// Parse one response body
    pub fn parse(body: &[u8]) -> Result<Self> {
        let reply: SenderReply = serde_json::from_slice(body)?;
        if reply.response != "success" {
            return Err(BridgeError::Zabbix(format!(
                "trapper answered '{}': {}",
                reply.response,
                reply.info.unwrap_or_default()
            )));
        }

        let mut parsed = Self {
            chunks: 1,
            ..Self::default()
        };

        // "processed: 10; failed: 0; total: 10; seconds spent: 0.000123"
        for part in reply.info.as_deref().unwrap_or_default().split(';') {
            let Some((name, value)) = part.split_once(':') else {
                continue;
            };
            let value = value.trim();
            match name.trim().to_ascii_lowercase().as_str() {
                "processed" => parsed.processed = value.parse().unwrap_or_default(),
                "failed" => parsed.failed = value.parse().unwrap_or_default(),
                "total" => parsed.total = value.parse().unwrap_or_default(),
                "seconds spent" => parsed.seconds_spent = value.parse().unwrap_or_default(),
                _ => {}
            }
        }

        Ok(parsed)
    }

    pub fn merge(&mut self, other: &ZabbixResponse) {
        self.processed += other.processed;
        self.failed += other.failed;
        self.total += other.total;
        self.seconds_spent += other.seconds_spent;
        self.chunks += other.chunks;
    }
}

impl fmt::Display for ZabbixResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "processed: {}; failed: {}; total: {}; seconds spent: {:.6}; chunks: {}",
            self.processed, self.failed, self.total, self.seconds_spent, self.chunks
        )
    }
}
