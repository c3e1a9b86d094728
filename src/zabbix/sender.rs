//! Zabbix Trapper Client
//!
//! Pushes a batch of [`ZabbixMetric`] records to a Zabbix server or proxy.
//! Large batches are split into chunks of `chunk_size` records, each sent on
//! its own connection, and the acknowledgements are summed.

use super::packet::ZabbixMetric;
use super::protocol::{decode_header, encode_request, ZabbixResponse, HEADER_LEN};
use super::MetricSender;
use crate::config::ZabbixSettings;
use crate::error::{BridgeError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

pub struct ZabbixSender {
    server: String,
    port: u16,
    timeout: Duration,
    chunk_size: usize,
}

impl ZabbixSender {
    pub fn new(settings: &ZabbixSettings) -> Self {
        Self {
            server: settings.server.clone(),
            port: settings.port,
            timeout: settings.timeout,
            chunk_size: settings.chunk_size.max(1),
        }
    }

    pub fn target(&self) -> String {
        format!("{}:{}", self.server, self.port)
    }

    async fn send_chunk(&self, chunk: &[ZabbixMetric]) -> Result<ZabbixResponse> {
        let frame = encode_request(chunk)?;

        let mut stream = self
            .bounded("connect", TcpStream::connect((self.server.as_str(), self.port)))
            .await?;
        self.bounded("write", stream.write_all(&frame)).await?;

        let mut header = [0u8; HEADER_LEN];
        self.bounded("read", stream.read_exact(&mut header)).await?;
        let length = decode_header(&header)?;

        let mut body = vec![0u8; length as usize];
        self.bounded("read", stream.read_exact(&mut body)).await?;
        debug!("Zabbix response: {}", String::from_utf8_lossy(&body));

        ZabbixResponse::parse(&body)
    }

    /// Run one socket operation under the configured timeout
    async fn bounded<T, F>(&self, what: &str, op: F) -> Result<T>
    where
        F: Future<Output = std::io::Result<T>>,
    {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => result.map_err(BridgeError::Io),
            Err(_) => Err(BridgeError::Zabbix(format!(
                "{} to {} timed out after {:?}",
                what,
                self.target(),
                self.timeout
            ))),
        }
    }
}

impl MetricSender for ZabbixSender {
    async fn send(&self, packet: &[ZabbixMetric]) -> Result<ZabbixResponse> {
        debug!("Sending {} records to {}", packet.len(), self.target());

        let mut total = ZabbixResponse::default();
        for chunk in packet.chunks(self.chunk_size) {
            total.merge(&self.send_chunk(chunk).await?);
        }
        Ok(total)
    }
}
