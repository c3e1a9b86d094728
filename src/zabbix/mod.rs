pub mod packet;
pub mod protocol;
pub mod sender;

pub use packet::{make_packet, ZabbixMetric};
pub use protocol::ZabbixResponse;
pub use sender::ZabbixSender;

use crate::error::Result;
use std::future::Future;

/// Transmits a whole packet to the monitoring collector in one call
pub trait MetricSender {
    fn send(&self, packet: &[ZabbixMetric]) -> impl Future<Output = Result<ZabbixResponse>> + Send;
}
