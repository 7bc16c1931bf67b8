//! ICMP echo over `surge-ping`.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use surge_ping::{Client, Config, PingIdentifier, PingSequence, SurgeError};
use uuid::Uuid;

use super::{EchoTransport, ProbeError};

/// Echo payload size, matching the Windows `ping` default.
const PAYLOAD: [u8; 32] = [0; 32];

/// [`EchoTransport`] sending real ICMP echo requests.
///
/// A socket is opened per echo. On Linux this uses an unprivileged ICMP
/// datagram socket, which requires the group to be allowed by
/// `net.ipv4.ping_group_range`; otherwise every echo fails.
#[derive(Debug)]
pub struct IcmpTransport {
    next_identifier: AtomicU16,
}

impl IcmpTransport {
    /// Creates a transport.
    #[must_use]
    pub fn new() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        Self {
            next_identifier: AtomicU16::new(u16::from_be_bytes([bytes[0], bytes[1]])),
        }
    }
}

impl Default for IcmpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoTransport for IcmpTransport {
    async fn echo(&self, target: Ipv4Addr, timeout: Duration) -> Result<Duration, ProbeError> {
        let client = Client::new(&Config::default()).map_err(|e| ProbeError::Transport(Box::new(e)))?;
        let identifier = PingIdentifier(self.next_identifier.fetch_add(1, Ordering::Relaxed));

        let mut pinger = client.pinger(IpAddr::V4(target), identifier).await;
        pinger.timeout(timeout);

        match pinger.ping(PingSequence(0), &PAYLOAD).await {
            Ok((_, rtt)) => Ok(rtt),
            Err(SurgeError::Timeout { .. }) => Err(ProbeError::Timeout(timeout)),
            Err(e) => Err(ProbeError::Transport(Box::new(e))),
        }
    }
}
