//! Single-shot ICMP reachability checks.

mod icmp;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use icmp::IcmpTransport;

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr};
use std::time::Duration;

use thiserror::Error;

/// Default time to wait for an echo reply.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_millis(2000);

/// Why a probe did not get a reply.
///
/// [`ConnectivityProbe::probe`] collapses all of these to `false`.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The target was empty.
    #[error("No target given")]
    EmptyTarget,

    /// The target is an IPv6 address.
    #[error("IPv6 target '{0}' is not supported")]
    Ipv6(String),

    /// The host name did not resolve to an IPv4 address.
    #[error("Could not resolve '{host}': {reason}")]
    Resolve {
        /// Name being resolved.
        host: String,
        /// Resolver message.
        reason: String,
    },

    /// No reply arrived in time.
    #[error("No reply within {0:?}")]
    Timeout(Duration),

    /// The echo could not be sent or received.
    #[error("Echo failed: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Sends one ICMP echo request and waits for its reply.
pub trait EchoTransport: Send + Sync {
    /// Returns the round-trip time of a single echo to `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::Timeout`] if no reply arrives within `timeout`,
    /// or [`ProbeError::Transport`] for socket failures.
    fn echo(
        &self,
        target: Ipv4Addr,
        timeout: Duration,
    ) -> impl Future<Output = Result<Duration, ProbeError>> + Send;
}

/// Checks whether a device answers ping.
///
/// One echo per call, no retries. The timeout covers name resolution and
/// the echo together. The transport gets whatever is left of it, and a
/// transport that never answers still yields `false` on time.
#[derive(Debug)]
pub struct ConnectivityProbe<T> {
    transport: T,
    timeout: Duration,
}

impl<T: EchoTransport> ConnectivityProbe<T> {
    /// Creates a probe with the default 2000 ms timeout.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self {
            transport,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Sets the reply timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the reply timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` if `target` replied within the timeout.
    ///
    /// `target` is a dotted quad or a host name.
    pub async fn probe(&self, target: &str) -> bool {
        match self.try_probe(target).await {
            Ok(rtt) => {
                tracing::debug!(target, ?rtt, "Echo reply received");
                true
            }
            Err(e) => {
                tracing::debug!(target, "Probe failed: {e}");
                false
            }
        }
    }

    /// Like [`probe`](Self::probe), but reports the round-trip time or the
    /// reason for failure.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the target cannot be resolved or does not
    /// reply in time.
    pub async fn try_probe(&self, target: &str) -> Result<Duration, ProbeError> {
        let deadline = tokio::time::Instant::now() + self.timeout;
        let attempt = async {
            let addr = resolve_ipv4(target).await?;
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            self.transport.echo(addr, remaining).await
        };

        tokio::time::timeout_at(deadline, attempt)
            .await
            .unwrap_or(Err(ProbeError::Timeout(self.timeout)))
    }
}

/// Resolves a dotted quad or host name to its first IPv4 address.
///
/// # Errors
///
/// Returns [`ProbeError`] for empty input, IPv6 literals, and names without
/// an IPv4 address.
pub async fn resolve_ipv4(target: &str) -> Result<Ipv4Addr, ProbeError> {
    let target = target.trim();
    if target.is_empty() {
        return Err(ProbeError::EmptyTarget);
    }

    match target.parse::<IpAddr>() {
        Ok(IpAddr::V4(addr)) => return Ok(addr),
        Ok(IpAddr::V6(_)) => return Err(ProbeError::Ipv6(target.to_string())),
        Err(_) => {}
    }

    let addrs = tokio::net::lookup_host((target, 0))
        .await
        .map_err(|e| ProbeError::Resolve {
            host: target.to_string(),
            reason: e.to_string(),
        })?;

    addrs
        .into_iter()
        .find_map(|addr| match addr.ip() {
            IpAddr::V4(v4) => Some(v4),
            IpAddr::V6(_) => None,
        })
        .ok_or_else(|| ProbeError::Resolve {
            host: target.to_string(),
            reason: "no IPv4 address".to_string(),
        })
}
