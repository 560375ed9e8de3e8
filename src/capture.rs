//! Live packet capture via libpcap. Compiled only with the `capture`
//! feature; everything else in the crate talks to the
//! [`ObservationSource`] trait and never sees pcap types.

use crate::monitor::{Observation, ObservationSource, SourceError};
use etherparse::{NetHeaders, PacketHeaders, TransportHeader};
use pcap::{Active, Capture, Device};
use std::net::IpAddr;

/// Capture-mode observation source over an open pcap handle.
pub struct LiveCapture {
    cap: Capture<Active>,
}

impl LiveCapture {
    /// Opens the named interface, or the default device when `interface` is
    /// `None`. Any failure here (missing device, insufficient privilege)
    /// makes the caller fall back to simulation.
    pub fn open(interface: Option<&str>) -> Result<Self, pcap::Error> {
        let device = match interface {
            Some(name) => Device::from_name(name)?,
            None => Device::lookup()?.ok_or(pcap::Error::NoSuchDevice)?,
        };

        let cap = Capture::from_device(device)?
            .promisc(false) // Reduce permissions needed
            .snaplen(2048)
            .timeout(500) // Bounded block so the stop flag is re-checked
            .immediate_mode(true)
            .open()?;

        Ok(Self { cap })
    }
}

impl ObservationSource for LiveCapture {
    fn next_observation(&mut self) -> Result<Option<Observation>, SourceError> {
        match self.cap.next_packet() {
            Ok(packet) => Ok(parse_observation(packet.data)),
            Err(pcap::Error::TimeoutExpired) => Ok(None),
            Err(e) => Err(SourceError::Capture(e.to_string())),
        }
    }

    fn describe(&self) -> &'static str {
        "live capture"
    }
}

/// Extracts `(src, dst, proto, dport)` from a raw ethernet frame. Non-IP
/// and malformed frames yield `None` and are skipped.
fn parse_observation(data: &[u8]) -> Option<Observation> {
    let headers = PacketHeaders::from_ethernet_slice(data).ok()?;

    let (src, dst) = match headers.net? {
        NetHeaders::Ipv4(h, _) => (
            IpAddr::from(h.source).to_string(),
            IpAddr::from(h.destination).to_string(),
        ),
        NetHeaders::Ipv6(h, _) => (
            IpAddr::from(h.source).to_string(),
            IpAddr::from(h.destination).to_string(),
        ),
    };

    let (proto, dport) = match headers.transport {
        Some(TransportHeader::Tcp(tcp)) => ("TCP", Some(tcp.destination_port)),
        Some(TransportHeader::Udp(udp)) => ("UDP", Some(udp.destination_port)),
        _ => ("IP", None),
    };

    Some(Observation {
        src,
        dst,
        proto: proto.to_string(),
        dport,
        info: None,
    })
}
