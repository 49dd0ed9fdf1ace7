use std::net::IpAddr;

use etherparse::{NetSlice, SlicedPacket, TransportSlice};
use pcap_parser::Linktype;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatagramError {
    #[error("frame slice error: {0}")]
    Slice(String),
    #[error("missing network layer in frame")]
    MissingNetworkLayer,
}

/// UDP datagram lifted out of a link-layer frame.
pub struct Datagram<'a> {
    pub src_ip: IpAddr,
    pub src_port: u16,
    pub dst_ip: IpAddr,
    pub dst_port: u16,
    pub payload: &'a [u8],
}

/// Extract a UDP datagram from a captured frame.
///
/// Returns `Ok(None)` for frames that are not UDP (or use an unsupported
/// linktype).
pub fn extract_datagram(
    linktype: Linktype,
    data: &[u8],
) -> Result<Option<Datagram<'_>>, DatagramError> {
    let sliced = match linktype {
        Linktype::ETHERNET => {
            SlicedPacket::from_ethernet(data).map_err(|e| DatagramError::Slice(e.to_string()))?
        }
        Linktype::RAW => {
            SlicedPacket::from_ip(data).map_err(|e| DatagramError::Slice(e.to_string()))?
        }
        _ => return Ok(None),
    };

    let net = sliced.net.ok_or(DatagramError::MissingNetworkLayer)?;
    let udp = match sliced.transport {
        Some(TransportSlice::Udp(udp)) => udp,
        _ => return Ok(None),
    };

    let (src_ip, dst_ip) = match net {
        NetSlice::Ipv4(ref ipv4) => (
            IpAddr::V4(ipv4.header().source_addr()),
            IpAddr::V4(ipv4.header().destination_addr()),
        ),
        NetSlice::Ipv6(ref ipv6) => (
            IpAddr::V6(ipv6.header().source_addr()),
            IpAddr::V6(ipv6.header().destination_addr()),
        ),
    };

    Ok(Some(Datagram {
        src_ip,
        src_port: udp.source_port(),
        dst_ip,
        dst_port: udp.destination_port(),
        payload: udp.payload(),
    }))
}
