//! Writes a sample RPS capture for manual testing of the analyzer.
//!
//! The packet matrix mirrors the protocol's reference sender: two game ids,
//! every opcode, every move and result code, and an "END!" error message.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const ETHERTYPE_IPV4: u16 = 0x0800;
const UDP_PROTO: u8 = 17;
const RPS_PORT: u16 = 50001;

const VERSION: u8 = 0x01;
const TTL: u32 = 0x3C;
const GAME_IDS: [u16; 2] = [0x1234, 0x1212];

const OPCODE_INIT: u8 = 0x01;
const OPCODE_MOVE: u8 = 0x02;
const OPCODE_RESULT: u8 = 0x03;
const OPCODE_ACK: u8 = 0x04;
const OPCODE_ERROR: u8 = 0x05;

fn main() -> Result<(), String> {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("rps_sample.pcap"));

    let mut datagrams = Vec::new();
    for game_id in GAME_IDS {
        for opcode in [OPCODE_INIT, OPCODE_MOVE, OPCODE_RESULT, OPCODE_ACK, OPCODE_ERROR] {
            match opcode {
                OPCODE_MOVE | OPCODE_RESULT => {
                    for code in 1u32..=3 {
                        datagrams.push(build_rps_datagram(opcode, game_id, &code.to_be_bytes()));
                    }
                }
                OPCODE_ERROR => {
                    datagrams.push(build_rps_datagram(opcode, game_id, b"END!"));
                }
                _ => {
                    datagrams.push(build_rps_datagram(opcode, game_id, &[0u8; 4]));
                }
            }
        }
    }

    let mut packets = Vec::new();
    for (idx, payload) in datagrams.iter().enumerate() {
        let frame = build_ipv4_udp_frame("10.0.0.1", "10.0.0.2", 40000, RPS_PORT, payload);
        packets.push((idx as u32, 0u32, frame));
    }

    write_legacy_pcap(&path, &packets)?;
    eprintln!("wrote {} packets -> {}", packets.len(), path.display());
    Ok(())
}

fn build_rps_datagram(opcode: u8, game_id: u16, payload: &[u8]) -> Vec<u8> {
    let mut data = Vec::with_capacity(8 + payload.len());
    data.push(VERSION);
    data.push(opcode);
    data.extend_from_slice(&game_id.to_be_bytes());
    data.extend_from_slice(&TTL.to_be_bytes());
    data.extend_from_slice(payload);
    data
}

fn build_ipv4_udp_frame(
    src_ip: &str,
    dst_ip: &str,
    src_port: u16,
    dst_port: u16,
    payload: &[u8],
) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    frame.extend_from_slice(&[0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F]);
    frame.extend_from_slice(&ETHERTYPE_IPV4.to_be_bytes());

    let total_len = 20u16 + 8u16 + (payload.len() as u16);
    let mut ip_header = [0u8; 20];
    ip_header[0] = 0x45;
    ip_header[2..4].copy_from_slice(&total_len.to_be_bytes());
    ip_header[8] = 64;
    ip_header[9] = UDP_PROTO;
    ip_header[12..16].copy_from_slice(&parse_ipv4(src_ip));
    ip_header[16..20].copy_from_slice(&parse_ipv4(dst_ip));
    let checksum = ipv4_checksum(&ip_header);
    ip_header[10..12].copy_from_slice(&checksum.to_be_bytes());
    frame.extend_from_slice(&ip_header);

    let udp_len = 8u16 + (payload.len() as u16);
    frame.extend_from_slice(&src_port.to_be_bytes());
    frame.extend_from_slice(&dst_port.to_be_bytes());
    frame.extend_from_slice(&udp_len.to_be_bytes());
    frame.extend_from_slice(&0u16.to_be_bytes());

    frame.extend_from_slice(payload);
    frame
}

fn parse_ipv4(ip: &str) -> [u8; 4] {
    let mut out = [0u8; 4];
    for (idx, part) in ip.split('.').enumerate() {
        out[idx] = part.parse::<u8>().unwrap_or(0);
    }
    out
}

fn ipv4_checksum(header: &[u8; 20]) -> u16 {
    let mut sum = 0u32;
    for chunk in header.chunks(2) {
        let part = u16::from_be_bytes([chunk[0], chunk[1]]) as u32;
        sum = sum.wrapping_add(part);
    }
    while (sum >> 16) != 0 {
        sum = (sum & 0xFFFF) + (sum >> 16);
    }
    !(sum as u16)
}

fn write_legacy_pcap(path: &Path, packets: &[(u32, u32, Vec<u8>)]) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("failed to create {}: {}", parent.display(), err))?;
        }
    }

    let mut output = Vec::new();
    output.extend_from_slice(&0xA1B2_C3D4u32.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65535u32.to_le_bytes());
    output.extend_from_slice(&1u32.to_le_bytes());

    for (ts_sec, ts_usec, data) in packets {
        let len = data.len() as u32;
        output.extend_from_slice(&ts_sec.to_le_bytes());
        output.extend_from_slice(&ts_usec.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(data);
    }

    fs::write(path, output).map_err(|err| format!("failed to write {}: {}", path.display(), err))
}
