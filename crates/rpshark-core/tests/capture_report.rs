use std::fs;
use std::path::Path;

use etherparse::PacketBuilder;
use rpshark_core::{
    DEFAULT_RPS_PORT, PacketSource, PcapSource, SourceError, analyze_pcap_file,
};
use tempfile::TempDir;

fn rps_datagram(opcode: u8, game_id: u16, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0x01, opcode];
    data.extend_from_slice(&game_id.to_be_bytes());
    data.extend_from_slice(&60u32.to_be_bytes());
    data.extend_from_slice(payload);
    data
}

fn udp_frame(dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
        .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
        .udp(40000, dst_port);
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, payload).unwrap();
    frame
}

fn tcp_frame() -> Vec<u8> {
    let builder = PacketBuilder::ethernet2([1, 2, 3, 4, 5, 6], [7, 8, 9, 10, 11, 12])
        .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
        .tcp(40000, DEFAULT_RPS_PORT, 0, 0);
    let payload = [0u8; 4];
    let mut frame = Vec::with_capacity(builder.size(payload.len()));
    builder.write(&mut frame, &payload).unwrap();
    frame
}

fn write_legacy_pcap(path: &Path, frames: &[Vec<u8>]) {
    let mut output = Vec::new();
    output.extend_from_slice(&0xA1B2_C3D4u32.to_le_bytes());
    output.extend_from_slice(&2u16.to_le_bytes());
    output.extend_from_slice(&4u16.to_le_bytes());
    output.extend_from_slice(&0i32.to_le_bytes());
    output.extend_from_slice(&0u32.to_le_bytes());
    output.extend_from_slice(&65535u32.to_le_bytes());
    output.extend_from_slice(&1u32.to_le_bytes());

    for (idx, data) in frames.iter().enumerate() {
        let len = data.len() as u32;
        output.extend_from_slice(&(100 + idx as u32).to_le_bytes());
        output.extend_from_slice(&0u32.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(data);
    }

    fs::write(path, output).unwrap();
}

fn sample_frames() -> Vec<Vec<u8>> {
    vec![
        udp_frame(DEFAULT_RPS_PORT, &rps_datagram(0x01, 0x2A, &[0; 4])),
        udp_frame(DEFAULT_RPS_PORT, &rps_datagram(0x02, 0x2A, &[0, 0, 0, 1])),
        udp_frame(DEFAULT_RPS_PORT, &rps_datagram(0x02, 0x2A, &[0, 0, 0, 7])),
        udp_frame(DEFAULT_RPS_PORT, &rps_datagram(0x03, 0x2A, &[0, 0, 0, 1])),
        udp_frame(DEFAULT_RPS_PORT, &rps_datagram(0x05, 0x1212, b"END!")),
        // Truncated MOVE: only three payload bytes on the wire.
        udp_frame(DEFAULT_RPS_PORT, &rps_datagram(0x02, 0x2A, &[0, 0, 0])),
        // Same bytes on an unrelated port: must be ignored.
        udp_frame(9999, &rps_datagram(0x02, 0x2A, &[0, 0, 0, 1])),
        tcp_frame(),
    ]
}

#[test]
fn analyze_builds_game_and_packet_records() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rps.pcap");
    write_legacy_pcap(&path, &sample_frames());

    let report = analyze_pcap_file(&path, DEFAULT_RPS_PORT).unwrap();

    let summary = report.capture_summary.expect("capture summary");
    assert_eq!(summary.packets_total, 8);
    assert_eq!(summary.rps_datagrams, 6);
    assert_eq!(summary.decoded, 5);
    assert_eq!(summary.truncated, 1);
    assert_eq!(summary.time_start.as_deref(), Some("1970-01-01T00:01:40Z"));
    assert_eq!(summary.time_end.as_deref(), Some("1970-01-01T00:01:47Z"));
    assert_eq!(report.generated_at, "1970-01-01T00:01:47Z");

    assert_eq!(report.games.len(), 2);
    let first = &report.games[0];
    assert_eq!(first.game_id, 0x2A);
    assert_eq!(first.packets, 4);
    let opcodes: Vec<_> = first
        .opcodes
        .iter()
        .map(|c| (c.value.as_str(), c.count))
        .collect();
    assert_eq!(opcodes, vec![("INIT", 1), ("MOVE", 2), ("RESULT", 1)]);
    let moves: Vec<_> = first
        .moves
        .iter()
        .map(|c| (c.value.as_str(), c.count))
        .collect();
    assert_eq!(moves, vec![("Rock", 1), ("Unrecognized(7)", 1)]);
    let results: Vec<_> = first
        .results
        .iter()
        .map(|c| (c.value.as_str(), c.count))
        .collect();
    assert_eq!(results, vec![("Win", 1)]);

    let second = &report.games[1];
    assert_eq!(second.game_id, 0x1212);
    assert_eq!(second.packets, 1);
    assert!(second.moves.is_empty());

    assert_eq!(report.packets.len(), 6);
    assert!(report.packets.iter().all(|r| r.src == "10.0.0.1:40000"));
    assert!(report.packets.iter().all(|r| r.dst == "10.0.0.2:50001"));
    let truncated = &report.packets[5];
    assert!(truncated.packet.is_none());
    assert_eq!(
        truncated.error.as_deref(),
        Some("payload truncated: need 4 bytes, got 3")
    );
}

#[test]
fn analyze_respects_port_override() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rps.pcap");
    write_legacy_pcap(&path, &sample_frames());

    let report = analyze_pcap_file(&path, 9999).unwrap();
    let summary = report.capture_summary.expect("capture summary");
    assert_eq!(summary.rps_datagrams, 1);
    assert_eq!(summary.decoded, 1);
}

#[test]
fn report_is_deterministic_across_runs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rps.pcap");
    write_legacy_pcap(&path, &sample_frames());

    let first = analyze_pcap_file(&path, DEFAULT_RPS_PORT).unwrap();
    let second = analyze_pcap_file(&path, DEFAULT_RPS_PORT).unwrap();

    let first = serde_json::to_value(first).unwrap();
    let second = serde_json::to_value(second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn pcap_source_yields_every_frame() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rps.pcap");
    let frames = sample_frames();
    write_legacy_pcap(&path, &frames);

    let mut source = PcapSource::open(&path).unwrap();
    let mut packets = 0usize;
    while let Some(event) = source.next_packet().unwrap() {
        assert!(event.ts.is_some());
        packets += 1;
    }
    assert_eq!(packets, frames.len());
}

#[test]
fn pcap_source_rejects_truncated_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.pcap");
    fs::write(&path, [0x0A, 0x0D, 0x0D]).unwrap();

    let err = match PcapSource::open(&path) {
        Ok(_) => panic!("expected truncated file to be rejected"),
        Err(err) => err,
    };
    assert!(matches!(err, SourceError::Io(_)));
}
