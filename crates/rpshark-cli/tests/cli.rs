use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use serde_json::Value;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("rpshark"))
}

fn rps_datagram(opcode: u8, game_id: u16, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0x01, opcode];
    data.extend_from_slice(&game_id.to_be_bytes());
    data.extend_from_slice(&60u32.to_be_bytes());
    data.extend_from_slice(payload);
    data
}

fn ipv4_udp_frame(dst_port: u16, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::new();
    frame.extend_from_slice(&[0x01, 0x02, 0x03, 0x04, 0x05, 0x06]);
    frame.extend_from_slice(&[0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F]);
    frame.extend_from_slice(&0x0800u16.to_be_bytes());

    let total_len = 20u16 + 8u16 + (payload.len() as u16);
    let mut ip_header = [0u8; 20];
    ip_header[0] = 0x45;
    ip_header[2..4].copy_from_slice(&total_len.to_be_bytes());
    ip_header[8] = 64;
    ip_header[9] = 17;
    ip_header[12..16].copy_from_slice(&[10, 0, 0, 1]);
    ip_header[16..20].copy_from_slice(&[10, 0, 0, 2]);
    let checksum = ipv4_checksum(&ip_header);
    ip_header[10..12].copy_from_slice(&checksum.to_be_bytes());
    frame.extend_from_slice(&ip_header);

    let udp_len = 8u16 + (payload.len() as u16);
    frame.extend_from_slice(&40000u16.to_be_bytes());
    frame.extend_from_slice(&dst_port.to_be_bytes());
    frame.extend_from_slice(&udp_len.to_be_bytes());
    frame.extend_from_slice(&0u16.to_be_bytes());

    frame.extend_from_slice(payload);
    frame
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

fn write_sample_capture(dir: &TempDir) -> std::path::PathBuf {
    let frames = [
        ipv4_udp_frame(50001, &rps_datagram(0x01, 0x2A, &[0; 4])),
        ipv4_udp_frame(50001, &rps_datagram(0x02, 0x2A, &[0, 0, 0, 2])),
        ipv4_udp_frame(50001, &rps_datagram(0x05, 0x2A, b"END!")),
    ];

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
        output.extend_from_slice(&(idx as u32).to_le_bytes());
        output.extend_from_slice(&0u32.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(&len.to_le_bytes());
        output.extend_from_slice(data);
    }

    let path = dir.path().join("sample.pcap");
    std::fs::write(&path, output).expect("write capture");
    path
}

#[test]
fn help_supports_analyse_and_analyze() {
    cmd()
        .arg("pcap")
        .arg("analyse")
        .arg("--help")
        .assert()
        .success();
    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn missing_input_shows_error_and_hint() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("missing.pcap");
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(missing)
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:").and(contains("hint:")));
}

#[test]
fn analyse_writes_report_file() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyse")
        .arg(&input)
        .arg("-o")
        .arg(&report)
        .assert()
        .success()
        .stderr(contains("OK: report written"));

    let json = std::fs::read_to_string(&report).expect("read report");
    let value: Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(value["capture_summary"]["rps_datagrams"], 3);
    assert_eq!(value["capture_summary"]["decoded"], 3);
    assert_eq!(value["games"][0]["game_id"], 0x2A);
}

#[test]
fn analyse_stdout_outputs_json() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_sample_capture(&temp);

    let assert = cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(&input)
        .arg("--stdout")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["packets"][1]["packet"]["payload"]["move"], "paper");
}

#[test]
fn analyse_port_filter_excludes_other_traffic() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_sample_capture(&temp);

    let assert = cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(&input)
        .arg("--stdout")
        .arg("--port")
        .arg("50002")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["capture_summary"]["rps_datagrams"], 0);
}

#[test]
fn stdout_and_report_conflict() {
    let temp = TempDir::new().expect("tempdir");
    let input = write_sample_capture(&temp);
    let report = temp.path().join("report.json");

    cmd()
        .arg("pcap")
        .arg("analyze")
        .arg(input)
        .arg("--stdout")
        .arg("-o")
        .arg(report)
        .assert()
        .failure()
        .stderr(contains("error:"));
}

#[test]
fn decode_hex_outputs_packet_json() {
    let assert = cmd()
        .arg("decode")
        .arg("01 02 00 2A 00 00 00 05 00 00 00 01")
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("utf8 stdout");
    let value: Value = serde_json::from_str(&stdout).expect("valid json");
    assert_eq!(value["header"]["version"], 1);
    assert_eq!(value["header"]["opcode"], "move");
    assert_eq!(value["header"]["game_id"], 42);
    assert_eq!(value["header"]["ttl"], 5);
    assert_eq!(value["payload"]["move"], "rock");
    assert_eq!(value["consumed"], 12);
}

#[test]
fn decode_truncated_hex_reports_region() {
    cmd()
        .arg("decode")
        .arg("01 05 00 01 00 00 00 00 45 72 72")
        .assert()
        .failure()
        .stderr(contains("payload truncated: need 4 bytes, got 3").and(contains("hint:")));
}

#[test]
fn decode_rejects_invalid_hex() {
    cmd()
        .arg("decode")
        .arg("01 0Z")
        .assert()
        .failure()
        .stderr(contains("invalid hex digits"));
}
