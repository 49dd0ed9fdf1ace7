use std::collections::BTreeMap;
use std::net::IpAddr;
use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::protocols::rps;
use crate::source::{PacketEvent, PacketSource, PcapSource, SourceError};
use crate::{CaptureSummary, DEFAULT_GENERATED_AT, PacketRecord, Report, make_stub_report};

mod datagram;
mod games;

pub use datagram::{Datagram, DatagramError, extract_datagram};

use games::{GameStats, build_game_summaries, record_packet};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("source error: {0}")]
    Source(#[from] SourceError),
}

/// Analyze a capture file, decoding RPS datagrams seen on `rps_port`.
pub fn analyze_pcap_file(path: &Path, rps_port: u16) -> Result<Report, AnalysisError> {
    let source = PcapSource::open(path)?;
    analyze_source(path, source, rps_port)
}

/// Analyze any packet source. Frames that are not UDP, or whose endpoints
/// do not involve `rps_port`, are counted but otherwise skipped.
pub fn analyze_source<S: PacketSource>(
    path: &Path,
    mut source: S,
    rps_port: u16,
) -> Result<Report, AnalysisError> {
    let mut packets_total = 0u64;
    let mut rps_datagrams = 0u64;
    let mut decoded = 0u64;
    let mut truncated = 0u64;
    let mut first_ts = None;
    let mut last_ts = None;
    let mut games: BTreeMap<u16, GameStats> = BTreeMap::new();
    let mut records: Vec<PacketRecord> = Vec::new();

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        packets_total += 1;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        let Ok(Some(dg)) = extract_datagram(linktype, &data) else {
            continue;
        };
        if dg.src_port != rps_port && dg.dst_port != rps_port {
            continue;
        }
        rps_datagrams += 1;

        let mut record = PacketRecord {
            ts: ts_to_rfc3339(ts),
            src: format_endpoint(dg.src_ip, dg.src_port),
            dst: format_endpoint(dg.dst_ip, dg.dst_port),
            packet: None,
            error: None,
        };
        match rps::decode(dg.payload) {
            Ok(packet) => {
                decoded += 1;
                record_packet(&mut games, &packet);
                record.packet = Some(packet);
            }
            Err(err) => {
                truncated += 1;
                record.error = Some(err.to_string());
            }
        }
        records.push(record);
    }

    let mut report = make_stub_report(&path.display().to_string(), path.metadata()?.len());
    report.capture_summary = Some(CaptureSummary {
        packets_total,
        rps_datagrams,
        decoded,
        truncated,
        time_start: ts_to_rfc3339(first_ts),
        time_end: ts_to_rfc3339(last_ts),
    });
    report.generated_at = report
        .capture_summary
        .as_ref()
        .and_then(|summary| summary.time_end.clone().or(summary.time_start.clone()))
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.games = build_game_summaries(games);
    report.packets = records;
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else { return };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0) as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}

fn format_endpoint(ip: IpAddr, port: u16) -> String {
    match ip {
        IpAddr::V4(addr) => format!("{}:{}", addr, port),
        IpAddr::V6(addr) => format!("[{}]:{}", addr, port),
    }
}
