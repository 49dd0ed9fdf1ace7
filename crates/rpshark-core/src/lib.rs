//! rpshark core library: RPS protocol decoding and capture analysis.
//!
//! The heart of the crate is the pure RPS decoder (`decode`): one UDP
//! datagram in, one typed [`RpsPacket`] (or a truncation error) out, with
//! the exact byte span of every field. Around it sits the offline pipeline
//! used by the CLI: a capture file source feeds the analysis layer, which
//! extracts UDP datagrams on the RPS port, decodes each one independently
//! and aggregates the results into a deterministic report.
//!
//! Invariants:
//! - Decoding is stateless and side-effect free; packets decode
//!   independently, and truncation is the only decode failure.
//! - Report outputs are deterministic and stable across runs.
//! - All I/O is isolated in `source`; parsers never touch files.
//!
//! # Examples
//! ```
//! use rpshark_core::{Opcode, Payload, RoundResult, decode};
//!
//! let data = [0x01, 0x03, 0x12, 0x34, 0x00, 0x00, 0x00, 0x3C, 0x00, 0x00, 0x00, 0x01];
//! let packet = decode(&data)?;
//! assert_eq!(packet.header.opcode, Opcode::Result);
//! assert_eq!(packet.payload, Payload::Result(RoundResult::Win));
//! assert_eq!(packet.consumed, 12);
//! # Ok::<(), rpshark_core::DecodeError>(())
//! ```

use serde::{Deserialize, Serialize};

mod analysis;
mod protocols;
mod source;

pub use analysis::{
    AnalysisError, Datagram, DatagramError, analyze_pcap_file, analyze_source, extract_datagram,
};
pub use protocols::rps::{
    DecodeError, FieldSpan, FieldSpans, Header, Move, Opcode, Payload, PayloadKind, Region,
    RoundResult, RpsPacket, decode,
};
pub use source::{PacketEvent, PacketSource, PcapSource, SourceError};

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Default timestamp used when no capture time is available.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";
/// Well-known UDP port the RPS protocol is spoken on.
pub const DEFAULT_RPS_PORT: u16 = protocols::rps::layout::RPS_PORT;

/// Aggregated analysis report with deterministic ordering.
///
/// # Examples
/// ```
/// use rpshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcap", 123);
/// assert_eq!(report.report_version, rpshark_core::REPORT_VERSION);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    /// Tool identification metadata.
    pub tool: ToolInfo,
    /// RFC3339 timestamp representing the report generation time.
    pub generated_at: String,

    /// Input capture metadata.
    pub input: InputInfo,

    /// Optional capture summary (may be absent when unavailable).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capture_summary: Option<CaptureSummary>,
    /// Per-game summaries, sorted by game id.
    pub games: Vec<GameSummary>,
    /// Per-datagram records in capture order.
    pub packets: Vec<PacketRecord>,
}

/// Tool metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInfo {
    /// Tool name (e.g., "rpshark").
    pub name: String,
    /// Tool version (semver).
    pub version: String,
}

/// Input capture metadata embedded in reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputInfo {
    /// Input path as provided to the analyzer.
    pub path: String,
    /// Input size in bytes.
    pub bytes: u64,
}

/// Capture totals (timestamps may be absent).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureSummary {
    /// Total frame count observed in the capture.
    pub packets_total: u64,
    /// UDP datagrams seen on the RPS port.
    pub rps_datagrams: u64,
    /// Datagrams that decoded successfully.
    pub decoded: u64,
    /// Datagrams rejected as truncated.
    pub truncated: u64,
    /// RFC3339 timestamp of the first frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    /// RFC3339 timestamp of the last frame (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
}

/// Per-game aggregation over decoded packets.
///
/// # Examples
/// ```
/// use rpshark_core::{GameSummary, ValueCount};
///
/// let summary = GameSummary {
///     game_id: 0x1234,
///     packets: 2,
///     opcodes: vec![ValueCount { value: "MOVE".to_string(), count: 2 }],
///     moves: vec![ValueCount { value: "Rock".to_string(), count: 2 }],
///     results: Vec::new(),
/// };
/// assert_eq!(summary.game_id, 0x1234);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    /// Session identifier from the packet header.
    pub game_id: u16,
    /// Decoded packets attributed to this game.
    pub packets: u64,
    /// Packet counts per opcode, in raw-opcode order.
    pub opcodes: Vec<ValueCount>,
    /// Move counts, in raw-code order (empty when no MOVE packets).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub moves: Vec<ValueCount>,
    /// Result counts, in raw-code order (empty when no RESULT packets).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ValueCount>,
}

/// A labelled occurrence counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueCount {
    /// Display label ("MOVE", "Rock", "Unrecognized(7)", ...).
    pub value: String,
    /// Number of occurrences.
    pub count: u64,
}

/// One RPS datagram as seen in the capture: endpoints plus the decoded
/// packet, or the truncation message when decoding failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacketRecord {
    /// RFC3339 capture timestamp (if known).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    /// Source endpoint in `ip:port` form.
    pub src: String,
    /// Destination endpoint in `ip:port` form.
    pub dst: String,
    /// Decoded packet, absent on decode failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packet: Option<RpsPacket>,
    /// Decode error message, absent on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Build a stub report with base fields filled and empty aggregates.
///
/// # Examples
/// ```
/// use rpshark_core::make_stub_report;
///
/// let report = make_stub_report("capture.pcap", 123);
/// assert!(report.games.is_empty());
/// assert!(report.packets.is_empty());
/// ```
pub fn make_stub_report(input_path: &str, input_bytes: u64) -> Report {
    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "rpshark".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: DEFAULT_GENERATED_AT.to_string(),
        input: InputInfo {
            path: input_path.to_string(),
            bytes: input_bytes,
        },
        capture_summary: None,
        games: vec![],
        packets: vec![],
    }
}
