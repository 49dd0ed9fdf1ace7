mod pcap;

pub use pcap::PcapSource;

use pcap_parser::Linktype;
use thiserror::Error;

/// One raw captured frame, as read from a capture file.
#[derive(Debug, Clone)]
pub struct PacketEvent {
    /// Capture timestamp in seconds since the epoch, when the file has one.
    pub ts: Option<f64>,
    pub linktype: Linktype,
    pub data: Vec<u8>,
}

/// Anything that can yield captured frames in order.
pub trait PacketSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("capture parse error: {0}")]
    Capture(String),
}

impl From<pcap::error::PcapFileError> for SourceError {
    fn from(value: pcap::error::PcapFileError) -> Self {
        match value {
            pcap::error::PcapFileError::Io(err) => SourceError::Io(err),
            pcap::error::PcapFileError::Format { context, message } => {
                SourceError::Capture(format!("{context}: {message}"))
            }
        }
    }
}
