//! PCAP/PCAPNG source implementation.
//!
//! Provides a `PacketSource` backed by capture files. The format is sniffed
//! from the magic bytes; both legacy PCAP and PCAPNG are supported. File
//! I/O and low-level block parsing stay here, emitting raw packet events
//! for the analysis pipeline.

pub mod error;
pub mod layout;
pub mod parser;
pub mod reader;

pub use parser::PcapSource;
