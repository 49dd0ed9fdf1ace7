use std::fs::File;
use std::path::Path;

use pcap_parser::{
    Block, LegacyPcapReader, Linktype, PcapBlockOwned, PcapNGReader, traits::PcapReaderIterator,
};

use crate::source::{PacketEvent, PacketSource, SourceError};

use super::error::PcapFileError;
use super::layout;
use super::reader::{
    is_pcapng_magic, legacy_ts_to_seconds, linktype_for_interface, pcapng_ts_to_seconds,
    read_magic_and_rewind,
};

/// Capture file source, format sniffed from the magic bytes.
pub struct PcapSource {
    format: Format,
}

enum Format {
    Legacy {
        reader: LegacyPcapReader<File>,
        linktype: Option<Linktype>,
    },
    Ng {
        reader: PcapNGReader<File>,
        linktypes: Vec<Linktype>,
    },
}

impl PcapSource {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let mut file = File::open(path).map_err(SourceError::from)?;
        let magic = read_magic_and_rewind(&mut file).map_err(SourceError::from)?;

        let format = if is_pcapng_magic(&magic) {
            let reader =
                PcapNGReader::new(layout::READER_BUFFER_SIZE, file).map_err(|e| {
                    PcapFileError::Format {
                        context: "pcapng reader init",
                        message: e.to_string(),
                    }
                })?;
            Format::Ng {
                reader,
                linktypes: Vec::new(),
            }
        } else {
            let reader =
                LegacyPcapReader::new(layout::READER_BUFFER_SIZE, file).map_err(|e| {
                    PcapFileError::Format {
                        context: "pcap reader init",
                        message: e.to_string(),
                    }
                })?;
            Format::Legacy {
                reader,
                linktype: None,
            }
        };
        Ok(Self { format })
    }
}

impl PacketSource for PcapSource {
    fn next_packet(&mut self) -> Result<Option<PacketEvent>, SourceError> {
        let event = match &mut self.format {
            Format::Legacy { reader, linktype } => next_legacy(reader, linktype),
            Format::Ng { reader, linktypes } => next_ng(reader, linktypes),
        };
        event.map_err(SourceError::from)
    }
}

fn next_legacy(
    reader: &mut LegacyPcapReader<File>,
    linktype: &mut Option<Linktype>,
) -> Result<Option<PacketEvent>, PcapFileError> {
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = match block {
                    PcapBlockOwned::LegacyHeader(header) => {
                        *linktype = Some(header.network);
                        None
                    }
                    PcapBlockOwned::Legacy(packet) => Some(PacketEvent {
                        ts: Some(legacy_ts_to_seconds(packet.ts_sec, packet.ts_usec)),
                        linktype: linktype.unwrap_or(Linktype::ETHERNET),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                };
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(pcap_parser::PcapError::Eof) => return Ok(None),
            Err(pcap_parser::PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| PcapFileError::Format {
                    context: "pcap reader refill",
                    message: e.to_string(),
                })?;
            }
            Err(e) => {
                return Err(PcapFileError::Format {
                    context: "pcap reader next",
                    message: e.to_string(),
                });
            }
        }
    }
}

fn next_ng(
    reader: &mut PcapNGReader<File>,
    linktypes: &mut Vec<Linktype>,
) -> Result<Option<PacketEvent>, PcapFileError> {
    loop {
        match reader.next() {
            Ok((offset, block)) => {
                let event = match block {
                    PcapBlockOwned::NG(Block::InterfaceDescription(intf)) => {
                        linktypes.push(intf.linktype);
                        None
                    }
                    PcapBlockOwned::NG(Block::EnhancedPacket(packet)) => Some(PacketEvent {
                        ts: Some(pcapng_ts_to_seconds(packet.ts_high, packet.ts_low)),
                        linktype: linktype_for_interface(linktypes, packet.if_id),
                        data: packet.data.to_vec(),
                    }),
                    _ => None,
                };
                reader.consume(offset);
                if event.is_some() {
                    return Ok(event);
                }
            }
            Err(pcap_parser::PcapError::Eof) => return Ok(None),
            Err(pcap_parser::PcapError::Incomplete(_)) => {
                reader.refill().map_err(|e| PcapFileError::Format {
                    context: "pcapng reader refill",
                    message: e.to_string(),
                })?;
            }
            Err(e) => {
                return Err(PcapFileError::Format {
                    context: "pcapng reader next",
                    message: e.to_string(),
                });
            }
        }
    }
}
