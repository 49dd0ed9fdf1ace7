use super::error::{DecodeError, Region};
use super::layout;

pub struct RpsReader<'a> {
    data: &'a [u8],
}

impl<'a> RpsReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn require_header(&self) -> Result<(), DecodeError> {
        if self.data.len() < layout::HEADER_LEN {
            return Err(DecodeError::Truncated {
                at: Region::Header,
                needed: layout::HEADER_LEN,
                available: self.data.len(),
            });
        }
        Ok(())
    }

    pub fn require_payload(&self, width: usize) -> Result<(), DecodeError> {
        let available = self.data.len().saturating_sub(layout::HEADER_LEN);
        if available < width {
            return Err(DecodeError::Truncated {
                at: Region::Payload,
                needed: width,
                available,
            });
        }
        Ok(())
    }

    pub fn read_u8(&self, offset: usize) -> Result<u8, DecodeError> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| self.truncated_before(offset + 1))
    }

    pub fn read_u16_be(&self, range: std::ops::Range<usize>) -> Result<u16, DecodeError> {
        let end = range.end;
        let bytes = self.read_slice(range)?;
        if bytes.len() != 2 {
            return Err(self.truncated_before(end));
        }
        Ok(u16::from_be_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32_be(&self, range: std::ops::Range<usize>) -> Result<u32, DecodeError> {
        let end = range.end;
        let bytes = self.read_slice(range)?;
        if bytes.len() != 4 {
            return Err(self.truncated_before(end));
        }
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_slice(&self, range: std::ops::Range<usize>) -> Result<&'a [u8], DecodeError> {
        let end = range.end;
        self.data
            .get(range)
            .ok_or_else(|| self.truncated_before(end))
    }

    /// Best-effort text read: invalid bytes become replacement characters,
    /// trailing NULs are trimmed. Never fails on content.
    pub fn read_text(&self, range: std::ops::Range<usize>) -> Result<String, DecodeError> {
        let bytes = self.read_slice(range)?;
        let raw = String::from_utf8_lossy(bytes);
        Ok(raw.trim_end_matches('\0').to_string())
    }

    // Reads are only issued after the matching require_* call, so this is a
    // backstop; it still reports the shortfall region-relative.
    fn truncated_before(&self, end: usize) -> DecodeError {
        if end <= layout::HEADER_LEN {
            DecodeError::Truncated {
                at: Region::Header,
                needed: layout::HEADER_LEN,
                available: self.data.len(),
            }
        } else {
            DecodeError::Truncated {
                at: Region::Payload,
                needed: end - layout::HEADER_LEN,
                available: self.data.len().saturating_sub(layout::HEADER_LEN),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::RpsReader;
    use crate::protocols::rps::error::{DecodeError, Region};

    #[test]
    fn require_header_reports_buffer_length() {
        let reader = RpsReader::new(&[0u8; 5]);
        let err = reader.require_header().unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                at: Region::Header,
                needed: 8,
                available: 5,
            }
        );
    }

    #[test]
    fn require_payload_reports_remaining_bytes() {
        let reader = RpsReader::new(&[0u8; 11]);
        let err = reader.require_payload(4).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                at: Region::Payload,
                needed: 4,
                available: 3,
            }
        );
    }

    #[test]
    fn big_endian_reads() {
        let data = [0x00, 0x00, 0x12, 0x34, 0xDE, 0xAD, 0xBE, 0xEF];
        let reader = RpsReader::new(&data);
        assert_eq!(reader.read_u16_be(2..4).unwrap(), 0x1234);
        assert_eq!(reader.read_u32_be(4..8).unwrap(), 0xDEAD_BEEF);
        assert_eq!(reader.read_u8(0).unwrap(), 0);
    }

    #[test]
    fn text_read_is_lossy_and_trims_trailing_nul() {
        let data = [0u8; 8]
            .iter()
            .copied()
            .chain([0x45, 0xFF, 0x44, 0x00])
            .collect::<Vec<_>>();
        let reader = RpsReader::new(&data);
        let text = reader.read_text(8..12).unwrap();
        assert_eq!(text, "E\u{FFFD}D");
    }
}
