use super::error::DecodeError;
use super::layout;
use super::model::{
    FieldSpan, FieldSpans, Header, Move, Opcode, Payload, PayloadKind, RoundResult, RpsPacket,
};
use super::reader::RpsReader;

/// Decode one RPS datagram.
///
/// The cursor advances strictly from offset 0: fixed 8-byte header, then a
/// payload whose width and interpretation are looked up from the opcode.
/// Trailing bytes past the consumed region are ignored. Truncation is the
/// only failure; unrecognized opcodes and payload codes decode into their
/// `Unknown`/`Unrecognized` variants.
pub fn decode(data: &[u8]) -> Result<RpsPacket, DecodeError> {
    let reader = RpsReader::new(data);
    reader.require_header()?;

    let version = reader.read_u8(layout::VERSION_OFFSET)?;
    let opcode = Opcode::from_raw(reader.read_u8(layout::OPCODE_OFFSET)?);
    let game_id = reader.read_u16_be(layout::GAME_ID_RANGE.clone())?;
    let ttl = reader.read_u32_be(layout::TTL_RANGE.clone())?;

    let kind = opcode.payload_kind();
    let width = kind.width();
    reader.require_payload(width)?;
    let payload_range = layout::HEADER_LEN..layout::HEADER_LEN + width;

    let payload = match kind {
        PayloadKind::Padding => {
            Payload::Padding(reader.read_slice(payload_range.clone())?.to_vec())
        }
        PayloadKind::Move => {
            Payload::Move(Move::from_raw(reader.read_u32_be(payload_range.clone())?))
        }
        PayloadKind::Result => Payload::Result(RoundResult::from_raw(
            reader.read_u32_be(payload_range.clone())?,
        )),
        PayloadKind::Message => Payload::Message(reader.read_text(payload_range.clone())?),
    };

    Ok(RpsPacket {
        header: Header {
            version,
            opcode,
            game_id,
            ttl,
        },
        payload,
        spans: FieldSpans {
            version: FieldSpan {
                offset: layout::VERSION_OFFSET,
                len: 1,
            },
            opcode: FieldSpan {
                offset: layout::OPCODE_OFFSET,
                len: 1,
            },
            game_id: FieldSpan::from_range(layout::GAME_ID_RANGE),
            ttl: FieldSpan::from_range(layout::TTL_RANGE),
            payload: FieldSpan::from_range(payload_range),
        },
        consumed: layout::HEADER_LEN + width,
    })
}
