use std::fmt;

use serde::{Deserialize, Serialize};

use super::layout;

/// Packet type carried in the header.
///
/// Values outside the defined set map to `Unknown`; an unrecognized opcode
/// never fails the decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Opcode {
    Init,
    Move,
    Result,
    Ack,
    Error,
    Unknown(u8),
}

impl Opcode {
    pub fn from_raw(raw: u8) -> Self {
        match raw {
            layout::OPCODE_INIT => Opcode::Init,
            layout::OPCODE_MOVE => Opcode::Move,
            layout::OPCODE_RESULT => Opcode::Result,
            layout::OPCODE_ACK => Opcode::Ack,
            layout::OPCODE_ERROR => Opcode::Error,
            other => Opcode::Unknown(other),
        }
    }

    pub fn raw(self) -> u8 {
        match self {
            Opcode::Init => layout::OPCODE_INIT,
            Opcode::Move => layout::OPCODE_MOVE,
            Opcode::Result => layout::OPCODE_RESULT,
            Opcode::Ack => layout::OPCODE_ACK,
            Opcode::Error => layout::OPCODE_ERROR,
            Opcode::Unknown(raw) => raw,
        }
    }

    /// Payload shape announced by this opcode.
    ///
    /// Unknown opcodes share the ERROR fallback: four bytes of best-effort
    /// text.
    pub fn payload_kind(self) -> PayloadKind {
        match self {
            Opcode::Init | Opcode::Ack => PayloadKind::Padding,
            Opcode::Move => PayloadKind::Move,
            Opcode::Result => PayloadKind::Result,
            Opcode::Error | Opcode::Unknown(_) => PayloadKind::Message,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Opcode::Init => f.write_str("INIT"),
            Opcode::Move => f.write_str("MOVE"),
            Opcode::Result => f.write_str("RESULT"),
            Opcode::Ack => f.write_str("ACK"),
            Opcode::Error => f.write_str("ERROR"),
            Opcode::Unknown(raw) => write!(f, "UNKNOWN({:#04x})", raw),
        }
    }
}

/// Payload interpretation selected by the opcode.
///
/// The width lives here, looked up once per decode, so a future kind can
/// declare a different width without touching the header parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadKind {
    Padding,
    Move,
    Result,
    Message,
}

impl PayloadKind {
    pub const fn width(self) -> usize {
        match self {
            PayloadKind::Padding => layout::PADDING_LEN,
            PayloadKind::Move => layout::MOVE_LEN,
            PayloadKind::Result => layout::RESULT_LEN,
            PayloadKind::Message => layout::MESSAGE_LEN,
        }
    }
}

/// Player move carried by a MOVE packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Rock,
    Paper,
    Scissors,
    Unrecognized(u32),
}

impl Move {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            layout::MOVE_ROCK => Move::Rock,
            layout::MOVE_PAPER => Move::Paper,
            layout::MOVE_SCISSORS => Move::Scissors,
            other => Move::Unrecognized(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Move::Rock => layout::MOVE_ROCK,
            Move::Paper => layout::MOVE_PAPER,
            Move::Scissors => layout::MOVE_SCISSORS,
            Move::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Rock => f.write_str("Rock"),
            Move::Paper => f.write_str("Paper"),
            Move::Scissors => f.write_str("Scissors"),
            Move::Unrecognized(raw) => write!(f, "Unrecognized({})", raw),
        }
    }
}

/// Round outcome carried by a RESULT packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundResult {
    Win,
    Loss,
    Draw,
    Unrecognized(u32),
}

impl RoundResult {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            layout::RESULT_WIN => RoundResult::Win,
            layout::RESULT_LOSS => RoundResult::Loss,
            layout::RESULT_DRAW => RoundResult::Draw,
            other => RoundResult::Unrecognized(other),
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            RoundResult::Win => layout::RESULT_WIN,
            RoundResult::Loss => layout::RESULT_LOSS,
            RoundResult::Draw => layout::RESULT_DRAW,
            RoundResult::Unrecognized(raw) => raw,
        }
    }
}

impl fmt::Display for RoundResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundResult::Win => f.write_str("Win"),
            RoundResult::Loss => f.write_str("Loss"),
            RoundResult::Draw => f.write_str("Draw"),
            RoundResult::Unrecognized(raw) => write!(f, "Unrecognized({})", raw),
        }
    }
}

/// Decoded payload variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// INIT/ACK padding, kept as raw bytes.
    Padding(Vec<u8>),
    Move(Move),
    Result(RoundResult),
    /// ERROR (and unknown-opcode) message text, decoded best-effort.
    Message(String),
}

/// Fixed header present in every RPS datagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub version: u8,
    pub opcode: Opcode,
    pub game_id: u16,
    pub ttl: u32,
}

/// Byte range a decoded field occupied in the source buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpan {
    pub offset: usize,
    pub len: usize,
}

impl FieldSpan {
    pub(crate) fn from_range(range: std::ops::Range<usize>) -> Self {
        Self {
            offset: range.start,
            len: range.end - range.start,
        }
    }

    pub fn end(self) -> usize {
        self.offset + self.len
    }
}

/// Source spans for every field of a decoded packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpans {
    pub version: FieldSpan,
    pub opcode: FieldSpan,
    pub game_id: FieldSpan,
    pub ttl: FieldSpan,
    pub payload: FieldSpan,
}

/// One fully decoded RPS datagram.
///
/// Created fresh per decode call and immutable afterwards. `consumed` is the
/// total number of bytes the decoder used; trailing bytes past it were
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpsPacket {
    pub header: Header,
    pub payload: Payload,
    pub spans: FieldSpans,
    pub consumed: usize,
}
