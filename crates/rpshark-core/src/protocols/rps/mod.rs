//! RPS game-coordination protocol decoding.
//!
//! One datagram is a fixed 8-byte header (version, opcode, game id, TTL —
//! multi-byte fields big-endian) followed by an opcode-selected 4-byte
//! payload: padding for INIT/ACK, a move or result code for MOVE/RESULT,
//! and message text for ERROR and any unrecognized opcode.
//!
//! Decoding is deliberately tolerant: unknown opcodes and out-of-range
//! payload codes are representable outcomes, and message text is decoded
//! best-effort. The only error is truncation, tagged with the region that
//! came up short. Byte offsets live in `layout`, access conventions in
//! `reader`, the typed representation in `model`.

pub mod error;
pub mod layout;
pub mod model;
pub mod parser;
pub mod reader;

pub use error::{DecodeError, Region};
pub use model::{
    FieldSpan, FieldSpans, Header, Move, Opcode, Payload, PayloadKind, RoundResult, RpsPacket,
};
pub use parser::decode;
