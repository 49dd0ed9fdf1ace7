use std::collections::BTreeMap;

use crate::protocols::rps::{Move, Opcode, Payload, RoundResult, RpsPacket};
use crate::{GameSummary, ValueCount};

/// Running counters for one game id. BTreeMaps keyed by raw code keep the
/// summary order stable across runs.
#[derive(Debug, Default)]
pub(crate) struct GameStats {
    pub packets: u64,
    pub opcodes: BTreeMap<u8, u64>,
    pub moves: BTreeMap<u32, u64>,
    pub results: BTreeMap<u32, u64>,
}

pub(crate) fn record_packet(stats: &mut BTreeMap<u16, GameStats>, packet: &RpsPacket) {
    let entry = stats.entry(packet.header.game_id).or_default();
    entry.packets += 1;
    *entry.opcodes.entry(packet.header.opcode.raw()).or_default() += 1;
    match &packet.payload {
        Payload::Move(mv) => *entry.moves.entry(mv.raw()).or_default() += 1,
        Payload::Result(res) => *entry.results.entry(res.raw()).or_default() += 1,
        Payload::Padding(_) | Payload::Message(_) => {}
    }
}

pub(crate) fn build_game_summaries(stats: BTreeMap<u16, GameStats>) -> Vec<GameSummary> {
    stats
        .into_iter()
        .map(|(game_id, stats)| GameSummary {
            game_id,
            packets: stats.packets,
            opcodes: count_values(stats.opcodes, |raw| Opcode::from_raw(raw).to_string()),
            moves: count_values(stats.moves, |raw| Move::from_raw(raw).to_string()),
            results: count_values(stats.results, |raw| RoundResult::from_raw(raw).to_string()),
        })
        .collect()
}

fn count_values<K: Ord + Copy>(
    counts: BTreeMap<K, u64>,
    label: impl Fn(K) -> String,
) -> Vec<ValueCount> {
    counts
        .into_iter()
        .map(|(raw, count)| ValueCount {
            value: label(raw),
            count,
        })
        .collect()
}
