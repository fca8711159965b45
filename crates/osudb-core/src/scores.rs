//! scores.db: version, count, then per-beatmap groups of local scores.
use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, trace};

use crate::binfmt::{ByteReader, read_file, read_stream};
use crate::error::Result;
use crate::model::{BeatmapScores, ScoreDatabase, ScoreRecord};

/// Bit of the mods bitmask the trailing score field is usually tied to.
pub const ADDITIONAL_MOD_INFO_BIT: u32 = 23;

/// Decides whether a score carries the trailing `additional_mod_info` double.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailingFieldRule {
    /// Present when `mods << 23 == 1`, which holds for no i32. Matches the
    /// reference decoder bit for bit.
    #[default]
    LiteralShift,
    /// Present when bit 23 of the mods bitmask is set.
    ModBit,
}

impl TrailingFieldRule {
    pub fn applies(self, mods: i32) -> bool {
        match self {
            Self::LiteralShift => mods.wrapping_shl(ADDITIONAL_MOD_INFO_BIT) == 1,
            Self::ModBit => mods & (1 << ADDITIONAL_MOD_INFO_BIT) != 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreDecodeOptions {
    pub trailing_field: TrailingFieldRule,
}

pub fn decode_scores_file(path: impl AsRef<Path>) -> Result<ScoreDatabase> {
    decode_scores_file_with(path, ScoreDecodeOptions::default())
}

pub fn decode_scores_file_with(
    path: impl AsRef<Path>,
    opts: ScoreDecodeOptions,
) -> Result<ScoreDatabase> {
    let path = path.as_ref();
    let data = read_file(path)?;
    decode_scores_bytes_with(&data, opts).map_err(|e| e.in_file(path))
}

pub fn decode_scores<R: Read>(reader: R) -> Result<ScoreDatabase> {
    decode_scores_bytes(&read_stream(reader)?)
}

pub fn decode_scores_bytes(data: &[u8]) -> Result<ScoreDatabase> {
    decode_scores_bytes_with(data, ScoreDecodeOptions::default())
}

pub fn decode_scores_bytes_with(data: &[u8], opts: ScoreDecodeOptions) -> Result<ScoreDatabase> {
    let mut r = ByteReader::new(data);
    let version = r.read_i32()?;
    let count = r.read_count()?;
    debug!(version, count, rule = ?opts.trailing_field, "decoding scores.db");

    let mut beatmaps = Vec::with_capacity(r.capacity_hint(count, 5));
    for i in 0..count {
        let group = read_beatmap_scores(&mut r, opts).map_err(|e| e.in_record("score group", i))?;
        trace!(index = i, hash = %group.beatmap_hash, scores = group.scores.len(), "score group");
        beatmaps.push(group);
    }
    Ok(ScoreDatabase { version, beatmaps })
}

fn read_beatmap_scores(r: &mut ByteReader<'_>, opts: ScoreDecodeOptions) -> Result<BeatmapScores> {
    let beatmap_hash = r.read_string()?;
    let count = r.read_count()?;
    let mut scores = Vec::with_capacity(r.capacity_hint(count, 1));
    for i in 0..count {
        let score = read_score(r, opts).map_err(|e| e.in_record("score", i))?;
        scores.push(score);
    }
    Ok(BeatmapScores {
        beatmap_hash,
        scores,
    })
}

fn read_score(r: &mut ByteReader<'_>, opts: ScoreDecodeOptions) -> Result<ScoreRecord> {
    let mode = r.read_u8()?;
    let version = r.read_i32()?;
    let beatmap_hash = r.read_string()?;
    let player_name = r.read_string()?;
    let replay_hash = r.read_string()?;
    let count_300 = r.read_u16()?;
    let count_100 = r.read_u16()?;
    let count_50 = r.read_u16()?;
    let count_geki = r.read_u16()?;
    let count_katu = r.read_u16()?;
    let count_miss = r.read_u16()?;
    let score = r.read_i32()?;
    let max_combo = r.read_u16()?;
    let perfect_combo = r.read_bool()?;
    let mods = r.read_i32()?;
    // always empty in files written by the client
    let _ = r.read_string()?;
    let timestamp = r.read_datetime()?;
    // always -1
    let _ = r.read_i32()?;
    let online_score_id = r.read_i64()?;
    let additional_mod_info = if opts.trailing_field.applies(mods) {
        Some(r.read_f64()?)
    } else {
        None
    };

    Ok(ScoreRecord {
        mode,
        version,
        beatmap_hash,
        player_name,
        replay_hash,
        count_300,
        count_100,
        count_50,
        count_geki,
        count_katu,
        count_miss,
        score,
        max_combo,
        perfect_combo,
        mods,
        timestamp,
        online_score_id,
        additional_mod_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_shift_never_applies() {
        for mods in [0, 1, 1 << 23, -1, i32::MAX, i32::MIN, 0x0080_0001] {
            assert!(!TrailingFieldRule::LiteralShift.applies(mods), "mods={mods:#x}");
        }
    }

    #[test]
    fn mod_bit_tests_bit_23() {
        assert!(TrailingFieldRule::ModBit.applies(1 << 23));
        assert!(TrailingFieldRule::ModBit.applies((1 << 23) | 8));
        assert!(!TrailingFieldRule::ModBit.applies(8));
        assert!(!TrailingFieldRule::ModBit.applies(0));
    }
}
