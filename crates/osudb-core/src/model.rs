use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::binfmt::{StarRatings, ticks_to_datetime};
use crate::layout::LibraryLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    Standard,
    Taiko,
    Catch,
    Mania,
}

impl GameMode {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0 => Some(Self::Standard),
            1 => Some(Self::Taiko),
            2 => Some(Self::Catch),
            3 => Some(Self::Mania),
            _ => None,
        }
    }
}

impl core::fmt::Display for GameMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            Self::Standard => "osu!",
            Self::Taiko => "osu!taiko",
            Self::Catch => "osu!catch",
            Self::Mania => "osu!mania",
        };
        f.write_str(name)
    }
}

/// Decoded osu!.db.
#[derive(Debug, Clone, Serialize)]
pub struct LibrarySnapshot {
    pub version: i32,
    pub folder_count: i32,
    pub account_unlocked: bool,
    pub unlock_date: DateTime<Utc>,
    pub player_name: String,
    pub beatmap_count: i32,
    pub beatmaps: Vec<BeatmapRecord>,
    pub user_permissions: i32,
}

impl LibrarySnapshot {
    pub fn layout(&self) -> LibraryLayout {
        LibraryLayout::for_version(self.version)
    }
}

/// Star ratings per game mode, keyed by mod combination.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StarRatingTables {
    pub standard: StarRatings,
    pub taiko: StarRatings,
    pub catch: StarRatings,
    pub mania: StarRatings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimingPoint {
    pub bpm: f64,
    pub offset: f64,
    pub inherited: bool,
}

/// One difficulty entry of osu!.db.
///
/// Tick fields hold raw .NET ticks; use the accessor methods for instants.
/// `size_in_bytes`, `star_ratings` and `legacy_filler` are `None` when the
/// database version does not store them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeatmapRecord {
    pub size_in_bytes: Option<i32>,
    pub artist: String,
    pub artist_unicode: String,
    pub title: String,
    pub title_unicode: String,
    pub creator: String,
    pub difficulty_name: String,
    pub audio_file_name: String,
    pub md5_hash: String,
    pub file_name: String,
    pub ranked_status: u8,
    pub hit_circles: u16,
    pub sliders: u16,
    pub spinners: u16,
    pub last_modified_ticks: i64,
    pub approach_rate: f32,
    pub circle_size: f32,
    pub hp_drain: f32,
    pub overall_difficulty: f32,
    pub slider_velocity: f64,
    pub star_ratings: Option<StarRatingTables>,
    pub drain_time: i32,
    pub total_time: i32,
    pub audio_preview_time: i32,
    pub timing_points: Vec<TimingPoint>,
    pub difficulty_id: i32,
    pub beatmap_id: i32,
    pub thread_id: i32,
    pub grade_standard: u8,
    pub grade_taiko: u8,
    pub grade_catch: u8,
    pub grade_mania: u8,
    pub local_offset: u16,
    pub stack_leniency: f32,
    pub mode: u8,
    pub source: String,
    pub tags: String,
    pub online_offset: i16,
    pub title_font: String,
    pub unplayed: bool,
    pub last_played_ticks: i64,
    pub is_osz2: bool,
    pub folder_name: String,
    pub last_checked_ticks: i64,
    pub ignore_beatmap_sound: bool,
    pub ignore_beatmap_skin: bool,
    pub disable_storyboard: bool,
    pub disable_video: bool,
    pub visual_override: bool,
    pub legacy_filler: Option<u16>,
    pub last_modified_secs: i32,
    pub mania_scroll_speed: u8,
}

impl BeatmapRecord {
    pub fn last_modified(&self) -> DateTime<Utc> {
        ticks_to_datetime(self.last_modified_ticks)
    }
    pub fn last_played(&self) -> DateTime<Utc> {
        ticks_to_datetime(self.last_played_ticks)
    }
    pub fn last_checked(&self) -> DateTime<Utc> {
        ticks_to_datetime(self.last_checked_ticks)
    }
    pub fn game_mode(&self) -> Option<GameMode> {
        GameMode::from_byte(self.mode)
    }
}

/// Decoded collection.db.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CollectionList {
    pub version: i32,
    pub collections: Vec<Collection>,
}

impl CollectionList {
    pub fn len(&self) -> usize {
        self.collections.len()
    }
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name == name)
    }
}

/// Named group of beatmap MD5 hashes. Hashes are not checked against osu!.db.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Collection {
    pub name: String,
    pub beatmap_hashes: Vec<String>,
}

/// Decoded scores.db.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreDatabase {
    pub version: i32,
    pub beatmaps: Vec<BeatmapScores>,
}

impl ScoreDatabase {
    pub fn total_scores(&self) -> usize {
        self.beatmaps.iter().map(|b| b.scores.len()).sum()
    }
    pub fn scores_for(&self, beatmap_hash: &str) -> Option<&BeatmapScores> {
        self.beatmaps.iter().find(|b| b.beatmap_hash == beatmap_hash)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BeatmapScores {
    pub beatmap_hash: String,
    pub scores: Vec<ScoreRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreRecord {
    pub mode: u8,
    pub version: i32,
    pub beatmap_hash: String,
    pub player_name: String,
    pub replay_hash: String,
    pub count_300: u16,
    pub count_100: u16,
    pub count_50: u16,
    pub count_geki: u16,
    pub count_katu: u16,
    pub count_miss: u16,
    pub score: i32,
    pub max_combo: u16,
    pub perfect_combo: bool,
    pub mods: i32,
    pub timestamp: DateTime<Utc>,
    pub online_score_id: i64,
    pub additional_mod_info: Option<f64>,
}

impl ScoreRecord {
    pub fn game_mode(&self) -> Option<GameMode> {
        GameMode::from_byte(self.mode)
    }

    /// Sum of the six stored judgement counters. Gekis and katus overlap the
    /// 300/100 counts in osu!standard, so this is not a hit-object count.
    pub fn judgement_sum(&self) -> u32 {
        [
            self.count_300,
            self.count_100,
            self.count_50,
            self.count_geki,
            self.count_katu,
            self.count_miss,
        ]
        .iter()
        .map(|&c| u32::from(c))
        .sum()
    }
}
