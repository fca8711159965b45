use serde::Serialize;

/// First client version storing difficulty as f32 and carrying star ratings.
pub const FLOAT_DIFFICULTY_VERSION: i32 = 20140609;
/// First client version without the per-entry size prefix.
pub const NO_ENTRY_SIZE_VERSION: i32 = 20191106;

/// On-disk encoding of approach rate, circle size, HP drain and overall
/// difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyEncoding {
    /// u16 widened to f32.
    Short,
    /// Native f32.
    Single,
}

/// Field layout of a beatmap entry in osu!.db.
///
/// Decided once from the database version and applied to every entry.
/// Versions newer than any known threshold use the current layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibraryLayout {
    pub entry_size_prefix: bool,
    pub difficulty: DifficultyEncoding,
    pub star_ratings: bool,
    pub legacy_filler: bool,
}

impl LibraryLayout {
    pub fn for_version(version: i32) -> Self {
        let float_difficulty = version >= FLOAT_DIFFICULTY_VERSION;
        Self {
            entry_size_prefix: version < NO_ENTRY_SIZE_VERSION,
            difficulty: if float_difficulty {
                DifficultyEncoding::Single
            } else {
                DifficultyEncoding::Short
            },
            star_ratings: float_difficulty,
            legacy_filler: !float_difficulty,
        }
    }
}
