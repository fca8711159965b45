//! osudb-core: decoders for the binary databases of the osu! stable client
//!
//! - `binfmt`: primitive readers (little-endian scalars, ULEB128, flagged
//!   strings, .NET ticks, tagged int/double pairs)
//! - `library`, `collection`, `scores`: osu!.db, collection.db, scores.db
//! - `layout`: version-dependent osu!.db entry layout
//! - `json`: JSON export, `install`: locating the files in a client folder
//!
//! Decoding is read-only and all-or-nothing: a call returns the complete
//! record graph or the first error.
pub mod binfmt;
pub mod collection;
pub mod error;
pub mod install;
pub mod json;
pub mod layout;
pub mod library;
pub mod model;
pub mod scores;

pub use collection::{decode_collections, decode_collections_bytes, decode_collections_file};
pub use error::{Error, ErrorKind, Result};
pub use install::{DbKind, InstallFiles};
pub use layout::LibraryLayout;
pub use library::{decode_library, decode_library_bytes, decode_library_file};
pub use model::{
    BeatmapRecord, BeatmapScores, Collection, CollectionList, GameMode, LibrarySnapshot,
    ScoreDatabase, ScoreRecord, StarRatingTables, TimingPoint,
};
pub use scores::{
    ScoreDecodeOptions, TrailingFieldRule, decode_scores, decode_scores_bytes,
    decode_scores_bytes_with, decode_scores_file, decode_scores_file_with,
};
