//! osu!.db: the beatmap library.
//!
//! Header (version, folder count, unlock state, player name, entry count),
//! then one entry per difficulty, then the user permission bitmask. The
//! entry layout depends on the header version, see [`LibraryLayout`].
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use crate::binfmt::{ByteReader, read_file, read_stream};
use crate::error::{Error, Result};
use crate::layout::{DifficultyEncoding, LibraryLayout};
use crate::model::{BeatmapRecord, LibrarySnapshot, StarRatingTables, TimingPoint};

const TIMING_POINT_SIZE: usize = 17;

pub fn decode_library_file(path: impl AsRef<Path>) -> Result<LibrarySnapshot> {
    let path = path.as_ref();
    let data = read_file(path)?;
    decode_library_bytes(&data).map_err(|e| e.in_file(path))
}

pub fn decode_library<R: Read>(reader: R) -> Result<LibrarySnapshot> {
    decode_library_bytes(&read_stream(reader)?)
}

pub fn decode_library_bytes(data: &[u8]) -> Result<LibrarySnapshot> {
    let mut r = ByteReader::new(data);
    let snapshot = read_library(&mut r)?;
    if !r.is_empty() {
        debug!(trailing = r.remaining(), "osu!.db has bytes past the permission field");
    }
    Ok(snapshot)
}

fn read_library(r: &mut ByteReader<'_>) -> Result<LibrarySnapshot> {
    let version = r.read_i32()?;
    let folder_count = r.read_i32()?;
    let account_unlocked = r.read_bool()?;
    let unlock_date = r.read_datetime()?;
    let player_name = r.read_string()?;
    let count_offset = r.pos();
    let beatmap_count = r.read_i32()?;
    let count = usize::try_from(beatmap_count).map_err(|_| Error::NegativeCount {
        count: beatmap_count,
        offset: count_offset,
    })?;

    let layout = LibraryLayout::for_version(version);
    debug!(version, beatmap_count, ?layout, "decoding osu!.db");

    let mut beatmaps = Vec::with_capacity(r.capacity_hint(count, 1));
    for i in 0..count {
        let start = r.pos();
        let beatmap = read_beatmap(r, layout).map_err(|e| e.in_record("beatmap", i))?;
        trace!(index = i, offset = start, hash = %beatmap.md5_hash, "beatmap");
        beatmaps.push(beatmap);
    }
    let user_permissions = r.read_i32()?;

    Ok(LibrarySnapshot {
        version,
        folder_count,
        account_unlocked,
        unlock_date,
        player_name,
        beatmap_count,
        beatmaps,
        user_permissions,
    })
}

fn read_difficulty(r: &mut ByteReader<'_>, encoding: DifficultyEncoding) -> Result<f32> {
    match encoding {
        DifficultyEncoding::Short => Ok(f32::from(r.read_u16()?)),
        DifficultyEncoding::Single => r.read_f32(),
    }
}

fn read_star_ratings(r: &mut ByteReader<'_>) -> Result<StarRatingTables> {
    let standard = r.read_int_double_pairs()?;
    let taiko = r.read_int_double_pairs()?;
    let catch = r.read_int_double_pairs()?;
    let mania = r.read_int_double_pairs()?;
    Ok(StarRatingTables {
        standard,
        taiko,
        catch,
        mania,
    })
}

fn read_timing_points(r: &mut ByteReader<'_>) -> Result<Vec<TimingPoint>> {
    let count = r.read_count()?;
    let mut out = Vec::with_capacity(r.capacity_hint(count, TIMING_POINT_SIZE));
    for i in 0..count {
        let point = read_timing_point(r).map_err(|e| e.in_record("timing point", i))?;
        out.push(point);
    }
    Ok(out)
}

fn read_timing_point(r: &mut ByteReader<'_>) -> Result<TimingPoint> {
    let bpm = r.read_f64()?;
    let offset = r.read_f64()?;
    let inherited = r.read_bool()?;
    Ok(TimingPoint {
        bpm,
        offset,
        inherited,
    })
}

fn read_beatmap(r: &mut ByteReader<'_>, layout: LibraryLayout) -> Result<BeatmapRecord> {
    let size_in_bytes = if layout.entry_size_prefix {
        Some(r.read_i32()?)
    } else {
        None
    };

    let artist = r.read_string()?;
    let artist_unicode = r.read_string()?;
    let title = r.read_string()?;
    let title_unicode = r.read_string()?;
    let creator = r.read_string()?;
    let difficulty_name = r.read_string()?;
    let audio_file_name = r.read_string()?;
    let md5_hash = r.read_string()?;
    let file_name = r.read_string()?;
    let ranked_status = r.read_u8()?;
    let hit_circles = r.read_u16()?;
    let sliders = r.read_u16()?;
    let spinners = r.read_u16()?;
    let last_modified_ticks = r.read_i64()?;

    let approach_rate = read_difficulty(r, layout.difficulty)?;
    let circle_size = read_difficulty(r, layout.difficulty)?;
    let hp_drain = read_difficulty(r, layout.difficulty)?;
    let overall_difficulty = read_difficulty(r, layout.difficulty)?;
    let slider_velocity = r.read_f64()?;

    let star_ratings = if layout.star_ratings {
        Some(read_star_ratings(r)?)
    } else {
        None
    };

    let drain_time = r.read_i32()?;
    let total_time = r.read_i32()?;
    let audio_preview_time = r.read_i32()?;
    let timing_points = read_timing_points(r)?;
    let difficulty_id = r.read_i32()?;
    let beatmap_id = r.read_i32()?;
    let thread_id = r.read_i32()?;
    let grade_standard = r.read_u8()?;
    let grade_taiko = r.read_u8()?;
    let grade_catch = r.read_u8()?;
    let grade_mania = r.read_u8()?;
    let local_offset = r.read_u16()?;
    let stack_leniency = r.read_f32()?;
    let mode = r.read_u8()?;
    let source = r.read_string()?;
    let tags = r.read_string()?;
    let online_offset = r.read_i16()?;
    let title_font = r.read_string()?;
    let unplayed = r.read_bool()?;
    let last_played_ticks = r.read_i64()?;
    let is_osz2 = r.read_bool()?;
    let folder_name = r.read_string()?;
    let last_checked_ticks = r.read_i64()?;
    let ignore_beatmap_sound = r.read_bool()?;
    let ignore_beatmap_skin = r.read_bool()?;
    let disable_storyboard = r.read_bool()?;
    let disable_video = r.read_bool()?;
    let visual_override = r.read_bool()?;

    let legacy_filler = if layout.legacy_filler {
        Some(r.read_u16()?)
    } else {
        None
    };

    let last_modified_secs = r.read_i32()?;
    let mania_scroll_speed = r.read_u8()?;

    Ok(BeatmapRecord {
        size_in_bytes,
        artist,
        artist_unicode,
        title,
        title_unicode,
        creator,
        difficulty_name,
        audio_file_name,
        md5_hash,
        file_name,
        ranked_status,
        hit_circles,
        sliders,
        spinners,
        last_modified_ticks,
        approach_rate,
        circle_size,
        hp_drain,
        overall_difficulty,
        slider_velocity,
        star_ratings,
        drain_time,
        total_time,
        audio_preview_time,
        timing_points,
        difficulty_id,
        beatmap_id,
        thread_id,
        grade_standard,
        grade_taiko,
        grade_catch,
        grade_mania,
        local_offset,
        stack_leniency,
        mode,
        source,
        tags,
        online_offset,
        title_font,
        unplayed,
        last_played_ticks,
        is_osz2,
        folder_name,
        last_checked_ticks,
        ignore_beatmap_sound,
        ignore_beatmap_skin,
        disable_storyboard,
        disable_video,
        visual_override,
        legacy_filler,
        last_modified_secs,
        mania_scroll_speed,
    })
}
