use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::error::{Error, Result};
use crate::install::{DbKind, locate};
use crate::scores::ScoreDecodeOptions;
use crate::{collection, library, scores};

#[derive(Clone, Copy, Debug)]
pub struct JsonOpts {
    pub max_array_elems: usize,
    pub pretty: bool,
    pub scores: ScoreDecodeOptions,
}

impl Default for JsonOpts {
    fn default() -> Self {
        Self {
            max_array_elems: 128,
            pretty: true,
            scores: ScoreDecodeOptions::default(),
        }
    }
}

/// Serializes `value`, cutting arrays down to `opts.max_array_elems` items
/// followed by a `{"$truncated": true, "$omitted": n}` marker.
pub fn to_json_value<T: Serialize>(value: &T, opts: &JsonOpts) -> Result<Value> {
    let mut v = serde_json::to_value(value)?;
    truncate_arrays(&mut v, opts.max_array_elems);
    Ok(v)
}

fn truncate_arrays(v: &mut Value, max: usize) {
    match v {
        Value::Array(items) => {
            let omitted = items.len().saturating_sub(max);
            items.truncate(max);
            for it in items.iter_mut() {
                truncate_arrays(it, max);
            }
            if omitted > 0 {
                items.push(json!({ "$truncated": true, "$omitted": omitted }));
            }
        }
        Value::Object(map) => {
            for val in map.values_mut() {
                truncate_arrays(val, max);
            }
        }
        _ => {}
    }
}

/// Decodes one database file into JSON. The kind is guessed from the file
/// name when not given.
pub fn decode_file_json(path: &Path, kind: Option<DbKind>, opts: &JsonOpts) -> Result<Value> {
    let kind = kind
        .or_else(|| DbKind::from_path(path))
        .ok_or_else(|| Error::UnknownDatabase {
            path: path.to_path_buf(),
        })?;
    match kind {
        DbKind::Library => to_json_value(&library::decode_library_file(path)?, opts),
        DbKind::Collections => to_json_value(&collection::decode_collections_file(path)?, opts),
        DbKind::Scores => to_json_value(&scores::decode_scores_file_with(path, opts.scores)?, opts),
    }
}

pub fn dump_file_json(path: &Path, kind: Option<DbKind>, opts: &JsonOpts) -> Result<String> {
    render(&decode_file_json(path, kind, opts)?, opts)
}

/// Dumps every database of an installation directory as one object keyed by
/// file name. A file that fails to decode maps to `{"$error": "..."}`.
pub fn dump_dir_json(dir: &Path, opts: &JsonOpts) -> Result<String> {
    let mut out = Map::new();
    for (kind, path) in locate(dir).iter() {
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(kind.file_name())
            .to_string();
        let entry = match decode_file_json(path, Some(kind), opts) {
            Ok(v) => v,
            Err(e) => json!({ "$error": e.to_string() }),
        };
        out.insert(name, entry);
    }
    render(&Value::Object(out), opts)
}

fn render(v: &Value, opts: &JsonOpts) -> Result<String> {
    let mut s = if opts.pretty {
        serde_json::to_string_pretty(v)?
    } else {
        serde_json::to_string(v)?
    };
    s.push('\n');
    Ok(s)
}
