//! collection.db: version, count, then `count` named lists of beatmap hashes.
use std::io::Read;
use std::path::Path;

use tracing::{debug, trace};

use crate::binfmt::{ByteReader, read_file, read_stream};
use crate::error::Result;
use crate::model::{Collection, CollectionList};

pub fn decode_collections_file(path: impl AsRef<Path>) -> Result<CollectionList> {
    let path = path.as_ref();
    let data = read_file(path)?;
    decode_collections_bytes(&data).map_err(|e| e.in_file(path))
}

pub fn decode_collections<R: Read>(reader: R) -> Result<CollectionList> {
    decode_collections_bytes(&read_stream(reader)?)
}

pub fn decode_collections_bytes(data: &[u8]) -> Result<CollectionList> {
    let mut r = ByteReader::new(data);
    let version = r.read_i32()?;
    let count = r.read_count()?;
    debug!(version, count, "decoding collection.db");

    let mut collections = Vec::with_capacity(r.capacity_hint(count, 5));
    for i in 0..count {
        let collection = read_collection(&mut r).map_err(|e| e.in_record("collection", i))?;
        trace!(index = i, name = %collection.name, len = collection.beatmap_hashes.len(), "collection");
        collections.push(collection);
    }
    Ok(CollectionList {
        version,
        collections,
    })
}

fn read_collection(r: &mut ByteReader<'_>) -> Result<Collection> {
    let name = r.read_string()?;
    let count = r.read_count()?;
    let mut beatmap_hashes = Vec::with_capacity(r.capacity_hint(count, 1));
    for i in 0..count {
        let hash = r.read_string().map_err(|e| e.in_record("beatmap hash", i))?;
        beatmap_hashes.push(hash);
    }
    Ok(Collection {
        name,
        beatmap_hashes,
    })
}
