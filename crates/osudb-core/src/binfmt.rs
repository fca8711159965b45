// Primitive decoders shared by every osu! database format
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// String flag: no payload follows.
pub const STRING_ABSENT: u8 = 0x00;
/// String flag: ULEB128 length and UTF-8 bytes follow.
pub const STRING_PRESENT: u8 = 0x0b;
/// Type tag preceding the key of an int/double pair.
pub const TAG_INT: u8 = 0x08;
/// Type tag preceding the value of an int/double pair.
pub const TAG_DOUBLE: u8 = 0x0d;

/// .NET ticks between 0001-01-01 and the Unix epoch.
pub const TICKS_UNIX_EPOCH: i64 = 621_355_968_000_000_000;
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Key/value table of mod combination to star rating.
///
/// Ratings are stored truncated to whole numbers.
pub type StarRatings = BTreeMap<i32, i64>;

/// Forward-only cursor over a byte buffer.
///
/// Reads are all-or-nothing: a read that needs more bytes than remain fails
/// with [`Error::Truncated`] and leaves the position untouched.
#[derive(Debug)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_slice(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::Truncated {
                offset: self.pos,
                needed: len,
                remaining: self.remaining(),
            });
        }
        let s = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(s)
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut buf = [0u8; N];
        buf.copy_from_slice(self.read_slice(N)?);
        Ok(buf)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }
    pub fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }
    pub fn read_bool(&mut self) -> Result<bool> {
        Ok(self.read_u8()? != 0)
    }
    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }
    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }
    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }
    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array()?))
    }
    pub fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }
    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }
    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }
    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }

    /// Reads an i32 element count. Negative counts are rejected.
    pub fn read_count(&mut self) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_i32()?;
        usize::try_from(count).map_err(|_| Error::NegativeCount { count, offset })
    }

    /// Capacity hint for `count` elements of at least `min_size` bytes each,
    /// so a corrupt count cannot force a huge allocation.
    pub fn capacity_hint(&self, count: usize, min_size: usize) -> usize {
        count.min(self.remaining() / min_size.max(1))
    }

    /// Unsigned LEB128: 7 payload bits per byte, low group first, high bit
    /// set on every byte but the last.
    pub fn read_uleb128(&mut self) -> Result<u64> {
        let start = self.pos;
        let mut result: u64 = 0;
        let mut shift = 0u32;
        loop {
            let b = self.read_u8()?;
            let payload = u64::from(b & 0x7F);
            if shift >= 64 || (shift > 0 && payload >> (64 - shift) != 0) {
                return Err(Error::VarIntOverflow { offset: start });
            }
            result |= payload << shift;
            if b & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        Ok(result)
    }

    /// Flag-prefixed string. An absent string decodes as empty.
    pub fn read_string(&mut self) -> Result<String> {
        let offset = self.pos;
        match self.read_u8()? {
            STRING_ABSENT => Ok(String::new()),
            STRING_PRESENT => {
                let len_offset = self.pos;
                let len = self.read_uleb128()?;
                let len = usize::try_from(len).map_err(|_| Error::Truncated {
                    offset: len_offset,
                    needed: usize::MAX,
                    remaining: self.remaining(),
                })?;
                let body_offset = self.pos;
                let bytes = self.read_slice(len)?;
                let s = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 {
                    offset: body_offset,
                })?;
                Ok(s.to_owned())
            }
            flag => Err(Error::InvalidStringFlag { flag, offset }),
        }
    }

    pub fn read_datetime(&mut self) -> Result<DateTime<Utc>> {
        Ok(ticks_to_datetime(self.read_i64()?))
    }

    fn expect_tag(&mut self, expected: u8) -> Result<()> {
        let offset = self.pos;
        let found = self.read_u8()?;
        if found != expected {
            return Err(Error::InvalidTag {
                expected,
                found,
                offset,
            });
        }
        Ok(())
    }

    /// Count-prefixed list of tagged (i32, f64) pairs. Values are truncated
    /// toward zero; a repeated key keeps the last value.
    pub fn read_int_double_pairs(&mut self) -> Result<StarRatings> {
        let count = self.read_count()?;
        let mut pairs = StarRatings::new();
        for i in 0..count {
            let (key, value) = self
                .read_int_double_pair()
                .map_err(|e| e.in_record("rating entry", i))?;
            pairs.insert(key, value as i64);
        }
        Ok(pairs)
    }

    fn read_int_double_pair(&mut self) -> Result<(i32, f64)> {
        self.expect_tag(TAG_INT)?;
        let key = self.read_i32()?;
        self.expect_tag(TAG_DOUBLE)?;
        let value = self.read_f64()?;
        Ok((key, value))
    }
}

/// Converts .NET ticks (100 ns units since 0001-01-01) to a UTC instant.
///
/// Total over `i64`: pre-epoch tick counts give instants before 1970.
pub fn ticks_to_datetime(ticks: i64) -> DateTime<Utc> {
    let unix_ticks = i128::from(ticks) - i128::from(TICKS_UNIX_EPOCH);
    let per_second = i128::from(TICKS_PER_SECOND);
    let seconds = unix_ticks.div_euclid(per_second) as i64;
    let nanos = (unix_ticks.rem_euclid(per_second) * 100) as u32;
    // i64 ticks span roughly +-29k years, well inside chrono's range.
    DateTime::from_timestamp(seconds, nanos).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

pub(crate) fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn read_stream<R: Read>(mut reader: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    Ok(data)
}
