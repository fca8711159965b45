// Byte builders for hand-made database fixtures
#![allow(dead_code)]

pub const HASH_A: &str = "0123456789abcdef0123456789abcdef";
pub const HASH_B: &str = "fedcba9876543210fedcba9876543210";

#[derive(Default)]
pub struct Writer {
    pub buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }
    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }
    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.u8(v as u8)
    }
    pub fn u16(&mut self, v: u16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }
    pub fn i16(&mut self, v: i16) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }
    pub fn i32(&mut self, v: i32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }
    pub fn i64(&mut self, v: i64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }
    pub fn f32(&mut self, v: f32) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }
    pub fn f64(&mut self, v: f64) -> &mut Self {
        self.buf.extend_from_slice(&v.to_le_bytes());
        self
    }
    pub fn uleb128(&mut self, mut v: u64) -> &mut Self {
        while v >= 0x80 {
            self.buf.push(((v as u8) & 0x7F) | 0x80);
            v >>= 7;
        }
        self.buf.push(v as u8);
        self
    }
    /// Present string (flag 0x0b), even when empty.
    pub fn string(&mut self, s: &str) -> &mut Self {
        self.u8(0x0b);
        self.uleb128(s.len() as u64);
        self.buf.extend_from_slice(s.as_bytes());
        self
    }
    pub fn absent(&mut self) -> &mut Self {
        self.u8(0x00)
    }
    pub fn pairs(&mut self, pairs: &[(i32, f64)]) -> &mut Self {
        self.i32(pairs.len() as i32);
        for &(k, v) in pairs {
            self.u8(0x08).i32(k).u8(0x0d).f64(v);
        }
        self
    }
}

pub const TICKS_2020: i64 = 637_134_336_000_000_000;

/// One osu!.db entry laid out for `version`. Legacy versions get u16
/// difficulty values 5/4/6/7, current ones f32 9.2/4.0/5.5/8.8.
pub fn beatmap(w: &mut Writer, version: i32, hash: &str) {
    let legacy = version < 20140609;
    if version < 20191106 {
        w.i32(1234);
    }
    w.string("Artist")
        .string("Artist (unicode)")
        .string("Title")
        .string("タイトル")
        .string("Mapper")
        .string("Insane")
        .string("audio.mp3")
        .string(hash)
        .string("Artist - Title (Mapper) [Insane].osu");
    w.u8(4).u16(300).u16(120).u16(2).i64(TICKS_2020);
    if legacy {
        w.u16(5).u16(4).u16(6).u16(7);
    } else {
        w.f32(9.2).f32(4.0).f32(5.5).f32(8.8);
    }
    w.f64(1.4);
    if !legacy {
        w.pairs(&[(0, 5.87), (64, 7.91)]);
        w.pairs(&[]);
        w.pairs(&[(0, 2.5)]);
        w.pairs(&[(0, 3.1), (0, 3.9)]);
    }
    w.i32(180).i32(185_000).i32(60_000);
    w.i32(2);
    w.f64(333.33).f64(1500.0).bool(true);
    w.f64(-100.0).f64(30_000.0).bool(false);
    w.i32(111).i32(222).i32(333);
    w.u8(1).u8(9).u8(9).u8(9);
    w.u16(15).f32(0.7).u8(0);
    w.string("Some Game").string("tag1 tag2");
    w.i16(-20);
    w.absent();
    w.bool(false).i64(TICKS_2020 + 10_000_000).bool(false);
    w.string("123 Artist - Title");
    w.i64(TICKS_2020).bool(true).bool(false).bool(false).bool(true).bool(false);
    if legacy {
        w.u16(0xbeef);
    }
    w.i32(1_577_836_800).u8(20);
}

pub fn library(version: i32, hashes: &[&str]) -> Vec<u8> {
    let mut w = Writer::new();
    w.i32(version).i32(42).bool(true).i64(TICKS_2020).string("player");
    w.i32(hashes.len() as i32);
    for h in hashes {
        beatmap(&mut w, version, h);
    }
    w.i32(5);
    w.finish()
}

/// One scores.db score; `trailing` appends an extra double after the id.
pub fn score(w: &mut Writer, hash: &str, mods: i32, trailing: Option<f64>) {
    w.u8(0).i32(20240101);
    w.string(hash).string("player").string(HASH_B);
    w.u16(500).u16(20).u16(3).u16(70).u16(10).u16(1);
    w.i32(1_234_567).u16(812).bool(false).i32(mods);
    w.absent();
    w.i64(TICKS_2020);
    w.i32(-1);
    w.i64(4_000_000_000);
    if let Some(v) = trailing {
        w.f64(v);
    }
}
